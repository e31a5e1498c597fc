use chrono::{Datelike, Months, NaiveDate};
use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::RateUnit;

/// quarter length used for partial-quarter fractions
pub const DAYS_PER_QUARTER: Decimal = dec!(91);

/// average year length used for the remainder of multi-year spans
pub const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// floor for a same-month span, one thirtieth of a month
pub const MIN_MONTH_FRACTION: Decimal = dec!(0.0333333333333333333333333333);

/// notional month length used for day offsets inside a quarter
const QUARTER_MONTH_DAYS: i64 = 30;

/// whole days from `start` to `due`, zero when `due` is not after `start`
pub fn duration_days(start: NaiveDate, due: NaiveDate) -> i64 {
    (due - start).num_days().max(0)
}

/// number of `unit` periods elapsed between two dates
///
/// Returns zero when `due <= start`. A span that stays inside its starting
/// month or quarter never counts for more than reaching the next one, so the
/// result is non-decreasing as `due` moves later.
pub fn elapsed_periods(start: NaiveDate, due: NaiveDate, unit: RateUnit) -> Decimal {
    if due <= start {
        return Decimal::ZERO;
    }

    let periods = match unit {
        RateUnit::Day => Some(Decimal::from(duration_days(start, due))),
        RateUnit::Week => Some(Decimal::from(duration_days(start, due)) / dec!(7)),
        RateUnit::Month => elapsed_months(start, due),
        RateUnit::Quarter => elapsed_quarters(start, due),
        RateUnit::Year => elapsed_years(start, due),
    };

    match periods {
        Some(p) => p.max(Decimal::ZERO),
        None => {
            warn!("period count out of calendar range: {} to {} ({})", start, due, unit);
            Decimal::ZERO
        }
    }
}

/// calendar month difference, less the day shortfall over the due month's length
fn elapsed_months(start: NaiveDate, due: NaiveDate) -> Option<Decimal> {
    let months = month_index(due) - month_index(start);
    if months > 0 {
        return months_across(start, due, months);
    }

    // inclusive day span over the start month's length
    let days = i64::from(due.day()) - i64::from(start.day()) + 1;
    let span = day_ratio(days, days_in_month(start)?).max(MIN_MONTH_FRACTION);
    let cap = months_across(start, add_months(start.with_day(1)?, 1)?, 1)?;
    Some(span.min(cap))
}

fn months_across(start: NaiveDate, due: NaiveDate, months: i32) -> Option<Decimal> {
    let whole = Decimal::from(months);
    if due.day() >= start.day() {
        return Some(whole);
    }

    let due_month_days = days_in_month(due)?;
    // a start day past the end of the due month counts from that month's last day
    let start_day = i64::from(start.day()).min(due_month_days);
    Some(whole - day_ratio(start_day - i64::from(due.day()), due_month_days))
}

/// calendar quarter difference with 30-day-month offsets over a 91-day quarter
fn elapsed_quarters(start: NaiveDate, due: NaiveDate) -> Option<Decimal> {
    let quarters = quarter_index(due) - quarter_index(start);
    if quarters > 0 {
        return Some(quarters_across(start, due, quarters));
    }

    // inclusive day span within the quarter
    let span = Decimal::from(duration_days(start, due) + 1) / DAYS_PER_QUARTER;
    let cap = quarters_across(start, add_months(quarter_start(start)?, 3)?, 1);
    Some(span.min(cap))
}

fn quarters_across(start: NaiveDate, due: NaiveDate, quarters: i32) -> Decimal {
    let start_offset = (3 - month_in_quarter(start)) * QUARTER_MONTH_DAYS - i64::from(start.day()) + 1;
    let due_offset = month_in_quarter(due) * QUARTER_MONTH_DAYS + i64::from(due.day());

    Decimal::from(quarters - 1)
        + Decimal::from(start_offset.max(0) + due_offset.max(0)) / DAYS_PER_QUARTER
}

/// fraction of the calendar year, or whole anniversaries plus remainder over 365.25 days
fn elapsed_years(start: NaiveDate, due: NaiveDate) -> Option<Decimal> {
    if start.year() == due.year() {
        let days = Decimal::from(duration_days(start, due));
        return Some(days / Decimal::from(days_in_year(start.year())));
    }

    let mut whole = (due.year() - start.year()).max(0) as u32;
    let mut anchor = add_months(start, whole * 12)?;
    if anchor > due {
        whole -= 1;
        anchor = add_months(start, whole * 12)?;
    }

    let remainder = Decimal::from(duration_days(anchor, due)) / DAYS_PER_YEAR;
    Some(Decimal::from(whole) + remainder.max(Decimal::ZERO))
}

fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

fn quarter_index(date: NaiveDate) -> i32 {
    date.year() * 4 + (date.month0() / 3) as i32
}

fn month_in_quarter(date: NaiveDate) -> i64 {
    i64::from(date.month0() % 3)
}

/// first day of the quarter containing `date`
fn quarter_start(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), (date.month0() / 3) * 3 + 1, 1)
}

fn days_in_month(date: NaiveDate) -> Option<i64> {
    let first = date.with_day(1)?;
    Some(duration_days(first, add_months(first, 1)?))
}

fn day_ratio(days: i64, period_days: i64) -> Decimal {
    if period_days <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(days) / Decimal::from(period_days)
}

/// check if year is a leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}
