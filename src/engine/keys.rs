//! Calendar arithmetic and the textual period keys used as bucket labels.
//!
//! Weeks start on Sunday. Week-of-year numbering puts January 1 in week 1, so the last days of
//! December can belong to week 1 of the following year.

use chrono::{Datelike, Days, Months, NaiveDate};

/// The first day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// `date` advanced by `months` calendar months, or `None` past chrono's range.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Number of days (28-31) in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = month_start(date);
    match add_months(first, 1) {
        Some(next) => (next - first).num_days() as u32,
        // Only December of chrono's maximum year lands here
        None => 31,
    }
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let back = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(back)).unwrap_or(date)
}

/// Week number of `date` within its week-numbering year, starting at 1.
pub fn week_of_year(date: NaiveDate) -> u32 {
    let year = date.year();
    let this_year = jan_first(year).map(week_start);
    let next_year = jan_first(year + 1).map(week_start);
    let first_week = match (this_year, next_year) {
        (_, Some(next)) if date >= next => next,
        (Some(this), _) => this,
        _ => return 1,
    };
    ((week_start(date) - first_week).num_days() / 7 + 1) as u32
}

/// Month key, e.g. `Mar 2024`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Day key, e.g. `05 Mar`.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%d %b").to_string()
}

/// Week key, e.g. `W10 Mar`, built from the week number and month of `date`.
pub fn week_key(date: NaiveDate) -> String {
    format!("W{} {}", week_of_year(date), date.format("%b"))
}

fn jan_first(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}
