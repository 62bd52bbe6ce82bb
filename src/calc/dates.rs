use chrono::{Datelike, Duration, NaiveDate, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of years shown by the year picker: `decade_start..=decade_start + 10`.
pub const DECADE_SPAN: i32 = 11;

/// Years the picker opens on. Kept inside chrono's `NaiveDate` range with
/// room for the neighbouring months and decades.
pub const MIN_YEAR: i32 = -262_000;
pub const MAX_YEAR: i32 = 262_000;

/// Which week counts as week 1 of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FirstWeekOfYear {
    /// The week holding January 1st.
    #[default]
    FirstDay,
    /// The first week that lies entirely in January.
    FirstFullWeek,
    /// The first week with at least four days in January (ISO 8601 with a
    /// Monday week start).
    FirstFourDayWeek,
}

pub(crate) fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    match (
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
        NaiveDate::from_ymd_opt(year, month, 1),
    ) {
        (Some(next), Some(first)) => next.signed_duration_since(first).num_days() as u32,
        _ => 0,
    }
}

pub(crate) fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub(crate) fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
}

pub(crate) fn clamp_year(year: i32) -> i32 {
    year.clamp(MIN_YEAR, MAX_YEAR)
}

/// Shifts a `(month, year)` pair by whole months without touching any day.
/// The year saturates at the `i32` limits.
pub(crate) fn shift_month(month: u32, year: i32, delta: i32) -> (u32, i32) {
    let total = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(delta);
    let year = total
        .div_euclid(12)
        .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    ((total.rem_euclid(12) + 1) as u32, year)
}

/// Floor of `year` to its decade, e.g. 2024 -> 2020 and -3 -> -10.
pub(crate) fn decade_start(year: i32) -> i32 {
    year.saturating_sub(year.rem_euclid(10))
}

pub(crate) fn decade_end(decade_start: i32) -> i32 {
    decade_start.saturating_add(DECADE_SPAN - 1)
}

fn week_start(date: NaiveDate, first_day: Weekday) -> Option<NaiveDate> {
    let col = weekday_column(date.weekday(), first_day);
    date.checked_sub_signed(Duration::days(i64::from(col)))
}

/// Start of week 1 of `year` for a week beginning on `first_day`.
fn first_week_start(year: i32, first_day: Weekday, rule: FirstWeekOfYear) -> Option<NaiveDate> {
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let start = week_start(jan1, first_day)?;
    let days_in_january = 7 - (jan1 - start).num_days();
    let keep = match rule {
        FirstWeekOfYear::FirstDay => true,
        FirstWeekOfYear::FirstFullWeek => days_in_january == 7,
        FirstWeekOfYear::FirstFourDayWeek => days_in_january >= 4,
    };
    if keep {
        Some(start)
    } else {
        start.checked_add_signed(Duration::days(7))
    }
}

/// Week number of the week holding `date`. A week spanning New Year
/// belongs to the later year once it reaches that year's week 1.
pub(crate) fn week_number(date: NaiveDate, first_day: Weekday, rule: FirstWeekOfYear) -> Option<u32> {
    let start = week_start(date, first_day)?;
    let end = start.checked_add_signed(Duration::days(6))?;
    let mut week1 = first_week_start(end.year(), first_day, rule)?;
    if start < week1 {
        week1 = first_week_start(end.year() - 1, first_day, rule)?;
    }
    u32::try_from((start - week1).num_days() / 7 + 1).ok()
}

/// Chronological key for a month, usable with plain integer comparison.
pub(crate) fn month_key(year: i32, month: u32) -> i64 {
    year as i64 * 12 + month as i64 - 1
}

/// Column of `day` in a week that begins on `first_day`.
pub(crate) fn weekday_column(day: Weekday, first_day: Weekday) -> u32 {
    (day.num_days_from_sunday() + 7 - first_day.num_days_from_sunday()) % 7
}

/// Renders a date the way selection events carry it: `month-day-year`, no padding.
pub(crate) fn to_mdy(date: NaiveDate) -> String {
    format!("{}-{}-{}", date.month(), date.day(), date.year())
}
