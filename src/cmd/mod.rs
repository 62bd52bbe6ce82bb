pub mod init;
pub mod root;
pub mod show;

use crate::calc::BoundsError;
use crate::data::AppSettings;
use crate::state::Calendar;
use chrono::{Datelike, NaiveDate};

/// Month the picker opens on; unset parts default to today's.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartMonth {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Builds the engine from settings. Malformed bounds are returned so the
/// caller can surface them; the calendar treats them as absent.
pub(crate) fn build_calendar(
    settings: &AppSettings,
    start: StartMonth,
    today: NaiveDate,
) -> (Calendar, Vec<BoundsError>) {
    let (bounds, diagnostics) = settings.bounds();
    let calendar = Calendar::new(
        start.month.unwrap_or(today.month()),
        start.year.unwrap_or(today.year()),
        bounds,
        settings.calendar_type,
        settings.calendar_options(),
        today,
    );
    (calendar, diagnostics)
}
