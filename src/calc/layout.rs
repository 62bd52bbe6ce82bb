use crate::calc::dates::{FirstWeekOfYear, first_of_month, last_of_month, week_number, weekday_column};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

/// Secondary panels (month picker, year picker) are four cells wide.
pub const PANEL_COLUMNS: usize = 4;

/// One labelled unit of the secondary panel. `detail` is the month
/// number (1-12) for the month picker and the year for the year picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelItem {
    pub label: String,
    pub detail: i32,
}

impl PanelItem {
    pub fn new(label: impl Into<String>, detail: i32) -> Self {
        PanelItem {
            label: label.into(),
            detail,
        }
    }
}

/// A laid-out row; `None` marks a blank placeholder cell.
pub type PanelRow = Vec<Option<PanelItem>>;

/// Splits `items` into rows of exactly `columns` cells. A short final
/// row is padded with blank placeholders, so 12 months give 3 full rows
/// and 11 years give 3 rows whose last cell is blank.
pub fn layout_rows(items: &[PanelItem], columns: usize) -> Vec<PanelRow> {
    if columns == 0 {
        return Vec::new();
    }
    items
        .chunks(columns)
        .map(|chunk| {
            let mut row: PanelRow = chunk.iter().cloned().map(Some).collect();
            row.resize(columns, None);
            row
        })
        .collect()
}

/// The rendered day grid: whole weeks from the one holding the 1st of
/// the month through the one holding its last day. Cells outside the
/// month carry the adjacent months' dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub first_day: Weekday,
    pub weeks: Vec<[NaiveDate; 7]>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32, first_day: Weekday) -> Option<Self> {
        let first = first_of_month(year, month)?;
        let last = last_of_month(year, month)?;
        let offset = weekday_column(first.weekday(), first_day);
        let mut start = first.checked_sub_signed(Duration::days(offset as i64))?;

        let mut weeks = Vec::new();
        while start <= last {
            let mut week = [start; 7];
            for (i, cell) in week.iter_mut().enumerate() {
                *cell = start.checked_add_signed(Duration::days(i as i64))?;
            }
            weeks.push(week);
            start = start.checked_add_signed(Duration::days(7))?;
        }

        Some(MonthGrid {
            year,
            month,
            first_day,
            weeks,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.position(date).is_some()
    }

    /// `(row, column)` of `date` in the grid.
    pub fn position(&self, date: NaiveDate) -> Option<(usize, usize)> {
        let first = self.weeks.first()?[0];
        let offset = date.signed_duration_since(first).num_days();
        if offset < 0 {
            return None;
        }
        let (row, col) = ((offset / 7) as usize, (offset % 7) as usize);
        (row < self.weeks.len()).then_some((row, col))
    }

    /// First and last date of the week row holding `date`. Computed from
    /// the column alone so it also works for dates outside the grid.
    pub fn week_bounds(&self, date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let col = weekday_column(date.weekday(), self.first_day) as i64;
        let start = date.checked_sub_signed(Duration::days(col))?;
        let end = start.checked_add_signed(Duration::days(6))?;
        Some((start, end))
    }

    /// Week number of every row under `rule`; 0 where the row cannot be
    /// placed in a year.
    pub fn week_numbers(&self, rule: FirstWeekOfYear) -> Vec<u32> {
        self.weeks
            .iter()
            .map(|w| week_number(w[0], self.first_day, rule).unwrap_or(0))
            .collect()
    }
}
