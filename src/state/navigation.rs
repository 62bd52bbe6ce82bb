use crate::calc::DateBounds;
use crate::calc::dates::{
    clamp_year, decade_end, decade_start, first_of_month, month_key, shift_month,
};
use crate::state::change::{Change, FocusTarget, TransitionDirection};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// What the picker is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarViewState {
    pub month: u32,
    pub year: i32,
    /// Year shown by the month picker.
    pub month_picker_year: i32,
    /// First year shown by the year picker. Reset to the decade holding
    /// `month_picker_year` on every toggle, free to page while open.
    pub year_picker_decade_start: i32,
    pub year_picker_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRef {
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthInfo {
    pub month: u32,
    pub year: i32,
    pub previous: MonthRef,
    pub next: MonthRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthPickerInfo {
    pub year: i32,
    pub previous: i32,
    pub next: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearPickerInfo {
    pub decade_start: i32,
    pub decade_end: i32,
    pub previous: i32,
    pub next: i32,
}

impl YearPickerInfo {
    pub fn for_decade(start: i32) -> Self {
        YearPickerInfo {
            decade_start: start,
            decade_end: decade_end(start),
            previous: start.saturating_sub(10),
            next: start.saturating_add(10),
        }
    }
}

/// Owns the view state and the keyboard-focused date. All mutation goes
/// through the command methods, which either commit fully and report
/// what changed or leave everything untouched and return no changes.
#[derive(Debug, Clone)]
pub struct Navigator {
    view: CalendarViewState,
    navigated: NaiveDate,
    bounds: DateBounds,
}

impl Navigator {
    /// Out-of-range months fall back to January; years are clamped to
    /// `MIN_YEAR..=MAX_YEAR`.
    pub fn new(month: u32, year: i32, bounds: DateBounds) -> Self {
        let month = if (1..=12).contains(&month) { month } else { 1 };
        let year = clamp_year(year);
        let navigated = first_of_month(year, month).unwrap_or_default();
        Navigator {
            view: CalendarViewState {
                month,
                year,
                month_picker_year: year,
                year_picker_decade_start: decade_start(year),
                year_picker_open: false,
            },
            navigated,
            bounds,
        }
    }

    pub fn view(&self) -> &CalendarViewState {
        &self.view
    }

    pub fn navigated_date(&self) -> NaiveDate {
        self.navigated
    }

    pub fn bounds(&self) -> &DateBounds {
        &self.bounds
    }

    pub fn month_info(&self) -> MonthInfo {
        let (pm, py) = shift_month(self.view.month, self.view.year, -1);
        let (nm, ny) = shift_month(self.view.month, self.view.year, 1);
        MonthInfo {
            month: self.view.month,
            year: self.view.year,
            previous: MonthRef { month: pm, year: py },
            next: MonthRef { month: nm, year: ny },
        }
    }

    pub fn month_picker_info(&self) -> MonthPickerInfo {
        let year = self.view.month_picker_year;
        MonthPickerInfo {
            year,
            previous: year.saturating_sub(1),
            next: year.saturating_add(1),
        }
    }

    pub fn year_picker_info(&self) -> YearPickerInfo {
        YearPickerInfo::for_decade(self.view.year_picker_decade_start)
    }

    /// Shows `month`/`year` in the day grid. Rejected when every day of
    /// the target month is out of bounds.
    pub fn switch_month(&mut self, month: u32, year: i32) -> Vec<Change> {
        if !(1..=12).contains(&month) || self.bounds.is_month_disabled(year, month) {
            tracing::debug!(month, year, "switch_month rejected");
            return Vec::new();
        }

        let direction = TransitionDirection::between(
            month_key(self.view.year, self.view.month),
            month_key(year, month),
        );
        let secondary_direction = if self.view.year_picker_open {
            let info = self.year_picker_info();
            if year < info.decade_start {
                Some(TransitionDirection::Previous)
            } else if year > info.decade_end {
                Some(TransitionDirection::Next)
            } else {
                None
            }
        } else {
            TransitionDirection::between(self.view.month_picker_year, year)
        };

        let panel_moved = self.view.month_picker_year != year
            || self.view.year_picker_decade_start != decade_start(year);

        self.view.month = month;
        self.view.year = year;
        self.view.month_picker_year = year;
        self.view.year_picker_decade_start = decade_start(year);

        if self.navigated.year() != year || self.navigated.month() != month {
            if let Some(first) = first_of_month(year, month) {
                self.navigated = first;
            }
        }
        tracing::debug!(month, year, ?direction, "switched month");

        let mut changes = vec![Change::MonthSwitched {
            month,
            year,
            direction,
        }];
        if panel_moved || secondary_direction.is_some() {
            changes.push(Change::SecondaryPanelSwitched {
                year,
                decade_start: self.view.year_picker_decade_start,
                direction: secondary_direction,
            });
        }
        changes.push(Change::Focus(FocusTarget::Day(self.navigated)));
        changes
    }

    /// Pages the month picker by a year, or the year picker by a decade.
    pub fn switch_secondary_panel(&mut self, direction: TransitionDirection) -> Vec<Change> {
        let step = match direction {
            TransitionDirection::Previous => -1,
            TransitionDirection::Next => 1,
        };

        if self.view.year_picker_open {
            let candidate = self.view.year_picker_decade_start.saturating_add(step * 10);
            if self.bounds.is_decade_disabled(candidate) {
                tracing::debug!(decade = candidate, "switch_secondary_panel rejected");
                return Vec::new();
            }
            self.view.year_picker_decade_start = candidate;
        } else {
            let candidate = self.view.month_picker_year.saturating_add(step);
            if self.bounds.is_year_disabled(candidate) {
                tracing::debug!(year = candidate, "switch_secondary_panel rejected");
                return Vec::new();
            }
            self.view.month_picker_year = candidate;
        }

        vec![Change::SecondaryPanelSwitched {
            year: self.view.month_picker_year,
            decade_start: self.view.year_picker_decade_start,
            direction: Some(direction),
        }]
    }

    pub fn toggle_year_picker(&mut self) -> Vec<Change> {
        self.view.year_picker_open = !self.view.year_picker_open;
        self.view.year_picker_decade_start = decade_start(self.view.month_picker_year);
        vec![Change::YearPickerToggled {
            open: self.view.year_picker_open,
        }]
    }

    /// Jumps to the month holding `today` and focuses it. Rejected when
    /// today's month is entirely out of bounds.
    pub fn go_to_today(&mut self, today: NaiveDate) -> Vec<Change> {
        if self.bounds.is_month_disabled(today.year(), today.month()) {
            tracing::debug!(%today, "go_to_today rejected");
            return Vec::new();
        }
        self.navigated = today;
        let mut changes = self.switch_month(today.month(), today.year());
        if self.view.year_picker_open {
            self.view.year_picker_open = false;
            changes.push(Change::YearPickerToggled { open: false });
        }
        changes
    }

    /// Moves keyboard focus within the rendered grid. Switching the
    /// displayed month is a separate command.
    pub fn navigate_to(&mut self, date: NaiveDate) -> Vec<Change> {
        self.navigated = date;
        vec![Change::Focus(FocusTarget::Day(date))]
    }
}
