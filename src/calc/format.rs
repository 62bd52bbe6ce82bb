use crate::calc::dates::decade_end;
use crate::calc::layout::PanelItem;
use chrono::{Month, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Width of the weekday labels above the day grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WeekdayFormat {
    /// One letter: `S M T W T F S`.
    #[default]
    Narrow,
    /// Two letters: `Su Mo Tu We Th Fr Sa`.
    Short,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid month index: {0} (must be 1-12)")]
    InvalidIndex(u32),
}

/// Produces the labels the picker shows. Implementations must be pure:
/// the same input always yields the same label.
pub trait DateFormatter {
    fn month_name(&self, month: u32) -> Result<String, FormatError>;

    fn year_label(&self, year: i32) -> String;

    /// Label used in the month picker cells.
    fn month_abbrev(&self, month: u32) -> Result<String, FormatError> {
        Ok(self.month_name(month)?.chars().take(3).collect())
    }

    fn weekday_label(&self, day: Weekday, format: WeekdayFormat) -> String {
        let width = match format {
            WeekdayFormat::Narrow => 1,
            WeekdayFormat::Short => 2,
        };
        day.to_string().chars().take(width).collect()
    }

    fn months_of_year(&self) -> Vec<PanelItem> {
        (1..=12u32)
            .filter_map(|m| {
                self.month_abbrev(m)
                    .ok()
                    .map(|label| PanelItem::new(label, m as i32))
            })
            .collect()
    }

    fn years_of_decade(&self, decade_start: i32) -> Vec<PanelItem> {
        (decade_start..=decade_end(decade_start))
            .map(|y| PanelItem::new(self.year_label(y), y))
            .collect()
    }

    fn month_title(&self, month: u32, year: i32) -> Result<String, FormatError> {
        Ok(format!("{} {}", self.month_name(month)?, self.year_label(year)))
    }

    fn year_picker_title(&self, year: i32) -> String {
        format!(
            "Year picker, {} selected. Switch to decade picker.",
            self.year_label(year)
        )
    }

    fn decade_picker_title(&self, decade_start: i32) -> String {
        format!(
            "Range of years, {} to {} selected. Switch to year picker.",
            self.year_label(decade_start),
            self.year_label(decade_end(decade_start))
        )
    }
}

/// English month names straight from chrono.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishFormatter;

impl DateFormatter for EnglishFormatter {
    fn month_name(&self, month: u32) -> Result<String, FormatError> {
        u8::try_from(month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name().to_string())
            .ok_or(FormatError::InvalidIndex(month))
    }

    fn year_label(&self, year: i32) -> String {
        year.to_string()
    }
}
