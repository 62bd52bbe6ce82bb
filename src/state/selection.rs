use crate::calc::dates::to_mdy;
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How clicks on day cells accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarType {
    /// Each selection replaces the previous one.
    #[default]
    SinglePicker,
    /// Selections accumulate, skipping dates already selected.
    RangePicker,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    mode: CalendarType,
    selected: Vec<NaiveDate>,
}

impl Selection {
    pub fn new(mode: CalendarType) -> Self {
        Selection {
            mode,
            selected: Vec::new(),
        }
    }

    /// Applies the mode's selection rule. Returns false when the
    /// selection did not change.
    pub fn select(&mut self, date: NaiveDate) -> bool {
        match self.mode {
            CalendarType::SinglePicker => {
                if self.selected == [date] {
                    return false;
                }
                self.selected = vec![date];
                true
            }
            CalendarType::RangePicker => {
                if self.selected.contains(&date) {
                    return false;
                }
                self.selected.push(date);
                true
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn current(&self) -> &[NaiveDate] {
        &self.selected
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.selected.contains(&date)
    }

    /// Comma-joined `month-day-year` list, in selection order.
    pub fn serialize(&self) -> String {
        self.selected
            .iter()
            .map(|d| to_mdy(*d))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_single_replaces() {
        let mut s = Selection::new(CalendarType::SinglePicker);
        assert!(s.select(d(2024, 1, 15)));
        assert!(s.select(d(2024, 1, 20)));
        assert_eq!(s.current(), &[d(2024, 1, 20)]);
        assert_eq!(s.serialize(), "1-20-2024");
    }

    #[test]
    fn test_single_same_date_is_unchanged() {
        let mut s = Selection::new(CalendarType::SinglePicker);
        s.select(d(2024, 1, 15));
        assert!(!s.select(d(2024, 1, 15)));
        assert_eq!(s.current().len(), 1);
    }

    #[test]
    fn test_range_accumulates_without_duplicates() {
        let mut s = Selection::new(CalendarType::RangePicker);
        assert!(s.select(d(2024, 1, 15)));
        assert!(s.select(d(2024, 1, 20)));
        assert!(!s.select(d(2024, 1, 15)));
        assert_eq!(s.current(), &[d(2024, 1, 15), d(2024, 1, 20)]);
        assert_eq!(s.serialize(), "1-15-2024,1-20-2024");
    }

    #[test]
    fn test_range_idempotent() {
        let mut s = Selection::new(CalendarType::RangePicker);
        for _ in 0..5 {
            s.select(d(2024, 3, 1));
        }
        assert_eq!(s.current(), &[d(2024, 3, 1)]);
    }

    #[test]
    fn test_clear_and_contains() {
        let mut s = Selection::new(CalendarType::RangePicker);
        s.select(d(2024, 3, 1));
        assert!(s.contains(d(2024, 3, 1)));
        s.clear();
        assert!(s.current().is_empty());
        assert_eq!(s.serialize(), "");
    }

    #[test]
    fn test_calendar_type_serde_names() {
        let yaml = serde_norway::to_string(&CalendarType::RangePicker).unwrap();
        assert_eq!(yaml.trim(), "range-picker");
        let parsed: CalendarType = serde_norway::from_str("single-picker").unwrap();
        assert_eq!(parsed, CalendarType::SinglePicker);
    }
}
