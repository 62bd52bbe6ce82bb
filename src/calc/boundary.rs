use crate::calc::dates::{decade_end, first_of_month, last_of_month};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundsError {
    #[error("malformed {field} '{value}': expected yyyy-mm-dd")]
    Malformed { field: &'static str, value: String },
}

/// Optional inclusive min/max window. Either side may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl DateBounds {
    pub fn new(min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        DateBounds { min, max }
    }

    /// Parses ISO `yyyy-mm-dd` strings. A malformed side is logged,
    /// reported in the returned diagnostics and treated as absent.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> (Self, Vec<BoundsError>) {
        let mut diagnostics = Vec::new();
        let mut parse_side = |field: &'static str, raw: Option<&str>| {
            let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
            match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(e) => {
                    tracing::warn!(field, value = raw, error = %e, "ignoring malformed date bound");
                    diagnostics.push(BoundsError::Malformed {
                        field,
                        value: raw.to_string(),
                    });
                    None
                }
            }
        };
        let min = parse_side("min-date", min);
        let max = parse_side("max-date", max);
        (DateBounds { min, max }, diagnostics)
    }

    pub fn is_date_disabled(&self, date: NaiveDate) -> bool {
        self.min.is_some_and(|min| date < min) || self.max.is_some_and(|max| date > max)
    }

    /// A month is disabled only when none of its days fall inside the window.
    pub fn is_month_disabled(&self, year: i32, month: u32) -> bool {
        let (Some(first), Some(last)) = (first_of_month(year, month), last_of_month(year, month))
        else {
            return true;
        };
        self.min.is_some_and(|min| last < min) || self.max.is_some_and(|max| first > max)
    }

    pub fn is_year_disabled(&self, year: i32) -> bool {
        (1..=12).all(|month| self.is_month_disabled(year, month))
    }

    pub fn is_decade_disabled(&self, decade_start: i32) -> bool {
        (decade_start..=decade_end(decade_start)).all(|year| self.is_year_disabled(year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn window() -> DateBounds {
        DateBounds::new(Some(d(2023, 5, 2)), Some(d(2025, 5, 3)))
    }

    #[test]
    fn test_unbounded_never_disables() {
        let b = DateBounds::default();
        assert!(!b.is_date_disabled(d(1, 1, 1)));
        assert!(!b.is_month_disabled(9999, 12));
        assert!(!b.is_decade_disabled(-1000));
    }

    #[test]
    fn test_is_date_disabled_matches_window() {
        let b = window();
        let mut date = d(2023, 4, 25);
        while date <= d(2025, 5, 10) {
            let expected = date < d(2023, 5, 2) || date > d(2025, 5, 3);
            assert_eq!(b.is_date_disabled(date), expected, "{date}");
            date = date.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_one_sided_bounds() {
        let only_min = DateBounds::new(Some(d(2024, 1, 10)), None);
        assert!(only_min.is_date_disabled(d(2024, 1, 9)));
        assert!(!only_min.is_date_disabled(d(3000, 1, 1)));

        let only_max = DateBounds::new(None, Some(d(2024, 1, 10)));
        assert!(only_max.is_date_disabled(d(2024, 1, 11)));
        assert!(!only_max.is_date_disabled(d(1000, 1, 1)));
    }

    #[test]
    fn test_boundary_touching_months_stay_enabled() {
        let b = window();
        assert!(b.is_month_disabled(2023, 4));
        assert!(!b.is_month_disabled(2023, 5));
        assert!(!b.is_month_disabled(2025, 5));
        assert!(b.is_month_disabled(2025, 6));
    }

    #[test]
    fn test_month_disabled_iff_first_and_last_day_disabled() {
        let b = window();
        for year in 2022..=2026 {
            for month in 1..=12 {
                let first = first_of_month(year, month).unwrap();
                let last = last_of_month(year, month).unwrap();
                let expected = (b.min.is_some_and(|m| last < m))
                    || (b.max.is_some_and(|m| first > m));
                assert_eq!(b.is_month_disabled(year, month), expected);
                if expected {
                    assert!(b.is_date_disabled(first) && b.is_date_disabled(last));
                }
            }
        }
    }

    #[test]
    fn test_is_year_disabled() {
        let b = window();
        assert!(b.is_year_disabled(2022));
        assert!(!b.is_year_disabled(2023));
        assert!(!b.is_year_disabled(2025));
        assert!(b.is_year_disabled(2026));
    }

    #[test]
    fn test_is_decade_disabled_uses_eleven_years() {
        // 2030 is the 11th year of the 2020 decade.
        let b = DateBounds::new(Some(d(2030, 12, 31)), None);
        assert!(!b.is_decade_disabled(2020));
        assert!(b.is_decade_disabled(2010));

        let b = DateBounds::new(None, Some(d(2020, 1, 1)));
        assert!(!b.is_decade_disabled(2010));
        assert!(!b.is_decade_disabled(2020));
        assert!(b.is_decade_disabled(2030));
    }

    #[test]
    fn test_parse_valid_bounds() {
        let (b, diags) = DateBounds::parse(Some("2023-05-02"), Some("2025-05-03"));
        assert_eq!(b, window());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_parse_malformed_bound_is_absent() {
        let (b, diags) = DateBounds::parse(Some("05/02/2023"), Some("2025-05-03"));
        assert_eq!(b.min, None);
        assert_eq!(b.max, Some(d(2025, 5, 3)));
        assert_eq!(
            diags,
            vec![BoundsError::Malformed {
                field: "min-date",
                value: "05/02/2023".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_blank_is_absent_without_diagnostic() {
        let (b, diags) = DateBounds::parse(Some("  "), None);
        assert_eq!(b, DateBounds::default());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_bounds_error_message() {
        let e = BoundsError::Malformed {
            field: "max-date",
            value: "nope".to_string(),
        };
        assert_eq!(e.to_string(), "malformed max-date 'nope': expected yyyy-mm-dd");
    }

    #[test]
    fn test_years_chrono_cannot_represent_are_disabled() {
        let b = DateBounds::default();
        assert!(b.is_month_disabled(i32::MAX, 1));
        assert!(b.is_year_disabled(i32::MAX));
        assert!(b.is_decade_disabled(i32::MAX - 5));
        assert!(!b.is_year_disabled(262_000));
    }
}
