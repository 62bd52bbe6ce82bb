use crate::calc::{BoundsError, DateBounds, FirstWeekOfYear, WeekdayFormat};
use crate::data::persistence::Persistable;
use crate::state::{CalendarOptions, CalendarType};
use anyhow::Result;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which days of the week can be picked.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CalendarFilter {
    #[default]
    AllDays,
    /// Only the days listed in `work_week`.
    WorkWeek,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Inclusive lower bound, `yyyy-mm-dd`.
    pub min_date: Option<String>,
    /// Inclusive upper bound, `yyyy-mm-dd`.
    pub max_date: Option<String>,
    pub calendar_type: CalendarType,
    pub first_day_of_week: Weekday,
    pub first_week_of_year: FirstWeekOfYear,
    pub weekday_format: WeekdayFormat,
    pub show_week_numbers: bool,
    pub highlight_current_month: bool,
    pub highlight_selected_month: bool,
    pub show_today_link: bool,
    pub month_picker_visible: bool,
    pub calendar_filter: CalendarFilter,
    pub work_week: Vec<Weekday>,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            min_date: None,
            max_date: None,
            calendar_type: CalendarType::SinglePicker,
            first_day_of_week: Weekday::Sun,
            first_week_of_year: FirstWeekOfYear::FirstDay,
            weekday_format: WeekdayFormat::Narrow,
            show_week_numbers: false,
            highlight_current_month: false,
            highlight_selected_month: false,
            show_today_link: true,
            month_picker_visible: true,
            calendar_filter: CalendarFilter::AllDays,
            work_week: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

/// Reads the `settings` key from config.yaml. Unknown keys are ignored
/// so the file can carry other sections.
#[derive(Serialize, Deserialize, Default, Debug)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub(crate) settings: AppSettings,
}

impl Persistable for ConfigFile {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(ConfigFile::load()?.settings)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        Ok(ConfigFile::load_from(dir)?.settings)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        let file = ConfigFile {
            settings: self.clone(),
        };
        file.save_to(dir)
    }

    /// Parsed bounds plus a diagnostic for every side that failed to parse.
    pub fn bounds(&self) -> (DateBounds, Vec<BoundsError>) {
        DateBounds::parse(self.min_date.as_deref(), self.max_date.as_deref())
    }

    pub fn calendar_options(&self) -> CalendarOptions {
        CalendarOptions {
            first_day_of_week: self.first_day_of_week,
            first_week_of_year: self.first_week_of_year,
            weekday_format: self.weekday_format,
            show_week_numbers: self.show_week_numbers,
            highlight_current_month: self.highlight_current_month,
            highlight_selected_month: self.highlight_selected_month,
            work_week: match self.calendar_filter {
                CalendarFilter::AllDays => None,
                CalendarFilter::WorkWeek => Some(self.work_week.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_app_settings_default_values() {
        let settings = AppSettings::default();
        assert_eq!(settings.calendar_type, CalendarType::SinglePicker);
        assert_eq!(settings.first_day_of_week, Weekday::Sun);
        assert!(settings.show_today_link);
        assert!(settings.month_picker_visible);
        assert!(settings.min_date.is_none());
        assert_eq!(settings.first_week_of_year, FirstWeekOfYear::FirstDay);
        assert_eq!(settings.weekday_format, WeekdayFormat::Narrow);
        assert_eq!(settings.calendar_filter, CalendarFilter::AllDays);
        assert_eq!(settings.work_week.len(), 5);
    }

    #[test]
    fn test_config_file_yaml_roundtrip() {
        let file = ConfigFile {
            settings: AppSettings {
                min_date: Some("2023-05-02".to_string()),
                calendar_type: CalendarType::RangePicker,
                first_day_of_week: Weekday::Mon,
                ..AppSettings::default()
            },
        };
        let yaml = serde_norway::to_string(&file).unwrap();
        assert!(yaml.contains("range-picker"));
        let parsed: ConfigFile = serde_norway::from_str(&yaml).unwrap();
        assert_eq!(parsed.settings, file.settings);
    }

    #[test]
    fn test_missing_settings_key_uses_default() {
        let parsed: ConfigFile = serde_norway::from_str("other: 1").unwrap();
        assert_eq!(parsed.settings, AppSettings::default());
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let yaml = "settings:\n  max_date: 2025-05-03\n  show_week_numbers: true\n";
        let parsed: ConfigFile = serde_norway::from_str(yaml).unwrap();
        assert_eq!(parsed.settings.max_date.as_deref(), Some("2025-05-03"));
        assert!(parsed.settings.show_week_numbers);
        assert!(parsed.settings.show_today_link);
    }

    #[test]
    fn test_save_to_and_load_from() {
        let tmp = TempDir::new().unwrap();
        let settings = AppSettings {
            highlight_current_month: true,
            ..AppSettings::default()
        };
        settings.save_to(tmp.path()).unwrap();
        assert_eq!(AppSettings::load_from(tmp.path()).unwrap(), settings);
    }

    #[test]
    fn test_bounds_parses_and_reports() {
        let settings = AppSettings {
            min_date: Some("2023-05-02".to_string()),
            max_date: Some("not-a-date".to_string()),
            ..AppSettings::default()
        };
        let (bounds, diags) = settings.bounds();
        assert_eq!(bounds.min, NaiveDate::from_ymd_opt(2023, 5, 2));
        assert_eq!(bounds.max, None);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_calendar_options_mirror_settings() {
        let settings = AppSettings {
            first_day_of_week: Weekday::Mon,
            show_week_numbers: true,
            highlight_selected_month: true,
            ..AppSettings::default()
        };
        let opts = settings.calendar_options();
        assert_eq!(opts.first_day_of_week, Weekday::Mon);
        assert!(opts.show_week_numbers);
        assert!(opts.highlight_selected_month);
        assert!(!opts.highlight_current_month);
    }

    #[test]
    fn test_calendar_options_work_week_only_when_filtered() {
        let mut settings = AppSettings {
            work_week: vec![Weekday::Tue, Weekday::Thu],
            ..AppSettings::default()
        };
        assert_eq!(settings.calendar_options().work_week, None);

        settings.calendar_filter = CalendarFilter::WorkWeek;
        assert_eq!(
            settings.calendar_options().work_week,
            Some(vec![Weekday::Tue, Weekday::Thu])
        );
    }

    #[test]
    fn test_week_and_filter_settings_parse_from_yaml() {
        let yaml = "settings:\n  first_week_of_year: first-four-day-week\n  weekday_format: short\n  calendar_filter: work-week\n  work_week: [Mon, Wed]\n";
        let parsed: ConfigFile = serde_norway::from_str(yaml).unwrap();
        let opts = parsed.settings.calendar_options();
        assert_eq!(opts.first_week_of_year, FirstWeekOfYear::FirstFourDayWeek);
        assert_eq!(opts.weekday_format, WeekdayFormat::Short);
        assert_eq!(opts.work_week, Some(vec![Weekday::Mon, Weekday::Wed]));
    }
}
