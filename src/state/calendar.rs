use crate::calc::{
    DateBounds, DateFormatter, EnglishFormatter, FirstWeekOfYear, MonthGrid, PANEL_COLUMNS,
    PanelItem, PanelRow, WeekdayFormat, layout_rows,
};
use crate::state::change::{Change, Panel, TransitionDirection, Transitions};
use crate::state::navigation::{
    CalendarViewState, MonthInfo, MonthPickerInfo, Navigator, YearPickerInfo,
};
use crate::state::selection::{CalendarType, Selection};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::time::Instant;

/// Presentation switches that change what the helpers report, never
/// how navigation behaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarOptions {
    pub first_day_of_week: Weekday,
    pub first_week_of_year: FirstWeekOfYear,
    pub weekday_format: WeekdayFormat,
    pub show_week_numbers: bool,
    pub highlight_current_month: bool,
    pub highlight_selected_month: bool,
    /// When set, only these weekdays can be selected.
    pub work_week: Option<Vec<Weekday>>,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        CalendarOptions {
            first_day_of_week: Weekday::Sun,
            first_week_of_year: FirstWeekOfYear::FirstDay,
            weekday_format: WeekdayFormat::Narrow,
            show_week_numbers: false,
            highlight_current_month: false,
            highlight_selected_month: false,
            work_week: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCellInfo {
    pub date: NaiveDate,
    pub label: String,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
    pub is_focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryCellInfo {
    pub label: String,
    pub detail: i32,
    pub accessible_label: String,
    pub is_current: bool,
    pub is_selected: bool,
    pub is_disabled: bool,
}

/// The picker engine: navigation, selection and the secondary-panel
/// focus index behind one command surface. Hosts call the commands,
/// apply the returned changes and read the query helpers to draw.
#[derive(Debug, Clone)]
pub struct Calendar<F: DateFormatter = EnglishFormatter> {
    pub(crate) navigator: Navigator,
    pub(crate) selection: Selection,
    pub(crate) formatter: F,
    pub(crate) options: CalendarOptions,
    pub(crate) today: NaiveDate,
    pub(crate) secondary_focus: usize,
    transitions: Transitions,
}

impl Calendar<EnglishFormatter> {
    pub fn new(
        month: u32,
        year: i32,
        bounds: DateBounds,
        calendar_type: CalendarType,
        options: CalendarOptions,
        today: NaiveDate,
    ) -> Self {
        Calendar {
            navigator: Navigator::new(month, year, bounds),
            selection: Selection::new(calendar_type),
            formatter: EnglishFormatter,
            options,
            today,
            secondary_focus: 0,
            transitions: Transitions::default(),
        }
    }
}

impl<F: DateFormatter> Calendar<F> {
    pub fn with_formatter<G: DateFormatter>(self, formatter: G) -> Calendar<G> {
        Calendar {
            navigator: self.navigator,
            selection: self.selection,
            formatter,
            options: self.options,
            today: self.today,
            secondary_focus: self.secondary_focus,
            transitions: self.transitions,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    pub fn switch_month(&mut self, month: u32, year: i32) -> Vec<Change> {
        let changes = self.navigator.switch_month(month, year);
        self.apply(changes)
    }

    pub fn switch_secondary_panel(&mut self, direction: TransitionDirection) -> Vec<Change> {
        let changes = self.navigator.switch_secondary_panel(direction);
        self.apply(changes)
    }

    pub fn toggle_year_picker(&mut self) -> Vec<Change> {
        let changes = self.navigator.toggle_year_picker();
        self.apply(changes)
    }

    pub fn go_to_today(&mut self) -> Vec<Change> {
        let changes = self.navigator.go_to_today(self.today);
        self.apply(changes)
    }

    /// Selects `date` unless it is out of bounds or filtered out.
    pub fn select_date(&mut self, date: NaiveDate) -> Vec<Change> {
        if self.is_day_disabled(date) {
            tracing::debug!(%date, "select rejected: date disabled");
            return Vec::new();
        }
        let mut changes = vec![Change::DateSelected(date)];
        if self.selection.select(date) {
            changes.push(Change::SelectedDatesChanged(self.selection.serialize()));
        }
        changes
    }

    pub fn clear_selection(&mut self) -> Vec<Change> {
        if self.selection.current().is_empty() {
            return Vec::new();
        }
        self.selection.clear();
        vec![Change::SelectedDatesChanged(String::new())]
    }

    /// Routes an activated secondary-panel cell into a month switch.
    /// A year cell closes the year picker and shows that year, keeping
    /// the displayed month when it is in bounds and otherwise falling
    /// back to the year's first enabled month.
    pub fn activate_secondary_cell(&mut self, detail: i32) -> Vec<Change> {
        let view = *self.navigator.view();
        if !view.year_picker_open {
            let Ok(month) = u32::try_from(detail) else {
                return Vec::new();
            };
            return self.switch_month(month, view.month_picker_year);
        }

        let bounds = *self.navigator.bounds();
        let month = if bounds.is_month_disabled(detail, view.month) {
            (1..=12).find(|m| !bounds.is_month_disabled(detail, *m))
        } else {
            Some(view.month)
        };
        let Some(month) = month else {
            tracing::debug!(year = detail, "year cell rejected: year disabled");
            return Vec::new();
        };

        let mut changes = self.navigator.toggle_year_picker();
        changes.extend(self.navigator.switch_month(month, detail));
        self.apply(changes)
    }

    /// Clears expired transition signals. Returns true when the host
    /// should redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.transitions.tick(now)
    }

    pub(crate) fn apply(&mut self, changes: Vec<Change>) -> Vec<Change> {
        self.transitions.absorb(&changes, Instant::now());
        let panel_changed = changes.iter().any(|c| {
            matches!(
                c,
                Change::SecondaryPanelSwitched { .. } | Change::YearPickerToggled { .. }
            )
        });
        if panel_changed {
            self.secondary_focus = 0;
        }
        changes
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    pub fn view(&self) -> &CalendarViewState {
        self.navigator.view()
    }

    pub fn navigated_date(&self) -> NaiveDate {
        self.navigator.navigated_date()
    }

    pub fn bounds(&self) -> &DateBounds {
        self.navigator.bounds()
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn options(&self) -> &CalendarOptions {
        &self.options
    }

    pub fn formatter(&self) -> &F {
        &self.formatter
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn secondary_focus(&self) -> usize {
        self.secondary_focus
    }

    pub fn transition(&self, panel: Panel) -> Option<TransitionDirection> {
        self.transitions.get(panel)
    }

    pub fn month_info(&self) -> MonthInfo {
        self.navigator.month_info()
    }

    pub fn month_picker_info(&self) -> MonthPickerInfo {
        self.navigator.month_picker_info()
    }

    pub fn year_picker_info(&self) -> YearPickerInfo {
        self.navigator.year_picker_info()
    }

    /// True when the day grid already shows today's month.
    pub fn is_today(&self) -> bool {
        let view = self.view();
        view.month == self.today.month() && view.year == self.today.year()
    }

    pub fn grid(&self) -> Option<MonthGrid> {
        let view = self.view();
        MonthGrid::new(view.year, view.month, self.options.first_day_of_week)
    }

    /// Out of bounds, or on a weekday outside the work week filter.
    pub fn is_day_disabled(&self, date: NaiveDate) -> bool {
        self.bounds().is_date_disabled(date)
            || self
                .options
                .work_week
                .as_ref()
                .is_some_and(|days| !days.contains(&date.weekday()))
    }

    /// Header labels in grid column order.
    pub fn weekday_labels(&self) -> Vec<String> {
        let first = self.options.first_day_of_week;
        std::iter::successors(Some(first), |d| Some(d.succ()))
            .take(7)
            .map(|d| self.formatter.weekday_label(d, self.options.weekday_format))
            .collect()
    }

    /// Row week numbers, or `None` when they are switched off.
    pub fn week_numbers(&self, grid: &MonthGrid) -> Option<Vec<u32>> {
        self.options
            .show_week_numbers
            .then(|| grid.week_numbers(self.options.first_week_of_year))
    }

    pub fn title(&self) -> String {
        let view = self.view();
        self.formatter
            .month_title(view.month, view.year)
            .unwrap_or_else(|_| self.formatter.year_label(view.year))
    }

    pub fn secondary_title(&self) -> String {
        if self.view().year_picker_open {
            let info = self.year_picker_info();
            format!(
                "{}-{}",
                self.formatter.year_label(info.decade_start),
                self.formatter.year_label(info.decade_end)
            )
        } else {
            self.formatter.year_label(self.view().month_picker_year)
        }
    }

    pub fn secondary_title_label(&self) -> String {
        if self.view().year_picker_open {
            self.formatter
                .decade_picker_title(self.view().year_picker_decade_start)
        } else {
            self.formatter
                .year_picker_title(self.view().month_picker_year)
        }
    }

    pub fn month_text(&self) -> Vec<PanelRow> {
        layout_rows(&self.formatter.months_of_year(), PANEL_COLUMNS)
    }

    pub fn decade_text(&self, decade_start: i32) -> Vec<PanelRow> {
        layout_rows(&self.formatter.years_of_decade(decade_start), PANEL_COLUMNS)
    }

    /// Cells of whichever secondary panel is showing, in focus order.
    pub fn secondary_items(&self) -> Vec<PanelItem> {
        if self.view().year_picker_open {
            self.formatter
                .years_of_decade(self.view().year_picker_decade_start)
        } else {
            self.formatter.months_of_year()
        }
    }

    pub fn secondary_rows(&self) -> Vec<PanelRow> {
        if self.view().year_picker_open {
            self.decade_text(self.view().year_picker_decade_start)
        } else {
            self.month_text()
        }
    }

    pub fn day_cell_info(&self, date: NaiveDate) -> DayCellInfo {
        let view = self.view();
        DayCellInfo {
            date,
            label: date.day().to_string(),
            in_month: date.month() == view.month && date.year() == view.year,
            is_today: date == self.today,
            is_selected: self.selection.contains(date),
            is_disabled: self.is_day_disabled(date),
            is_focused: date == self.navigated_date(),
        }
    }

    pub fn secondary_cell_info(&self, item: &PanelItem) -> SecondaryCellInfo {
        let view = self.view();
        let bounds = self.bounds();
        let (is_current, is_selected, is_disabled, accessible_label) = if view.year_picker_open {
            (
                item.detail == self.today.year(),
                item.detail == view.year,
                bounds.is_year_disabled(item.detail),
                self.formatter.year_label(item.detail),
            )
        } else {
            let month = item.detail as u32;
            let year = view.month_picker_year;
            (
                year == self.today.year() && month == self.today.month(),
                year == view.year && month == view.month,
                bounds.is_month_disabled(year, month),
                self.formatter
                    .month_title(month, year)
                    .unwrap_or_else(|_| item.label.clone()),
            )
        };
        SecondaryCellInfo {
            label: item.label.clone(),
            detail: item.detail,
            accessible_label,
            is_current: self.options.highlight_current_month && is_current,
            is_selected: self.options.highlight_selected_month && is_selected,
            is_disabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::change::FocusTarget;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn cal(calendar_type: CalendarType) -> Calendar {
        Calendar::new(
            1,
            2024,
            DateBounds::default(),
            calendar_type,
            CalendarOptions::default(),
            d(2024, 1, 10),
        )
    }

    fn bounded() -> Calendar {
        Calendar::new(
            6,
            2023,
            DateBounds::new(Some(d(2023, 5, 2)), Some(d(2025, 5, 3))),
            CalendarType::SinglePicker,
            CalendarOptions::default(),
            d(2024, 1, 10),
        )
    }

    #[test]
    fn test_range_picker_scenario() {
        let mut c = cal(CalendarType::RangePicker);
        c.select_date(d(2024, 1, 15));
        c.select_date(d(2024, 1, 20));
        let changes = c.select_date(d(2024, 1, 15));
        assert_eq!(changes, vec![Change::DateSelected(d(2024, 1, 15))]);
        assert_eq!(c.selection().serialize(), "1-15-2024,1-20-2024");
    }

    #[test]
    fn test_select_emits_serialized_change() {
        let mut c = cal(CalendarType::SinglePicker);
        let changes = c.select_date(d(2024, 1, 15));
        assert_eq!(
            changes,
            vec![
                Change::DateSelected(d(2024, 1, 15)),
                Change::SelectedDatesChanged("1-15-2024".to_string()),
            ]
        );
    }

    #[test]
    fn test_select_disabled_date_rejected() {
        let mut c = bounded();
        assert!(c.select_date(d(2023, 5, 1)).is_empty());
        assert!(c.selection().current().is_empty());
        assert!(!c.select_date(d(2023, 5, 2)).is_empty());
    }

    #[test]
    fn test_clear_selection() {
        let mut c = cal(CalendarType::RangePicker);
        assert!(c.clear_selection().is_empty());
        c.select_date(d(2024, 1, 15));
        assert_eq!(
            c.clear_selection(),
            vec![Change::SelectedDatesChanged(String::new())]
        );
    }

    #[test]
    fn test_toggle_and_page_decade_scenario() {
        let mut c = cal(CalendarType::SinglePicker);
        c.toggle_year_picker();
        assert_eq!(c.view().year_picker_decade_start, 2020);
        c.switch_secondary_panel(TransitionDirection::Next);
        assert_eq!(c.view().year_picker_decade_start, 2030);
        assert_eq!(c.transition(Panel::Secondary), Some(TransitionDirection::Next));
        assert_eq!(c.transition(Panel::Primary), None);
    }

    #[test]
    fn test_switch_month_raises_primary_transition() {
        let mut c = cal(CalendarType::SinglePicker);
        c.switch_month(12, 2023);
        assert_eq!(c.transition(Panel::Primary), Some(TransitionDirection::Previous));
        assert_eq!(c.transition(Panel::Secondary), Some(TransitionDirection::Previous));
    }

    #[test]
    fn test_tick_clears_transitions_eventually() {
        let mut c = cal(CalendarType::SinglePicker);
        c.switch_month(2, 2024);
        assert!(c.tick(Instant::now() + std::time::Duration::from_secs(1)));
        assert_eq!(c.transition(Panel::Primary), None);
    }

    #[test]
    fn test_panel_change_resets_secondary_focus() {
        let mut c = cal(CalendarType::SinglePicker);
        c.secondary_focus = 7;
        c.switch_secondary_panel(TransitionDirection::Next);
        assert_eq!(c.secondary_focus(), 0);
        c.secondary_focus = 3;
        c.toggle_year_picker();
        assert_eq!(c.secondary_focus(), 0);
    }

    #[test]
    fn test_activate_month_cell_switches_month() {
        let mut c = cal(CalendarType::SinglePicker);
        c.switch_secondary_panel(TransitionDirection::Next);
        let changes = c.activate_secondary_cell(3);
        assert_eq!((c.view().month, c.view().year), (3, 2025));
        assert_eq!(changes.last(), Some(&Change::Focus(FocusTarget::Day(d(2025, 3, 1)))));
    }

    #[test]
    fn test_activate_year_cell_closes_picker() {
        let mut c = cal(CalendarType::SinglePicker);
        c.toggle_year_picker();
        let changes = c.activate_secondary_cell(2027);
        assert!(!c.view().year_picker_open);
        assert_eq!((c.view().month, c.view().year), (1, 2027));
        assert_eq!(changes[0], Change::YearPickerToggled { open: false });
    }

    #[test]
    fn test_activate_year_cell_falls_back_to_enabled_month() {
        let mut c = bounded();
        c.switch_month(1, 2024);
        c.toggle_year_picker();
        c.activate_secondary_cell(2025);
        assert_eq!((c.view().month, c.view().year), (1, 2025));
        c.switch_month(12, 2024);
        c.toggle_year_picker();
        // December 2025 is out of bounds; January 2025 is the first enabled month.
        c.activate_secondary_cell(2025);
        assert_eq!((c.view().month, c.view().year), (1, 2025));
    }

    #[test]
    fn test_activate_disabled_year_is_noop() {
        let mut c = bounded();
        c.toggle_year_picker();
        let before = *c.view();
        assert!(c.activate_secondary_cell(2030).is_empty());
        assert_eq!(*c.view(), before);
    }

    #[test]
    fn test_activate_disabled_month_is_noop() {
        let mut c = bounded();
        assert!(c.activate_secondary_cell(4).is_empty());
        assert_eq!(c.view().month, 6);
    }

    #[test]
    fn test_go_to_today() {
        let mut c = cal(CalendarType::SinglePicker);
        c.switch_month(7, 2030);
        assert!(!c.is_today());
        c.go_to_today();
        assert!(c.is_today());
        assert_eq!(c.navigated_date(), d(2024, 1, 10));
    }

    #[test]
    fn test_go_to_today_same_month_closes_year_picker() {
        let mut c = cal(CalendarType::SinglePicker);
        c.toggle_year_picker();
        c.secondary_focus = 4;
        let changes = c.go_to_today();
        assert_eq!(
            changes,
            vec![
                Change::MonthSwitched {
                    month: 1,
                    year: 2024,
                    direction: None,
                },
                Change::Focus(FocusTarget::Day(d(2024, 1, 10))),
                Change::YearPickerToggled { open: false },
            ]
        );
        assert!(!c.view().year_picker_open);
        assert_eq!(c.secondary_focus(), 0);
        assert_eq!(c.transition(Panel::Primary), None);
    }

    #[test]
    fn test_work_week_filter_disables_weekends() {
        let mut c = cal(CalendarType::RangePicker);
        c.options.work_week = Some(vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ]);
        // 2024-01-13 is a Saturday, 2024-01-15 a Monday.
        assert!(c.day_cell_info(d(2024, 1, 13)).is_disabled);
        assert!(!c.day_cell_info(d(2024, 1, 15)).is_disabled);
        assert!(c.select_date(d(2024, 1, 13)).is_empty());
        assert!(c.select_date(d(2024, 1, 14)).is_empty());
        assert!(!c.select_date(d(2024, 1, 15)).is_empty());
        assert_eq!(c.selection().current(), &[d(2024, 1, 15)]);
    }

    #[test]
    fn test_work_week_filter_combines_with_bounds() {
        let mut c = bounded();
        c.options.work_week = Some(vec![Weekday::Tue]);
        // 2023-05-02 is the minimum and a Tuesday; 2023-05-09 a Tuesday too.
        assert!(!c.is_day_disabled(d(2023, 5, 2)));
        assert!(c.is_day_disabled(d(2023, 5, 3)));
        assert!(c.is_day_disabled(d(2023, 4, 25)));
        assert!(!c.is_day_disabled(d(2023, 5, 9)));
    }

    #[test]
    fn test_weekday_labels_follow_options() {
        let mut c = cal(CalendarType::SinglePicker);
        assert_eq!(c.weekday_labels().join(""), "SMTWTFS");
        c.options.first_day_of_week = Weekday::Mon;
        c.options.weekday_format = WeekdayFormat::Short;
        assert_eq!(c.weekday_labels().join(" "), "Mo Tu We Th Fr Sa Su");
    }

    #[test]
    fn test_week_numbers_follow_options() {
        let mut c = cal(CalendarType::SinglePicker);
        let grid = c.grid().unwrap();
        assert_eq!(c.week_numbers(&grid), None);
        c.options.show_week_numbers = true;
        c.switch_month(1, 2025);
        let grid = c.grid().unwrap();
        assert_eq!(c.week_numbers(&grid), Some(vec![1, 2, 3, 4, 5]));
        c.options.first_week_of_year = FirstWeekOfYear::FirstFullWeek;
        assert_eq!(c.week_numbers(&grid), Some(vec![52, 1, 2, 3, 4]));
    }

    #[test]
    fn test_secondary_titles() {
        let mut c = cal(CalendarType::SinglePicker);
        assert_eq!(c.title(), "January 2024");
        assert_eq!(c.secondary_title(), "2024");
        c.toggle_year_picker();
        assert_eq!(c.secondary_title(), "2020-2030");
        assert_eq!(
            c.secondary_title_label(),
            "Range of years, 2020 to 2030 selected. Switch to year picker."
        );
    }

    #[test]
    fn test_secondary_rows_follow_picker() {
        let mut c = cal(CalendarType::SinglePicker);
        assert_eq!(c.secondary_items().len(), 12);
        assert_eq!(c.secondary_rows().len(), 3);
        c.toggle_year_picker();
        let rows = c.secondary_rows();
        assert_eq!(c.secondary_items().len(), 11);
        assert_eq!(rows[2][3], None);
    }

    #[test]
    fn test_day_cell_info() {
        let mut c = cal(CalendarType::SinglePicker);
        c.select_date(d(2024, 1, 15));
        let info = c.day_cell_info(d(2024, 1, 15));
        assert!(info.in_month && info.is_selected && !info.is_today && !info.is_disabled);
        assert!(c.day_cell_info(d(2024, 1, 10)).is_today);
        assert!(c.day_cell_info(d(2024, 1, 1)).is_focused);
        assert!(!c.day_cell_info(d(2023, 12, 31)).in_month);
    }

    #[test]
    fn test_secondary_cell_info_highlights_follow_options() {
        let c = cal(CalendarType::SinglePicker);
        let item = PanelItem::new("Jan", 1);
        let info = c.secondary_cell_info(&item);
        assert!(!info.is_current && !info.is_selected);
        assert_eq!(info.accessible_label, "January 2024");

        let mut c = c;
        c.options.highlight_current_month = true;
        c.options.highlight_selected_month = true;
        let info = c.secondary_cell_info(&item);
        assert!(info.is_current && info.is_selected);
    }

    #[test]
    fn test_secondary_cell_info_disabled() {
        let c = bounded();
        assert!(c.secondary_cell_info(&PanelItem::new("Apr", 4)).is_disabled);
        assert!(!c.secondary_cell_info(&PanelItem::new("May", 5)).is_disabled);
    }

    #[test]
    fn test_with_formatter_keeps_state() {
        struct Upper;
        impl DateFormatter for Upper {
            fn month_name(&self, month: u32) -> Result<String, crate::calc::FormatError> {
                EnglishFormatter.month_name(month).map(|s| s.to_uppercase())
            }
            fn year_label(&self, year: i32) -> String {
                year.to_string()
            }
        }
        let mut c = cal(CalendarType::SinglePicker);
        c.switch_month(3, 2024);
        let c = c.with_formatter(Upper);
        assert_eq!(c.title(), "MARCH 2024");
        assert_eq!(c.view().month, 3);
    }
}
