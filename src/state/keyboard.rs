use crate::calc::DateFormatter;
use crate::calc::dates::weekday_column;
use crate::state::calendar::Calendar;
use crate::state::change::{Change, FocusTarget, TransitionDirection};
use chrono::{Datelike, Duration, NaiveDate};

/// Key vocabulary understood by the router, independent of any terminal
/// or browser key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Enter,
    Space,
    PageUp,
    PageDown,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavIcon {
    PreviousMonth,
    NextMonth,
    /// Previous year, or previous decade while the year picker is open.
    PreviousPanel,
    NextPanel,
}

/// The element that received the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    /// The focused day cell, i.e. the navigated date.
    DayCell,
    SecondaryCell,
    SecondaryTitle,
    TodayLink,
    NavIcon(NavIcon),
    /// The picker root. Also reached by keys the other targets ignore.
    Control,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult {
    /// The key was consumed; the host must suppress its default action.
    /// The change list may be empty when the command was rejected.
    Handled(Vec<Change>),
    NotHandled,
}

impl KeyResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, KeyResult::Handled(_))
    }

    pub fn changes(&self) -> &[Change] {
        match self {
            KeyResult::Handled(changes) => changes,
            KeyResult::NotHandled => &[],
        }
    }
}

impl<F: DateFormatter> Calendar<F> {
    /// Routes a key press. Keys a target does not consume bubble up to
    /// the control root, like an unhandled keydown would.
    pub fn handle_key(&mut self, target: KeyTarget, key: Key) -> KeyResult {
        let result = match target {
            KeyTarget::DayCell => self.handle_day_key(key),
            KeyTarget::SecondaryCell => self.handle_secondary_key(key),
            KeyTarget::SecondaryTitle if key == Key::Enter => {
                KeyResult::Handled(self.toggle_year_picker())
            }
            KeyTarget::TodayLink if key == Key::Enter => KeyResult::Handled(self.go_to_today()),
            KeyTarget::NavIcon(icon) if key == Key::Enter => {
                KeyResult::Handled(self.activate_nav_icon(icon))
            }
            _ => KeyResult::NotHandled,
        };
        match result {
            KeyResult::NotHandled => self.handle_control_key(key),
            handled => handled,
        }
    }

    fn handle_control_key(&mut self, key: Key) -> KeyResult {
        let info = self.month_info();
        match key {
            Key::PageUp => KeyResult::Handled(self.switch_month(info.previous.month, info.previous.year)),
            Key::PageDown => KeyResult::Handled(self.switch_month(info.next.month, info.next.year)),
            _ => KeyResult::NotHandled,
        }
    }

    fn activate_nav_icon(&mut self, icon: NavIcon) -> Vec<Change> {
        let info = self.month_info();
        match icon {
            NavIcon::PreviousMonth => self.switch_month(info.previous.month, info.previous.year),
            NavIcon::NextMonth => self.switch_month(info.next.month, info.next.year),
            NavIcon::PreviousPanel => self.switch_secondary_panel(TransitionDirection::Previous),
            NavIcon::NextPanel => self.switch_secondary_panel(TransitionDirection::Next),
        }
    }

    fn handle_day_key(&mut self, key: Key) -> KeyResult {
        let current = self.navigated_date();
        let step = match key {
            Key::Left => -1,
            Key::Right => 1,
            Key::Up => -7,
            Key::Down => 7,
            Key::Home | Key::End => return KeyResult::Handled(self.move_within_week(current, key)),
            Key::Enter | Key::Space => return KeyResult::Handled(self.select_date(current)),
            _ => return KeyResult::NotHandled,
        };
        let Some(target) = current.checked_add_signed(Duration::days(step)) else {
            return KeyResult::Handled(Vec::new());
        };

        let view = *self.view();
        let other_month = target.month() != view.month || target.year() != view.year;
        let leaves_grid = if step.abs() == 1 {
            let col = weekday_column(current.weekday(), self.options.first_day_of_week);
            (step < 0 && col == 0) || (step > 0 && col == 6)
        } else {
            !self.grid().is_some_and(|g| g.contains(target))
        };

        if other_month && leaves_grid {
            KeyResult::Handled(self.follow_into_month(target))
        } else {
            KeyResult::Handled(self.navigator.navigate_to(target))
        }
    }

    /// Focuses `target` and switches the day grid to its month. Nothing
    /// moves when that month is out of bounds.
    fn follow_into_month(&mut self, target: NaiveDate) -> Vec<Change> {
        if self.bounds().is_month_disabled(target.year(), target.month()) {
            tracing::debug!(%target, "keyboard move rejected: month disabled");
            return Vec::new();
        }
        self.navigator.navigate_to(target);
        self.switch_month(target.month(), target.year())
    }

    fn move_within_week(&mut self, current: NaiveDate, key: Key) -> Vec<Change> {
        let Some((first, last)) = self.grid().and_then(|g| g.week_bounds(current)) else {
            return Vec::new();
        };
        let target = if key == Key::Home { first } else { last };
        self.navigator.navigate_to(target)
    }

    fn handle_secondary_key(&mut self, key: Key) -> KeyResult {
        let len = self.secondary_items().len();
        if len == 0 {
            return KeyResult::NotHandled;
        }
        let index = self.secondary_focus.min(len - 1);
        let cols = crate::calc::PANEL_COLUMNS as i64;

        let delta = match key {
            Key::Left => -1,
            Key::Right => 1,
            Key::Up => -cols,
            Key::Down => cols,
            Key::Home => return KeyResult::Handled(self.focus_secondary(0)),
            Key::End => return KeyResult::Handled(self.focus_secondary(len - 1)),
            Key::Enter => {
                let detail = self.secondary_items()[index].detail;
                let mut changes = vec![Change::SecondaryPanelCellSelected(detail)];
                changes.extend(self.activate_secondary_cell(detail));
                return KeyResult::Handled(changes);
            }
            _ => return KeyResult::NotHandled,
        };

        let moved = index as i64 + delta;
        if (0..len as i64).contains(&moved) {
            return KeyResult::Handled(self.focus_secondary(moved as usize));
        }

        let direction = if moved < 0 {
            TransitionDirection::Previous
        } else {
            TransitionDirection::Next
        };
        let mut changes = self.switch_secondary_panel(direction);
        if changes.is_empty() {
            return KeyResult::Handled(changes);
        }
        // Horizontal moves wrap through the item list; vertical moves keep
        // the column, clamped onto the last real cell.
        let len_after = self.secondary_items().len() as i64;
        let wrapped = if delta.abs() == 1 {
            moved.rem_euclid(len_after)
        } else {
            let slots = (len_after + cols - 1) / cols * cols;
            moved.rem_euclid(slots).min(len_after - 1)
        };
        changes.extend(self.focus_secondary(wrapped as usize));
        KeyResult::Handled(changes)
    }

    fn focus_secondary(&mut self, index: usize) -> Vec<Change> {
        self.secondary_focus = index;
        vec![Change::Focus(FocusTarget::SecondaryCell(index))]
    }
}
