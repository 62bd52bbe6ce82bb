use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::time::{Duration, Instant};

/// How long a transition signal stays raised before the panel settles.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(367);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionDirection {
    Previous,
    Next,
}

impl TransitionDirection {
    /// Direction of travel from `current` to `target`; `None` when equal.
    pub fn between<T: Ord>(current: T, target: T) -> Option<Self> {
        match target.cmp(&current) {
            Ordering::Less => Some(TransitionDirection::Previous),
            Ordering::Greater => Some(TransitionDirection::Next),
            Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// The day grid.
    Primary,
    /// The month or year picker.
    Secondary,
}

/// Which cell the rendering layer should give logical focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Day(NaiveDate),
    SecondaryCell(usize),
}

/// A single observable effect of a command. Commands return the list of
/// changes they made; an empty list means the command was a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    MonthSwitched {
        month: u32,
        year: i32,
        direction: Option<TransitionDirection>,
    },
    SecondaryPanelSwitched {
        year: i32,
        decade_start: i32,
        direction: Option<TransitionDirection>,
    },
    YearPickerToggled {
        open: bool,
    },
    Focus(FocusTarget),
    DateSelected(NaiveDate),
    SelectedDatesChanged(String),
    SecondaryPanelCellSelected(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSignal {
    pub direction: TransitionDirection,
    pub raised_at: Instant,
}

/// Transient animation hints for both panels. Last write wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transitions {
    primary: Option<TransitionSignal>,
    secondary: Option<TransitionSignal>,
}

impl Transitions {
    pub fn raise(&mut self, panel: Panel, direction: Option<TransitionDirection>, now: Instant) {
        let signal = direction.map(|direction| TransitionSignal {
            direction,
            raised_at: now,
        });
        match panel {
            Panel::Primary => self.primary = signal,
            Panel::Secondary => self.secondary = signal,
        }
    }

    /// Records the directions carried by `changes`.
    pub fn absorb(&mut self, changes: &[Change], now: Instant) {
        for change in changes {
            match change {
                Change::MonthSwitched { direction, .. } => {
                    self.raise(Panel::Primary, *direction, now)
                }
                Change::SecondaryPanelSwitched { direction, .. } => {
                    self.raise(Panel::Secondary, *direction, now)
                }
                _ => {}
            }
        }
    }

    /// Clears signals older than [`TRANSITION_DURATION`]. Returns true if
    /// anything was cleared so the host knows to redraw.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut cleared = false;
        for slot in [&mut self.primary, &mut self.secondary] {
            let expired = slot.is_some_and(|s| now.saturating_duration_since(s.raised_at) >= TRANSITION_DURATION);
            if expired {
                *slot = None;
                cleared = true;
            }
        }
        cleared
    }

    pub fn get(&self, panel: Panel) -> Option<TransitionDirection> {
        match panel {
            Panel::Primary => self.primary.map(|s| s.direction),
            Panel::Secondary => self.secondary.map(|s| s.direction),
        }
    }
}
