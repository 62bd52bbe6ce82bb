pub mod calendar;
pub mod change;
pub mod keyboard;
pub mod navigation;
pub mod selection;

pub use calendar::{Calendar, CalendarOptions, DayCellInfo, SecondaryCellInfo};
pub use change::{Change, FocusTarget, Panel, TransitionDirection};
pub use keyboard::{Key, KeyTarget, NavIcon};
pub use navigation::{CalendarViewState, MonthInfo, MonthPickerInfo, YearPickerInfo};
pub use selection::CalendarType;
