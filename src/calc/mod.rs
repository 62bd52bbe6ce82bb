pub mod boundary;
pub mod dates;
pub mod format;
pub mod layout;

pub use boundary::{BoundsError, DateBounds};
pub use dates::FirstWeekOfYear;
pub use format::{DateFormatter, EnglishFormatter, FormatError, WeekdayFormat};
pub use layout::{MonthGrid, PANEL_COLUMNS, PanelItem, PanelRow, layout_rows};
