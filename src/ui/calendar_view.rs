use crate::data::AppSettings;
use crate::state::{
    Calendar, Change, DayCellInfo, FocusTarget, Key, KeyTarget, NavIcon, Panel,
    SecondaryCellInfo, TransitionDirection,
};
use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::io::Stdout;
use std::time::{Duration as StdDuration, Instant};

// Focused element highlight
const FOCUS_BG: Color = Color::Rgb(97, 175, 239);

const HELP: &str =
    "Tab/Shift-Tab focus  arrows move  Enter select  PgUp/PgDn month  Del clear  q quit";

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        match code {
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::Enter => Key::Enter,
            KeyCode::Char(' ') => Key::Space,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            _ => Key::Other,
        }
    }
}

/// Focusable parts of the picker, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Days,
    PreviousMonth,
    NextMonth,
    TodayLink,
    SecondaryTitle,
    PreviousPanel,
    NextPanel,
    SecondaryCells,
}

const ZONES: [Zone; 8] = [
    Zone::Days,
    Zone::PreviousMonth,
    Zone::NextMonth,
    Zone::TodayLink,
    Zone::SecondaryTitle,
    Zone::PreviousPanel,
    Zone::NextPanel,
    Zone::SecondaryCells,
];

impl Zone {
    fn target(self) -> KeyTarget {
        match self {
            Zone::Days => KeyTarget::DayCell,
            Zone::PreviousMonth => KeyTarget::NavIcon(NavIcon::PreviousMonth),
            Zone::NextMonth => KeyTarget::NavIcon(NavIcon::NextMonth),
            Zone::TodayLink => KeyTarget::TodayLink,
            Zone::SecondaryTitle => KeyTarget::SecondaryTitle,
            Zone::PreviousPanel => KeyTarget::NavIcon(NavIcon::PreviousPanel),
            Zone::NextPanel => KeyTarget::NavIcon(NavIcon::NextPanel),
            Zone::SecondaryCells => KeyTarget::SecondaryCell,
        }
    }

    /// Zones whose logical focus follows `Change::Focus`.
    fn tracks_focus(self) -> bool {
        matches!(self, Zone::Days | Zone::SecondaryCells)
    }
}

pub struct App {
    pub calendar: Calendar,
    zone: Zone,
    show_today_link: bool,
    month_picker_visible: bool,
    /// One-line message under the picker. Cleared on next keypress.
    pub status: Option<String>,
}

impl App {
    pub fn new(calendar: Calendar, settings: &AppSettings) -> Self {
        App {
            calendar,
            zone: Zone::Days,
            show_today_link: settings.show_today_link,
            month_picker_visible: settings.month_picker_visible,
            status: None,
        }
    }

    fn is_available(&self, zone: Zone) -> bool {
        match zone {
            Zone::TodayLink => self.show_today_link,
            Zone::SecondaryTitle | Zone::PreviousPanel | Zone::NextPanel | Zone::SecondaryCells => {
                self.month_picker_visible
            }
            Zone::Days | Zone::PreviousMonth | Zone::NextMonth => true,
        }
    }

    fn cycle_zone(&mut self, step: i32) {
        let n = ZONES.len() as i32;
        let pos = ZONES.iter().position(|z| *z == self.zone).unwrap_or(0) as i32;
        for i in 1..=n {
            let zone = ZONES[(pos + step * i).rem_euclid(n) as usize];
            if self.is_available(zone) {
                self.zone = zone;
                return;
            }
        }
    }

    /// Returns true when the picker should close.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        self.status = None;

        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => {
                self.cycle_zone(1);
                return false;
            }
            KeyCode::BackTab => {
                self.cycle_zone(-1);
                return false;
            }
            KeyCode::Delete | KeyCode::Backspace => {
                let changes = self.calendar.clear_selection();
                self.follow(&changes);
                return false;
            }
            _ => {}
        }

        let key = Key::from(code);
        if key == Key::Other {
            return false;
        }
        let result = self.calendar.handle_key(self.zone.target(), key);
        if result.is_handled() && result.changes().is_empty() {
            self.status = Some("Not available within the date range".to_string());
        }
        self.follow(result.changes());
        false
    }

    fn follow(&mut self, changes: &[Change]) {
        for change in changes {
            match change {
                Change::Focus(FocusTarget::Day(_)) if self.zone.tracks_focus() => {
                    self.zone = Zone::Days;
                }
                Change::Focus(FocusTarget::SecondaryCell(_)) if self.zone.tracks_focus() => {
                    self.zone = Zone::SecondaryCells;
                }
                Change::SelectedDatesChanged(dates) if dates.is_empty() => {
                    self.status = Some("Selection cleared".to_string());
                }
                Change::SelectedDatesChanged(dates) => {
                    self.status = Some(format!("Selected: {dates}"));
                }
                _ => {}
            }
        }
    }

    fn focus_style(&self, zone: Zone) -> Style {
        if self.zone == zone {
            Style::default()
                .fg(Color::Black)
                .bg(FOCUS_BG)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(1)])
            .split(f.area());

        let block = Block::default().borders(Borders::ALL).title(" calpick ");
        let inner = block.inner(chunks[0]);
        f.render_widget(block, chunks[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(inner);

        self.render_days(f, columns[0]);
        if self.month_picker_visible {
            self.render_secondary(f, columns[1]);
        }

        let footer = match &self.status {
            Some(msg) => Span::styled(msg.clone(), Style::default().fg(Color::Yellow)),
            None => Span::styled(HELP, Style::default().add_modifier(Modifier::DIM)),
        };
        f.render_widget(Paragraph::new(Line::from(footer)), chunks[1]);
    }

    fn render_days(&self, f: &mut Frame, area: Rect) {
        let cal = &self.calendar;
        let Some(grid) = cal.grid() else {
            f.render_widget(Paragraph::new("Cannot lay out this month."), area);
            return;
        };
        let week_numbers = cal.week_numbers(&grid);
        let gutter = if week_numbers.is_some() { "   " } else { "" };

        let mut lines = vec![
            Line::from(vec![
                Span::raw(gutter),
                Span::styled("<", self.focus_style(Zone::PreviousMonth)),
                Span::styled(
                    format!("{:^18}", cal.title()),
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ),
                Span::styled(">", self.focus_style(Zone::NextMonth)),
                Span::raw(transition_marker(cal.transition(Panel::Primary))),
            ]),
            Line::from(format!(
                "{}{}",
                if week_numbers.is_some() { "Wk " } else { "" },
                weekday_header(cal)
            )),
        ];

        let grid_focused = self.zone == Zone::Days;
        for (i, week) in grid.weeks.iter().enumerate() {
            let mut spans = Vec::new();
            if let Some(nums) = &week_numbers {
                spans.push(Span::styled(
                    format!("{:>2} ", nums[i]),
                    Style::default().add_modifier(Modifier::DIM),
                ));
            }
            for date in week {
                let info = cal.day_cell_info(*date);
                spans.push(Span::styled(format!("{:>2}", info.label), day_style(&info, grid_focused)));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        if self.show_today_link {
            lines.push(Line::from(""));
            let mut style = self.focus_style(Zone::TodayLink);
            if cal.is_today() && self.zone != Zone::TodayLink {
                style = style.add_modifier(Modifier::DIM);
            }
            lines.push(Line::from(Span::styled("Go to today", style)));
        }

        f.render_widget(Paragraph::new(lines), area);
    }

    fn render_secondary(&self, f: &mut Frame, area: Rect) {
        let cal = &self.calendar;
        let mut lines = vec![
            Line::from(vec![
                Span::styled("<", self.focus_style(Zone::PreviousPanel)),
                Span::raw(" "),
                Span::styled(cal.secondary_title(), self.focus_style(Zone::SecondaryTitle)),
                Span::raw(" "),
                Span::styled(">", self.focus_style(Zone::NextPanel)),
                Span::raw(transition_marker(cal.transition(Panel::Secondary))),
            ]),
            Line::from(""),
        ];

        let cells_focused = self.zone == Zone::SecondaryCells;
        let mut index = 0;
        for row in cal.secondary_rows() {
            let mut spans = Vec::new();
            for item in row.iter().flatten() {
                let info = cal.secondary_cell_info(item);
                let focused = cells_focused && index == cal.secondary_focus();
                spans.push(Span::styled(
                    format!("{:^6}", info.label),
                    secondary_style(&info, focused),
                ));
                index += 1;
            }
            lines.push(Line::from(spans));
        }

        f.render_widget(Paragraph::new(lines), area);
    }
}

fn weekday_header(cal: &Calendar) -> String {
    cal.weekday_labels()
        .iter()
        .map(|label| format!("{label:>2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn transition_marker(direction: Option<TransitionDirection>) -> &'static str {
    match direction {
        Some(TransitionDirection::Previous) => " <<",
        Some(TransitionDirection::Next) => " >>",
        None => "",
    }
}

/// Style for a day cell, by priority: focus, selection, bounds, today,
/// leading/trailing days.
pub(crate) fn day_style(info: &DayCellInfo, grid_focused: bool) -> Style {
    if info.is_focused && grid_focused {
        Style::default()
            .fg(Color::Black)
            .bg(FOCUS_BG)
            .add_modifier(Modifier::BOLD)
    } else if info.is_selected {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else if info.is_disabled {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else if info.is_today {
        Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else if !info.in_month {
        Style::default().add_modifier(Modifier::DIM)
    } else {
        Style::default()
    }
}

pub(crate) fn secondary_style(info: &SecondaryCellInfo, focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Color::Black)
            .bg(FOCUS_BG)
            .add_modifier(Modifier::BOLD)
    } else if info.is_disabled {
        Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
    } else if info.is_selected {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    } else if info.is_current {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
        app.calendar.tick(Instant::now());
    }
    Ok(())
}
