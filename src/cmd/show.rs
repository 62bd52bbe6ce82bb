use crate::calc::{DateBounds, DateFormatter};
use crate::cmd::{StartMonth, build_calendar};
use crate::data::AppSettings;
use crate::state::{
    Calendar, CalendarViewState, DayCellInfo, MonthInfo, MonthPickerInfo, SecondaryCellInfo,
    YearPickerInfo,
};
use anyhow::{Context, Result, bail};
use chrono::Local;
use serde::Serialize;
use std::io::Write;

pub fn run(settings: &AppSettings, start: StartMonth, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let (calendar, diagnostics) = build_calendar(settings, start, today);
    for diag in &diagnostics {
        eprintln!("Warning: {diag}");
    }

    let mut out = std::io::stdout();
    if json {
        write_json(&calendar, &mut out)
    } else {
        write_view(&calendar, &mut out)
    }
}

/// Everything a host needs to draw one frame of the picker.
#[derive(Serialize)]
struct Snapshot {
    title: String,
    view: CalendarViewState,
    bounds: DateBounds,
    month_info: MonthInfo,
    month_picker: MonthPickerInfo,
    year_picker: YearPickerInfo,
    is_today: bool,
    week_numbers: Option<Vec<u32>>,
    weeks: Vec<Vec<DayCellInfo>>,
    secondary_title: String,
    secondary_title_label: String,
    secondary: Vec<Vec<Option<SecondaryCellInfo>>>,
}

fn snapshot<F: DateFormatter>(cal: &Calendar<F>) -> Result<Snapshot> {
    let grid = cal
        .grid()
        .with_context(|| format!("cannot lay out {}", cal.title()))?;
    let weeks = grid
        .weeks
        .iter()
        .map(|week| week.iter().map(|d| cal.day_cell_info(*d)).collect())
        .collect();
    let secondary = cal
        .secondary_rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.as_ref().map(|item| cal.secondary_cell_info(item)))
                .collect()
        })
        .collect();

    Ok(Snapshot {
        title: cal.title(),
        view: *cal.view(),
        bounds: *cal.bounds(),
        month_info: cal.month_info(),
        month_picker: cal.month_picker_info(),
        year_picker: cal.year_picker_info(),
        is_today: cal.is_today(),
        week_numbers: cal.week_numbers(&grid),
        weeks,
        secondary_title: cal.secondary_title(),
        secondary_title_label: cal.secondary_title_label(),
        secondary,
    })
}

pub(crate) fn write_json<F: DateFormatter, W: Write>(cal: &Calendar<F>, out: &mut W) -> Result<()> {
    let snap = snapshot(cal)?;
    serde_json::to_writer_pretty(&mut *out, &snap).context("failed to serialize view")?;
    writeln!(out)?;
    Ok(())
}

fn day_cell_text(info: &DayCellInfo) -> String {
    if !info.in_month {
        return "   ".to_string();
    }
    let marker = if info.is_disabled {
        'x'
    } else if info.is_today {
        '*'
    } else {
        ' '
    };
    format!("{:>2}{}", info.label, marker)
}

fn secondary_cell_text(info: &SecondaryCellInfo) -> String {
    let marker = if info.is_disabled {
        'x'
    } else if info.is_selected {
        '<'
    } else if info.is_current {
        '*'
    } else {
        ' '
    };
    format!("{}{}", info.label, marker)
}

pub(crate) fn write_view<F: DateFormatter, W: Write>(cal: &Calendar<F>, out: &mut W) -> Result<()> {
    let Some(grid) = cal.grid() else {
        bail!("cannot lay out {}", cal.title());
    };
    let week_numbers = cal.week_numbers(&grid);
    let gutter = if week_numbers.is_some() { "   " } else { "" };

    writeln!(out, "{gutter}{:^20}", cal.title())?;
    let header: Vec<String> = cal
        .weekday_labels()
        .iter()
        .map(|label| format!("{label:>2}"))
        .collect();
    let wk = if week_numbers.is_some() { "Wk " } else { "" };
    writeln!(out, "{wk}{}", header.join(" "))?;

    for (i, week) in grid.weeks.iter().enumerate() {
        let mut line = match &week_numbers {
            Some(nums) => format!("{:>2} ", nums[i]),
            None => String::new(),
        };
        for date in week {
            line.push_str(&day_cell_text(&cal.day_cell_info(*date)));
        }
        writeln!(out, "{}", line.trim_end())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", cal.secondary_title())?;
    for row in cal.secondary_rows() {
        let cells: Vec<String> = row
            .iter()
            .flatten()
            .map(|item| secondary_cell_text(&cal.secondary_cell_info(item)))
            .collect();
        writeln!(out, "{}", cells.join(" ").trim_end())?;
    }
    writeln!(out)?;
    writeln!(out, "* today  x unavailable  < shown")?;
    Ok(())
}
