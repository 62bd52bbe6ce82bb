use crate::cmd::{StartMonth, build_calendar};
use crate::data::AppSettings;
use crate::ui::calendar_view::{App, run_app};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;

pub fn run(settings: &AppSettings, start: StartMonth) -> Result<()> {
    let today = Local::now().date_naive();
    let (calendar, diagnostics) = build_calendar(settings, start, today);
    let status = diagnostics.first().map(|e| format!("Warning: {e}"));

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(calendar, settings);
    app.status = status;

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;
    result?;

    // The picked dates go to stdout so the picker can feed a pipeline.
    let picked = app.calendar.selection().serialize();
    if !picked.is_empty() {
        println!("{picked}");
    }
    Ok(())
}
