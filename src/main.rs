mod calc;
mod cmd;
mod data;
mod logging;
mod state;
mod ui;

use calc::dates::{MAX_YEAR, MIN_YEAR};
use clap::{Parser, Subcommand};
use data::AppSettings;
use state::CalendarType;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "calpick", about = "keyboard-driven date picker")]
struct Cli {
    /// Path to the data directory containing config.yaml (default: ./config)
    #[arg(long, default_value = "./config", global = true)]
    data_dir: PathBuf,

    /// Earliest selectable date (yyyy-mm-dd)
    #[arg(long, global = true)]
    min_date: Option<String>,

    /// Latest selectable date (yyyy-mm-dd)
    #[arg(long, global = true)]
    max_date: Option<String>,

    /// Single date or accumulating multi-date selection
    #[arg(long, value_enum, global = true)]
    calendar_type: Option<CalendarType>,

    /// Month to open on (1-12, default: current month)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Year to open on (default: current year)
    #[arg(
        long,
        global = true,
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i32).range(MIN_YEAR as i64..=MAX_YEAR as i64)
    )]
    year: Option<i32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config.yaml into the data directory
    Init {
        /// Overwrite an existing config.yaml
        #[arg(long)]
        force: bool,
    },
    /// Print the day grid and secondary panel without entering the picker
    Show {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Command-line flags win over config.yaml.
    fn apply_overrides(&self, settings: &mut AppSettings) {
        if self.min_date.is_some() {
            settings.min_date = self.min_date.clone();
        }
        if self.max_date.is_some() {
            settings.max_date = self.max_date.clone();
        }
        if let Some(calendar_type) = self.calendar_type {
            settings.calendar_type = calendar_type;
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();

    // Resolve data_dir to an absolute path so file I/O works regardless of
    // future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    data::persistence::set_data_dir(data_dir);

    if let Some(Commands::Init { force }) = cli.command {
        return cmd::init::run(force);
    }

    let mut settings = AppSettings::load()?;
    cli.apply_overrides(&mut settings);
    let start = cmd::StartMonth {
        month: cli.month,
        year: cli.year,
    };

    match cli.command {
        None => cmd::root::run(&settings, start),
        Some(Commands::Show { json }) => cmd::show::run(&settings, start, json),
        Some(Commands::Init { .. }) => Ok(()),
    }
}
