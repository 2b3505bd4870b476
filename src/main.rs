//! labbook - a modal terminal notebook with one note per day.
//!
//! # Usage
//!
//! ```bash
//! labbook
//! labbook yesterday
//! labbook 2025-12-15 --notes-dir ~/lab/notes
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use labbook::app::App;
use labbook::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_tab_width, save_config_flags,
};
use labbook::store::default_notes_dir;

/// A modal terminal notebook with one note per day
#[derive(Parser, Debug)]
#[command(name = "labbook", version, about, long_about = None)]
struct Cli {
    /// Date to open (2025-12-15, 12/15/2025, "Dec 15, 2025", yesterday, ...)
    #[arg(value_name = "DATE")]
    date: Option<String>,

    /// Directory notes are stored in
    #[arg(long, value_name = "PATH")]
    notes_dir: Option<PathBuf>,

    /// Spaces inserted by Tab in insert mode
    #[arg(long, value_name = "N", value_parser = tab_width_arg)]
    tab_width: Option<usize>,

    /// Write debug logs to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Print the notes directory and exit
    #[arg(long)]
    print_dir: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            notes_dir: self.notes_dir.clone(),
            tab_width: self.tab_width,
            debug_log: self.debug_log.clone(),
        }
    }
}

fn tab_width_arg(s: &str) -> Result<usize, String> {
    parse_tab_width(s).ok_or_else(|| {
        format!(
            "expected a number from 1 to {}",
            labbook::config::MAX_TAB_WIDTH
        )
    })
}

/// The terminal belongs to the UI, so logs go to a file or nowhere.
fn init_logging(debug_log: Option<&Path>) -> Result<()> {
    match debug_log {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open debug log {}", path.display()))?;
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("labbook=debug"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
                )
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let notes_dir = effective.notes_dir.clone().unwrap_or_else(default_notes_dir);
    if cli.print_dir {
        println!("{}", notes_dir.display());
        return Ok(());
    }

    init_logging(effective.debug_log.as_deref())?;
    tracing::debug!(?effective, "configuration loaded");

    // Run the application
    let mut app = App::new(notes_dir)
        .with_start_date(cli.date)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );
    if let Some(width) = effective.tab_width {
        app = app.with_tab_width(width);
    }

    app.run().context("Application error")
}
