use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use markpad::app::App;
use markpad::config::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse_merged();
    init_logging(cli.log_file.as_deref())?;

    if cli.clear {
        match config::clear_defaults()? {
            Some(path) => println!("Removed {}", path.display()),
            None => println!("No saved defaults"),
        }
        return Ok(());
    }
    if cli.save {
        let path = config::save_defaults()?;
        println!("Saved defaults to {}", path.display());
        return Ok(());
    }

    info!(?cli, "starting");
    App::new(&cli)?.run()
}

/// Log to a file when asked; the terminal itself belongs to the UI.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("markpad=debug")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
