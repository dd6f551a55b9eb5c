//! LeadGen TUI: interactive lead dashboard.
//!
//! Pick a role persona and a science context, run the pipeline, and browse
//! the ranked leads, built with `ratatui` + `crossterm`.

mod app;
mod runner;
mod screens;
mod widgets;

use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    app::run()
}

/// Log to `~/.leadgen/tui.log`; the terminal belongs to the UI.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let Ok(dir) = leadgen_shared::config_dir() else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let Ok(file) = std::fs::File::create(dir.join("tui.log")) else {
        return;
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("leadgen=info"));
    fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();
}
