mod cli;
mod clipboard;
mod commands;
mod config;
mod logging;

use clap::Parser;
use color_eyre::eyre::Result;

use cli::{Cli, Commands};
use config::{ensure_dirs, AppConfig, LogLevel};
use logging::LogMode;

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = ensure_dirs();

    let cli = Cli::parse();
    let config = AppConfig::load();
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);
    let mode = if config.log_to_file {
        LogMode::Both
    } else {
        LogMode::Stderr
    };
    let _guard = logging::init(config.log_level, mode, log_level_override);

    match cli.command {
        Some(Commands::Theme { command }) => commands::theme::run(command, &config),
        Some(Commands::Prefs { command }) => commands::prefs::run(command, &config),
        Some(Commands::Config { path, reset, edit }) => commands::config::run(path, reset, edit),
        None => commands::theme::run(None, &config),
    }
}
