use std::time::Duration;

use carematch_theme::persistence::PersistedState;
use carematch_theme::{FileStorage, RetryPolicy, Storage};
use color_eyre::eyre::Result;

use crate::config::{config_path, state_path, AppConfig};

pub fn run(path: bool, reset: bool, edit: bool) -> Result<()> {
    let config_file = config_path();

    if path {
        println!("{}", config_file.display());
        return Ok(());
    }

    if reset {
        AppConfig::default().save()?;
        println!("Config reset to defaults at: {}", config_file.display());
        return Ok(());
    }

    if edit {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());

        if !config_file.exists() {
            AppConfig::default().save()?;
        }

        std::process::Command::new(editor)
            .arg(&config_file)
            .status()?;

        let content = std::fs::read_to_string(&config_file)?;
        if let Err(e) = AppConfig::check(&content) {
            eprintln!("Config has errors, defaults will be used until fixed:");
            eprintln!("{}", e);
        }
        return Ok(());
    }

    let config = AppConfig::load();
    println!("Config file: {}", config_file.display());
    println!();
    println!("{}", toml::to_string_pretty(&config)?);

    let options = config.engine_options();
    println!("Preview duration: {}", humantime::format_duration(options.preview_duration));
    println!("Write retries:    {}", describe_retries(&options.retry));
    println!();

    let state_file = state_path();
    println!("State file: {}", state_file.display());
    match FileStorage::new(&state_file).load() {
        Ok(Some(state)) => {
            for line in describe_state(&state) {
                println!("  {}", line);
            }
        }
        Ok(None) => println!("  nothing saved yet"),
        Err(e) => println!("  unreadable, defaults in use: {}", e),
    }

    Ok(())
}

/// Waits between attempts, e.g. "3 attempts, waits 200ms, 400ms".
fn describe_retries(policy: &RetryPolicy) -> String {
    let waits: Vec<String> = (1..policy.max_attempts)
        .map(|attempt| humantime::format_duration(policy.delay_after(attempt)).to_string())
        .collect();
    let attempts = if policy.max_attempts == 1 {
        "1 attempt".to_string()
    } else {
        format!("{} attempts", policy.max_attempts)
    };
    if waits.is_empty() || policy.base_delay == Duration::ZERO {
        attempts
    } else {
        format!("{}, waits {}", attempts, waits.join(", "))
    }
}

fn describe_state(state: &PersistedState) -> Vec<String> {
    let p = &state.preference;
    let on_off = |flag: bool| if flag { "on" } else { "off" };
    let saved = state
        .saved_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());

    vec![
        format!("version:         {}", state.version),
        format!("saved at:        {}", saved),
        format!("active theme:    {}", p.active_theme_id),
        format!("appearance:      {}", p.appearance),
        format!("high contrast:   {}", on_off(p.high_contrast)),
        format!("reduced motion:  {}", on_off(p.reduced_motion)),
        format!("imported themes: {}", state.themes.len()),
    ]
}
