use carematch_theme::{AppearanceMode, Preference};
use color_eyre::eyre::{eyre, Result};

use crate::cli::PrefsCommands;
use crate::commands::open_engine;
use crate::config::AppConfig;

pub fn run(command: Option<PrefsCommands>, config: &AppConfig) -> Result<()> {
    let mut engine = open_engine(config);

    match command.unwrap_or(PrefsCommands::Show) {
        PrefsCommands::Show => {}
        PrefsCommands::Appearance { mode } => {
            let mode: AppearanceMode = mode.parse().map_err(|e: String| eyre!(e))?;
            engine.set_appearance(mode);
        }
        PrefsCommands::HighContrast { value } => engine.set_high_contrast(value.enabled()),
        PrefsCommands::ReducedMotion { value } => engine.set_reduced_motion(value.enabled()),
        PrefsCommands::Reset => engine.reset_preferences(),
    }

    engine.flush();
    print_preference(engine.preference());
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn print_preference(preference: &Preference) {
    println!("Theme:          {}", preference.active_theme_id);
    println!("Appearance:     {}", preference.appearance);
    println!("High contrast:  {}", on_off(preference.high_contrast));
    println!("Reduced motion: {}", on_off(preference.reduced_motion));
}
