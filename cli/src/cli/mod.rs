mod prefs;
mod theme;

pub use prefs::{PrefsCommands, Toggle};
pub use theme::ThemeCommands;

use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Browse, inspect, share and select themes
    #[command(alias = "themes")]
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },

    /// Show or change appearance preferences
    #[command(alias = "preferences")]
    Prefs {
        #[command(subcommand)]
        command: Option<PrefsCommands>,
    },

    /// Show, reset or edit the config file
    Config {
        #[arg(long)]
        path: bool,

        #[arg(long)]
        reset: bool,

        #[arg(short, long)]
        edit: bool,
    },
}

#[derive(Debug, Parser)]
#[command(name = "carematch", version, about = "Theme engine host for the carematch app")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(long, global = true)]
    pub log_level: Option<String>,
}
