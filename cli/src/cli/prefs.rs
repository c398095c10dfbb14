use clap::{Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    pub fn enabled(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Debug, Subcommand)]
pub enum PrefsCommands {
    /// Print current preferences (default)
    Show,

    /// auto, dark or light
    Appearance { mode: String },

    HighContrast {
        #[arg(value_enum)]
        value: Toggle,
    },

    ReducedMotion {
        #[arg(value_enum)]
        value: Toggle,
    },

    /// Restore defaults
    Reset,
}
