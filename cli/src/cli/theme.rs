use std::path::PathBuf;

use clap::Subcommand;

#[derive(Debug, Subcommand)]
pub enum ThemeCommands {
    /// List themes, most popular first (default)
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<String>,

        /// light or dark
        #[arg(long)]
        variant: Option<String>,

        #[arg(long)]
        builtin: bool,

        #[arg(long, conflicts_with = "builtin")]
        imported: bool,
    },

    /// Print the derived palette of a theme
    Show {
        id: String,

        /// Print CSS custom properties instead of a table
        #[arg(long)]
        css: bool,
    },

    /// Seed-level accessibility report
    Report {
        id: String,

        #[arg(long)]
        json: bool,
    },

    /// WCAG contrast audit of derived palettes
    #[command(alias = "c")]
    Check {
        /// Theme to check, all themes when omitted
        id: Option<String>,

        /// Show passing pairs too
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print a theme in the sharing format
    Export {
        id: String,

        /// Also copy to the clipboard
        #[arg(short, long)]
        copy: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a shared theme from a file, or stdin with '-'
    #[command(alias = "i")]
    Import { file: PathBuf },

    /// Select a theme permanently
    Use { id: String },

    /// Show a theme temporarily, then revert
    Preview {
        id: String,

        /// Preview length, e.g. 5s or 1m. Defaults to the configured value
        #[arg(short, long, value_parser = humantime::parse_duration)]
        duration: Option<std::time::Duration>,

        /// Print the preview tokens and exit without waiting
        #[arg(long)]
        no_wait: bool,
    },

    /// Print the tokens currently in effect as CSS
    Current,
}
