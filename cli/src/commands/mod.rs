pub mod config;
pub mod prefs;
pub mod theme;

use std::sync::Arc;

use carematch_theme::{FileStorage, SystemClock, ThemeEngine, TokenMap};
use tracing::debug;

use crate::config::{state_path, AppConfig};

/// Engine backed by the state file in the data dir.
pub fn open_engine(config: &AppConfig) -> ThemeEngine {
    let path = state_path();
    debug!(path = %path.display(), "Opening theme state");
    ThemeEngine::open(
        FileStorage::new(path),
        TokenMap::new(),
        Arc::new(SystemClock),
        config.engine_options(),
    )
}
