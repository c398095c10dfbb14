//! Persisted user choices.
//!
//! `PreferenceStore` is the only writer of [`Preference`]. Every mutation
//! updates the in-memory copy first, which stays authoritative, and then
//! hands a full snapshot to the background writer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::builtin::DEFAULT_THEME_ID;
use crate::persistence::PersistHandle;
use crate::registry::ThemeRegistry;
use crate::types::Variant;

/// Dark/light override applied on top of the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppearanceMode {
    #[default]
    Auto,
    Dark,
    Light,
}

impl AppearanceMode {
    pub fn label(&self) -> &'static str {
        match self {
            AppearanceMode::Auto => "Auto",
            AppearanceMode::Dark => "Dark",
            AppearanceMode::Light => "Light",
        }
    }

    /// The variant a theme authored as `variant` is shown in.
    pub fn resolve(&self, variant: Variant) -> Variant {
        match self {
            AppearanceMode::Auto => variant,
            AppearanceMode::Dark => Variant::Dark,
            AppearanceMode::Light => Variant::Light,
        }
    }
}

impl fmt::Display for AppearanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AppearanceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(AppearanceMode::Auto),
            "dark" => Ok(AppearanceMode::Dark),
            "light" => Ok(AppearanceMode::Light),
            other => Err(format!("expected auto, dark or light, got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preference {
    pub active_theme_id: String,
    pub appearance: AppearanceMode,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

impl Default for Preference {
    fn default() -> Self {
        Self {
            active_theme_id: DEFAULT_THEME_ID.to_string(),
            appearance: AppearanceMode::Auto,
            high_contrast: false,
            reduced_motion: false,
        }
    }
}

pub struct PreferenceStore {
    current: Preference,
    sink: PersistHandle,
}

impl PreferenceStore {
    pub fn new(initial: Preference, sink: PersistHandle) -> Self {
        Self {
            current: initial,
            sink,
        }
    }

    /// Build from whatever was loaded at startup.
    ///
    /// A missing record yields defaults. A record pointing at a theme that no
    /// longer exists falls back to the default theme but keeps the flags.
    pub fn restore(
        loaded: Option<Preference>,
        registry: &ThemeRegistry,
        sink: PersistHandle,
    ) -> Self {
        let mut preference = loaded.unwrap_or_default();
        if !registry.contains(&preference.active_theme_id) {
            warn!(
                id = %preference.active_theme_id,
                fallback = DEFAULT_THEME_ID,
                "Stored theme not found, using default"
            );
            preference.active_theme_id = DEFAULT_THEME_ID.to_string();
        }
        Self::new(preference, sink)
    }

    /// Route future writes to `sink`.
    pub(crate) fn attach(&mut self, sink: PersistHandle) {
        self.sink = sink;
    }

    pub fn get(&self) -> &Preference {
        &self.current
    }

    /// Select a theme permanently. Unknown ids are a logged no-op.
    pub fn set_theme(&mut self, id: &str, registry: &ThemeRegistry) -> bool {
        if !registry.contains(id) {
            warn!(id, "Ignoring selection of unknown theme");
            return false;
        }
        self.update(|p| p.active_theme_id = id.to_string());
        true
    }

    pub fn set_high_contrast(&mut self, enabled: bool) {
        self.update(|p| p.high_contrast = enabled);
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.update(|p| p.reduced_motion = enabled);
    }

    pub fn set_appearance(&mut self, mode: AppearanceMode) {
        self.update(|p| p.appearance = mode);
    }

    pub fn reset(&mut self) {
        self.update(|p| *p = Preference::default());
    }

    fn update(&mut self, f: impl FnOnce(&mut Preference)) {
        let before = self.current.clone();
        f(&mut self.current);
        if self.current == before {
            debug!("Preference unchanged, skipping write");
            return;
        }
        debug!(preference = ?self.current, "Preference updated");
        self.sink.submit_preference(self.current.clone());
    }
}
