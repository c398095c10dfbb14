//! Import and export of theme definitions.
//!
//! The transport form is a flat JSON object:
//! `{id, name, variant, category, core: {base: [L,C,H], accent: [L,C,H]}, popularity?}`.
//! The same record shape is reused when imported themes are persisted.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ThemeError;
use crate::registry::ThemeRegistry;
use crate::types::{ThemeCore, ThemeDefinition, Variant};
use crate::validation::{validate_payload, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeRecord {
    pub id: String,
    pub name: String,
    pub variant: Variant,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u8>,
    // tables last so the record also encodes as TOML
    pub core: ThemeCore,
}

impl From<&ThemeDefinition> for ThemeRecord {
    fn from(theme: &ThemeDefinition) -> Self {
        Self {
            id: theme.id().to_string(),
            name: theme.name().to_string(),
            variant: theme.variant(),
            category: theme.category().to_string(),
            popularity: theme.popularity(),
            core: *theme.core(),
        }
    }
}

impl TryFrom<ThemeRecord> for ThemeDefinition {
    type Error = Vec<ValidationError>;

    fn try_from(record: ThemeRecord) -> Result<Self, Self::Error> {
        ThemeDefinition::new(
            record.id,
            record.name,
            record.variant,
            record.category,
            record.core,
            record.popularity,
        )
    }
}

/// Serialize a theme for sharing. `None` if the id is unknown.
pub fn export_theme(registry: &ThemeRegistry, id: &str) -> Option<String> {
    let Some(theme) = registry.get(id) else {
        warn!(id, "Export requested for unknown theme");
        return None;
    };
    let record = ThemeRecord::from(theme);
    match serde_json::to_string_pretty(&record) {
        Ok(text) => Some(text),
        Err(e) => {
            // only reachable with non-finite floats, which validation excludes
            warn!(id, error = %e, "Failed to encode theme");
            None
        }
    }
}

/// Validate a payload and register it.
///
/// On any failure the registry is left untouched and every problem found is
/// returned, each naming its field.
pub fn import_theme(registry: &mut ThemeRegistry, content: &str) -> Result<String, ThemeError> {
    let validated = validate_payload(content).map_err(|errors| {
        warn!(errors = errors.len(), "Rejected theme import");
        ThemeError::Validation(errors)
    })?;

    for warning in &validated.warnings {
        debug!(id = validated.theme.id(), %warning, "Theme import warning");
    }

    let id = validated.theme.id().to_string();
    registry.insert(validated.theme).map_err(|e| {
        warn!(id = %id, "Rejected theme import: id already registered");
        ThemeError::from(e)
    })?;
    Ok(id)
}
