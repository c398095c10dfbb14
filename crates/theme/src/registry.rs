//! Catalog of theme definitions, looked up by id.
//!
//! Built-ins are loaded at construction and never change. Imported themes
//! can only enter through the transport layer, which validates them first.

use tracing::debug;

use crate::builtin::builtin_themes;
use crate::error::ThemeError;
use crate::types::{ThemeDefinition, Variant};
use crate::validation::ValidationError;

/// Filters for gallery and selector listings.
#[derive(Debug, Clone, Default)]
pub struct ThemeQuery {
    pub category: Option<String>,
    pub variant: Option<Variant>,
    pub builtin_only: bool,
    pub imported_only: bool,
}

#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<ThemeDefinition>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeRegistry {
    /// A registry holding every built-in theme.
    pub fn new() -> Self {
        Self {
            themes: builtin_themes(),
        }
    }

    /// A registry with no themes at all, e.g. as an import target.
    pub fn empty() -> Self {
        Self { themes: Vec::new() }
    }

    pub fn get(&self, id: &str) -> Option<&ThemeDefinition> {
        self.themes.iter().find(|t| t.id() == id)
    }

    pub fn require(&self, id: &str) -> Result<&ThemeDefinition, ThemeError> {
        self.get(id)
            .ok_or_else(|| ThemeError::UnknownTheme(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All themes, built-ins first, then imports in insertion order.
    pub fn list(&self) -> &[ThemeDefinition] {
        &self.themes
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }

    pub fn imported(&self) -> impl Iterator<Item = &ThemeDefinition> {
        self.themes.iter().filter(|t| !t.is_builtin())
    }

    /// Filtered listing, most popular first. Themes without a popularity
    /// score sort last, ties keep registry order.
    pub fn query(&self, query: &ThemeQuery) -> Vec<&ThemeDefinition> {
        let mut matches: Vec<_> = self
            .themes
            .iter()
            .filter(|t| {
                query
                    .category
                    .as_deref()
                    .map_or(true, |c| t.category().eq_ignore_ascii_case(c))
            })
            .filter(|t| query.variant.map_or(true, |v| t.variant() == v))
            .filter(|t| !query.builtin_only || t.is_builtin())
            .filter(|t| !query.imported_only || !t.is_builtin())
            .collect();
        matches.sort_by_key(|t| std::cmp::Reverse(t.popularity().map(|p| p as i16).unwrap_or(-1)));
        matches
    }

    /// Distinct categories in registry order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for theme in &self.themes {
            if !seen.contains(&theme.category()) {
                seen.push(theme.category());
            }
        }
        seen
    }

    /// Add a validated theme. Existing ids are never overwritten.
    pub(crate) fn insert(&mut self, theme: ThemeDefinition) -> Result<(), ValidationError> {
        if self.contains(theme.id()) {
            return Err(ValidationError::DuplicateId {
                id: theme.id().to_string(),
            });
        }
        debug!(id = theme.id(), "Registered theme");
        self.themes.push(theme);
        Ok(())
    }
}
