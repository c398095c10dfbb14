//! Core theme types.
//!
//! This module defines the fundamental types for the theme system:
//! - `Variant` - light or dark polarity of a theme
//! - `ThemeCore` - the two author-supplied seed colors
//! - `ThemeDefinition` - a validated theme with metadata
//!
//! A `ThemeDefinition` can only be obtained through [`ThemeDefinition::new`],
//! which runs the same checks as an import, so the registry never holds an
//! unchecked theme.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lch::{LchColor, LIGHTNESS_MIDPOINT, MAX_CHROMA};
use crate::validation::ValidationError;

/// Category assigned to imported themes that do not name one.
pub const DEFAULT_CATEGORY: &str = "custom";

/// Light or dark polarity of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Light,
    Dark,
}

impl Variant {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Variant::Light => "light",
            Variant::Dark => "dark",
        }
    }

    pub const fn flipped(&self) -> Self {
        match self {
            Variant::Light => Variant::Dark,
            Variant::Dark => Variant::Light,
        }
    }

    /// Sign of a lightness step from the background toward the opposite
    /// pole: darker on light themes, lighter on dark ones.
    pub fn contrast_direction(&self) -> f64 {
        match self {
            Variant::Light => -1.0,
            Variant::Dark => 1.0,
        }
    }

    /// Lightness available between `l` and the opposite pole.
    pub fn headroom(&self, l: f64) -> f64 {
        match self {
            Variant::Light => l,
            Variant::Dark => 100.0 - l,
        }
    }

    /// Whether a background of lightness `l` is consistent with this variant.
    pub fn accepts_background(&self, l: f64) -> bool {
        match self {
            Variant::Light => l > LIGHTNESS_MIDPOINT,
            Variant::Dark => l < LIGHTNESS_MIDPOINT,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Variant::Light),
            "dark" => Ok(Variant::Dark),
            other => Err(format!("expected 'light' or 'dark', got '{}'", other)),
        }
    }
}

/// The only two author-supplied colors; everything else is derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThemeCore {
    pub base: LchColor,
    pub accent: LchColor,
}

impl ThemeCore {
    pub const fn new(base: LchColor, accent: LchColor) -> Self {
        Self { base, accent }
    }

    /// The same seeds with the base lightness reflected around the midpoint.
    ///
    /// Used when the user forces the opposite appearance of a theme.
    pub fn mirrored(&self) -> Self {
        Self {
            base: LchColor::new(100.0 - self.base.l, self.base.c, self.base.h),
            accent: self.accent,
        }
    }
}

/// A complete, validated theme with metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeDefinition {
    id: String,
    name: String,
    variant: Variant,
    category: String,
    core: ThemeCore,
    popularity: Option<u8>,
    is_builtin: bool,
}

impl ThemeDefinition {
    /// Validate and build a user theme.
    ///
    /// Checks non-empty identifiers, LCH component ranges, popularity range
    /// and that `variant` agrees with the background lightness. All failures
    /// are collected.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        variant: Variant,
        category: impl Into<String>,
        core: ThemeCore,
        popularity: Option<u8>,
    ) -> Result<Self, Vec<ValidationError>> {
        let theme = Self {
            id: id.into(),
            name: name.into(),
            variant,
            category: category.into(),
            core,
            popularity,
            is_builtin: false,
        };
        let errors = theme.check();
        if errors.is_empty() {
            Ok(theme)
        } else {
            Err(errors)
        }
    }

    pub(crate) fn builtin(
        id: &str,
        name: &str,
        variant: Variant,
        category: &str,
        core: ThemeCore,
        popularity: u8,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            variant,
            category: category.to_string(),
            core,
            popularity: Some(popularity),
            is_builtin: true,
        }
    }

    pub(crate) fn check(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.id.trim().is_empty() {
            errors.push(ValidationError::EmptyField {
                field: "id".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            errors.push(ValidationError::EmptyField {
                field: "name".to_string(),
            });
        }
        if let Some(p) = self.popularity {
            if p > 100 {
                errors.push(ValidationError::OutOfRange {
                    field: "popularity".to_string(),
                    value: p as f64,
                    min: 0.0,
                    max: 100.0,
                });
            }
        }

        check_color(&mut errors, "core.base", &self.core.base);
        check_color(&mut errors, "core.accent", &self.core.accent);

        let base_in_range = (0.0..=100.0).contains(&self.core.base.l);
        if base_in_range && !self.variant.accepts_background(self.core.base.l) {
            errors.push(ValidationError::VariantMismatch {
                variant: self.variant,
                background_lightness: self.core.base.l,
            });
        }

        errors
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn core(&self) -> &ThemeCore {
        &self.core
    }

    pub fn popularity(&self) -> Option<u8> {
        self.popularity
    }

    /// Whether this theme ships with the engine.
    pub fn is_builtin(&self) -> bool {
        self.is_builtin
    }

    /// A label describing the variant and origin, for selector UIs.
    pub fn label(&self) -> String {
        if self.is_builtin {
            format!("{} ({})", self.name, self.variant)
        } else {
            format!("{} ({}, imported)", self.name, self.variant)
        }
    }
}

fn check_color(errors: &mut Vec<ValidationError>, field: &str, color: &LchColor) {
    let components = [
        ("L", color.l, 100.0),
        ("C", color.c, MAX_CHROMA),
        ("H", color.h, 360.0),
    ];
    for (name, value, max) in components {
        if !value.is_finite() || !(0.0..=max).contains(&value) {
            errors.push(ValidationError::OutOfRange {
                field: format!("{}.{}", field, name),
                value,
                min: 0.0,
                max,
            });
        }
    }
}
