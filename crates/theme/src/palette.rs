//! Semantic roles and the derived palette.
//!
//! The role set is closed and owned by the engine: every theme, however
//! minimal, yields a color for each of the 21 roles below.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lch::LchColor;

/// RGB color representation handed to the rendering layer.
///
/// Each component is a value from 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to hex string (e.g., "#ffffff").
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn linearize(val: u8) -> f64 {
        let v = val as f64 / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    }

    /// Relative luminance (0.0 = black, 1.0 = white).
    pub fn luminance(&self) -> f64 {
        0.2126 * Self::linearize(self.r)
            + 0.7152 * Self::linearize(self.g)
            + 0.0722 * Self::linearize(self.b)
    }

    /// WCAG contrast ratio between two colors (1:1 to 21:1).
    pub fn contrast_ratio(&self, other: &Rgb) -> f64 {
        let l1 = self.luminance();
        let l2 = other.luminance();
        let lighter = l1.max(l2);
        let darker = l1.min(l2);
        (lighter + 0.05) / (darker + 0.05)
    }
}

/// A named purpose for a color, independent of its concrete value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticRole {
    Background,
    SurfaceElevated,
    SurfacePanel,
    SurfaceModal,
    TextPrimary,
    TextSecondary,
    TextTertiary,
    BorderSubtle,
    BorderDefault,
    BorderStrong,
    BorderFocus,
    Accent,
    AccentHover,
    Success,
    SuccessBg,
    Warning,
    WarningBg,
    Error,
    ErrorBg,
    Info,
    InfoBg,
}

impl SemanticRole {
    pub const COUNT: usize = 21;

    /// Every role, in palette order.
    pub const ALL: [SemanticRole; Self::COUNT] = [
        Self::Background,
        Self::SurfaceElevated,
        Self::SurfacePanel,
        Self::SurfaceModal,
        Self::TextPrimary,
        Self::TextSecondary,
        Self::TextTertiary,
        Self::BorderSubtle,
        Self::BorderDefault,
        Self::BorderStrong,
        Self::BorderFocus,
        Self::Accent,
        Self::AccentHover,
        Self::Success,
        Self::SuccessBg,
        Self::Warning,
        Self::WarningBg,
        Self::Error,
        Self::ErrorBg,
        Self::Info,
        Self::InfoBg,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::SurfaceElevated => "surface-elevated",
            Self::SurfacePanel => "surface-panel",
            Self::SurfaceModal => "surface-modal",
            Self::TextPrimary => "text-primary",
            Self::TextSecondary => "text-secondary",
            Self::TextTertiary => "text-tertiary",
            Self::BorderSubtle => "border-subtle",
            Self::BorderDefault => "border-default",
            Self::BorderStrong => "border-strong",
            Self::BorderFocus => "border-focus",
            Self::Accent => "accent",
            Self::AccentHover => "accent-hover",
            Self::Success => "success",
            Self::SuccessBg => "success-bg",
            Self::Warning => "warning",
            Self::WarningBg => "warning-bg",
            Self::Error => "error",
            Self::ErrorBg => "error-bg",
            Self::Info => "info",
            Self::InfoBg => "info-bg",
        }
    }

    const fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|role| role.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown semantic role '{}'", s))
    }
}

/// The complete role → color assignment computed from a theme's seeds.
///
/// Backed by a fixed array so a palette can never be missing a role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedPalette {
    colors: [LchColor; SemanticRole::COUNT],
}

impl DerivedPalette {
    pub(crate) fn from_fn(mut f: impl FnMut(SemanticRole) -> LchColor) -> Self {
        let colors = SemanticRole::ALL.map(|role| f(role));
        Self { colors }
    }

    pub fn get(&self, role: SemanticRole) -> LchColor {
        self.colors[role.index()]
    }

    pub fn rgb(&self, role: SemanticRole) -> Rgb {
        self.get(role).to_rgb()
    }

    pub fn hex(&self, role: SemanticRole) -> String {
        self.get(role).to_hex()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = (SemanticRole, LchColor)> + '_ {
        SemanticRole::ALL
            .iter()
            .map(move |role| (*role, self.colors[role.index()]))
    }

    /// Role name → `#rrggbb`, in palette order.
    pub fn to_hex_map(&self) -> Vec<(&'static str, String)> {
        self.iter()
            .map(|(role, color)| (role.as_str(), color.to_hex()))
            .collect()
    }
}
