//! Publishing the effective palette to the UI's style tokens.
//!
//! The UI never sees LCH values or theme definitions. It reads a flat set of
//! named tokens (`--color-text-primary: #1d2433`) from a [`TokenSurface`],
//! and [`ApplicationBridge`] is the only thing that writes to it.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use tracing::debug;

use crate::derive::{derive_with, DeriveOptions};
use crate::palette::DerivedPalette;
use crate::preference::Preference;
use crate::types::ThemeDefinition;

pub const COLOR_TOKEN_PREFIX: &str = "--color-";
pub const MOTION_SCALE_TOKEN: &str = "--motion-scale";
pub const HIGH_CONTRAST_TOKEN: &str = "--high-contrast";

/// Anything the UI reads style tokens from.
pub trait TokenSurface {
    fn apply(&mut self, tokens: &StyleTokens);
}

/// Ordered token set, the unit pushed to a surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleTokens {
    entries: Vec<(String, String)>,
}

impl StyleTokens {
    pub fn new(palette: &DerivedPalette, preference: &Preference) -> Self {
        let mut entries: Vec<(String, String)> = palette
            .to_hex_map()
            .into_iter()
            .map(|(role, hex)| (format!("{COLOR_TOKEN_PREFIX}{role}"), hex))
            .collect();
        entries.push((
            MOTION_SCALE_TOKEN.to_string(),
            if preference.reduced_motion { "0" } else { "1" }.to_string(),
        ));
        entries.push((
            HIGH_CONTRAST_TOKEN.to_string(),
            if preference.high_contrast { "1" } else { "0" }.to_string(),
        ));
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as a CSS rule block.
    pub fn to_css(&self, selector: &str) -> String {
        let mut css = format!("{selector} {{\n");
        for (name, value) in &self.entries {
            let _ = writeln!(css, "  {name}: {value};");
        }
        css.push_str("}\n");
        css
    }
}

/// In-memory surface. Counts how many pushes actually reached it.
#[derive(Debug, Clone, Default)]
pub struct TokenMap {
    tokens: BTreeMap<String, String>,
    applied: usize,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn apply_count(&self) -> usize {
        self.applied
    }
}

impl TokenSurface for TokenMap {
    fn apply(&mut self, tokens: &StyleTokens) {
        for (name, value) in tokens.iter() {
            self.tokens.insert(name.to_string(), value.to_string());
        }
        self.applied += 1;
    }
}

/// Palette `theme` is shown with under `preference`.
///
/// An appearance override that disagrees with the theme's own variant
/// derives from the mirrored core in the requested variant.
pub fn effective_palette(theme: &ThemeDefinition, preference: &Preference) -> DerivedPalette {
    let variant = preference.appearance.resolve(theme.variant());
    let core = if variant == theme.variant() {
        *theme.core()
    } else {
        theme.core().mirrored()
    };
    derive_with(
        &core,
        variant,
        DeriveOptions {
            high_contrast: preference.high_contrast,
        },
    )
}

pub struct ApplicationBridge<S> {
    surface: S,
    theme_id: Option<String>,
    palette: Option<DerivedPalette>,
    published: Option<StyleTokens>,
}

impl<S: TokenSurface> ApplicationBridge<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            theme_id: None,
            palette: None,
            published: None,
        }
    }

    /// Make `theme` the effective theme. Pushes to the surface only when
    /// the resulting tokens differ from what was last pushed.
    pub fn sync(&mut self, theme: &ThemeDefinition, preference: &Preference) -> bool {
        let palette = effective_palette(theme, preference);
        let tokens = StyleTokens::new(&palette, preference);

        self.theme_id = Some(theme.id().to_string());
        self.palette = Some(palette);

        if self.published.as_ref() == Some(&tokens) {
            return false;
        }
        debug!(id = theme.id(), tokens = tokens.len(), "Publishing style tokens");
        self.surface.apply(&tokens);
        self.published = Some(tokens);
        true
    }

    /// Palette of the last sync.
    pub fn current_palette(&self) -> Option<&DerivedPalette> {
        self.palette.as_ref()
    }

    pub fn current_theme_id(&self) -> Option<&str> {
        self.theme_id.as_deref()
    }

    pub fn tokens(&self) -> Option<&StyleTokens> {
        self.published.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
