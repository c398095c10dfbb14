//! Seed colors → full semantic palette.
//!
//! Every role is a fixed offset rule applied to either `base` or `accent`.
//! Surfaces, text and borders all step from the background toward the
//! opposite pole, so a valid base never pushes a tier into the clamp. Text
//! margins are capped by the headroom left toward that pole, which keeps
//! the three text tiers distinct for mid-lightness bases. Results are
//! clamped after each step, so derivation is total for any input.

use crate::lch::LchColor;
use crate::palette::{DerivedPalette, SemanticRole};
use crate::types::{ThemeCore, Variant};

const SURFACE_STEPS: Steps = Steps {
    elevated: 6.0,
    panel: 4.0,
    modal: 2.0,
};

const TEXT_MARGINS: [f64; 3] = [85.0, 62.0, 48.0];
const TEXT_MARGINS_HIGH_CONTRAST: [f64; 3] = [95.0, 75.0, 60.0];
// Share of the headroom each tier may use at most.
const TEXT_HEADROOM: [f64; 3] = [0.95, 0.75, 0.55];
const TEXT_HEADROOM_HIGH_CONTRAST: [f64; 3] = [1.0, 0.85, 0.65];
const TEXT_CHROMA_SCALE: [f64; 3] = [0.25, 0.35, 0.45];

const BORDER_LIGHTNESS: [f64; 3] = [8.0, 16.0, 28.0];
const BORDER_CHROMA: [f64; 3] = [2.0, 4.0, 6.0];
const FOCUS_LIGHTNESS: f64 = 40.0;
const FOCUS_CHROMA_SCALE: f64 = 0.8;

const HOVER_LIGHTNESS: f64 = 8.0;
const HOVER_CHROMA: f64 = 4.0;

pub const SUCCESS_HUE: f64 = 142.0;
pub const WARNING_HUE: f64 = 38.0;
pub const ERROR_HUE: f64 = 25.0;
pub const INFO_HUE: f64 = 210.0;

const STATUS_LIGHTNESS: (f64, f64) = (35.0, 80.0);
const STATUS_CHROMA: (f64, f64) = (30.0, 90.0);
const TINT_MIX: f64 = 0.15;
const TINT_CHROMA_SCALE: f64 = 0.25;

struct Steps {
    elevated: f64,
    panel: f64,
    modal: f64,
}

/// Knobs that change derivation without changing the theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeriveOptions {
    /// Widen text margins for users who asked for high contrast.
    pub high_contrast: bool,
}

/// Derive a palette with default options.
pub fn derive(core: &ThemeCore, variant: Variant) -> DerivedPalette {
    derive_with(core, variant, DeriveOptions::default())
}

pub fn derive_with(core: &ThemeCore, variant: Variant, options: DeriveOptions) -> DerivedPalette {
    let base = core.base.clamped();
    let accent = core.accent.clamped();
    let t = variant.contrast_direction();
    let headroom = variant.headroom(base.l).max(0.0);

    let (margins, shares) = if options.high_contrast {
        (TEXT_MARGINS_HIGH_CONTRAST, TEXT_HEADROOM_HIGH_CONTRAST)
    } else {
        (TEXT_MARGINS, TEXT_HEADROOM)
    };

    let text = |tier: usize| {
        let margin = margins[tier].min(headroom * shares[tier]);
        base.lighten(t * margin)
            .with_chroma(base.c * TEXT_CHROMA_SCALE[tier])
    };
    let border = |tier: usize| {
        base.lighten(t * BORDER_LIGHTNESS[tier])
            .with_chroma(base.c + BORDER_CHROMA[tier])
    };
    let status_tone = LchColor::new(
        accent.l.clamp(STATUS_LIGHTNESS.0, STATUS_LIGHTNESS.1),
        accent.c.clamp(STATUS_CHROMA.0, STATUS_CHROMA.1),
        0.0,
    );
    let status = |hue: f64| status_tone.with_hue(hue);
    let tint = |hue: f64| {
        let fg = status(hue);
        LchColor::new(
            base.l + (fg.l - base.l) * TINT_MIX,
            fg.c * TINT_CHROMA_SCALE,
            hue,
        )
        .clamped()
    };

    DerivedPalette::from_fn(|role| match role {
        SemanticRole::Background => base,
        SemanticRole::SurfaceElevated => base.lighten(t * SURFACE_STEPS.elevated),
        SemanticRole::SurfacePanel => base.lighten(t * SURFACE_STEPS.panel),
        SemanticRole::SurfaceModal => base.lighten(t * SURFACE_STEPS.modal),
        SemanticRole::TextPrimary => text(0),
        SemanticRole::TextSecondary => text(1),
        SemanticRole::TextTertiary => text(2),
        SemanticRole::BorderSubtle => border(0),
        SemanticRole::BorderDefault => border(1),
        SemanticRole::BorderStrong => border(2),
        SemanticRole::BorderFocus => base
            .lighten(t * FOCUS_LIGHTNESS)
            .with_hue(accent.h)
            .with_chroma(base.c.max(accent.c * FOCUS_CHROMA_SCALE)),
        SemanticRole::Accent => accent,
        SemanticRole::AccentHover => accent
            .lighten(t * HOVER_LIGHTNESS)
            .with_chroma(accent.c + HOVER_CHROMA),
        SemanticRole::Success => status(SUCCESS_HUE),
        SemanticRole::SuccessBg => tint(SUCCESS_HUE),
        SemanticRole::Warning => status(WARNING_HUE),
        SemanticRole::WarningBg => tint(WARNING_HUE),
        SemanticRole::Error => status(ERROR_HUE),
        SemanticRole::ErrorBg => tint(ERROR_HUE),
        SemanticRole::Info => status(INFO_HUE),
        SemanticRole::InfoBg => tint(INFO_HUE),
    })
}
