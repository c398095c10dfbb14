use crate::lch::LchColor;
use crate::types::{ThemeCore, ThemeDefinition, Variant};

/// Theme selected on first run and whenever stored state is unusable.
pub const DEFAULT_THEME_ID: &str = "default-light";

const fn lch(l: f64, c: f64, h: f64) -> LchColor {
    LchColor::new(l, c, h)
}

const fn core(base: LchColor, accent: LchColor) -> ThemeCore {
    ThemeCore::new(base, accent)
}

/// The theme behind [`DEFAULT_THEME_ID`].
pub fn default_theme() -> ThemeDefinition {
    ThemeDefinition::builtin(
        DEFAULT_THEME_ID,
        "Default Light",
        Variant::Light,
        "classic",
        core(lch(96.0, 2.0, 250.0), lch(48.0, 55.0, 255.0)),
        95,
    )
}

pub fn builtin_themes() -> Vec<ThemeDefinition> {
    use Variant::{Dark, Light};

    vec![
        default_theme(),
        ThemeDefinition::builtin(
            "default-dark",
            "Default Dark",
            Dark,
            "classic",
            core(lch(12.0, 4.0, 250.0), lch(68.0, 50.0, 250.0)),
            88,
        ),
        ThemeDefinition::builtin(
            "warm-hearth",
            "Warm Hearth",
            Light,
            "warm",
            core(lch(95.0, 6.0, 70.0), lch(52.0, 60.0, 40.0)),
            74,
        ),
        ThemeDefinition::builtin(
            "midnight-harbor",
            "Midnight Harbor",
            Dark,
            "calm",
            core(lch(8.0, 4.0, 250.0), lch(64.0, 60.0, 255.0)),
            70,
        ),
        ThemeDefinition::builtin(
            "sage-garden",
            "Sage Garden",
            Light,
            "nature",
            core(lch(94.0, 8.0, 140.0), lch(45.0, 40.0, 145.0)),
            66,
        ),
        ThemeDefinition::builtin(
            "lavender-calm",
            "Lavender Calm",
            Light,
            "calm",
            core(lch(95.0, 6.0, 300.0), lch(50.0, 50.0, 305.0)),
            61,
        ),
        ThemeDefinition::builtin(
            "forest-evening",
            "Forest Evening",
            Dark,
            "nature",
            core(lch(14.0, 8.0, 150.0), lch(70.0, 45.0, 140.0)),
            58,
        ),
        ThemeDefinition::builtin(
            "sunrise-clinic",
            "Sunrise Clinic",
            Light,
            "warm",
            core(lch(97.0, 5.0, 85.0), lch(58.0, 65.0, 55.0)),
            52,
        ),
        ThemeDefinition::builtin(
            "high-contrast-light",
            "High Contrast Light",
            Light,
            "accessibility",
            core(lch(100.0, 0.0, 0.0), lch(30.0, 70.0, 265.0)),
            40,
        ),
        ThemeDefinition::builtin(
            "high-contrast-dark",
            "High Contrast Dark",
            Dark,
            "accessibility",
            core(lch(0.0, 0.0, 0.0), lch(80.0, 60.0, 90.0)),
            38,
        ),
        ThemeDefinition::builtin(
            "soft-sand",
            "Soft Sand",
            Light,
            "warm",
            core(lch(92.0, 10.0, 75.0), lch(62.0, 35.0, 60.0)),
            30,
        ),
    ]
}
