//! WCAG luminance contrast audit of a derived palette.
//!
//! Unlike the seed-level proxy in [`crate::accessibility`], this converts
//! every role to sRGB and measures real relative-luminance contrast between
//! the pairs a UI actually puts on top of each other.

use std::fmt;

use serde::Serialize;

use crate::palette::{DerivedPalette, SemanticRole};
use crate::types::ThemeDefinition;

const AA_NORMAL: f64 = 4.5;
const AA_LARGE: f64 = 3.0;
const AAA_NORMAL: f64 = 7.0;

/// (background, foreground) role pairs checked for every palette.
pub const CHECKED_PAIRS: &[(SemanticRole, SemanticRole)] = &[
    (SemanticRole::Background, SemanticRole::TextPrimary),
    (SemanticRole::Background, SemanticRole::TextSecondary),
    (SemanticRole::Background, SemanticRole::TextTertiary),
    (SemanticRole::Background, SemanticRole::Accent),
    (SemanticRole::SurfaceElevated, SemanticRole::TextPrimary),
    (SemanticRole::SurfaceModal, SemanticRole::TextPrimary),
    (SemanticRole::SuccessBg, SemanticRole::Success),
    (SemanticRole::WarningBg, SemanticRole::Warning),
    (SemanticRole::ErrorBg, SemanticRole::Error),
    (SemanticRole::InfoBg, SemanticRole::Info),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WcagGrade {
    #[serde(rename = "AAA")]
    Aaa,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AA-large")]
    AaLarge,
    #[serde(rename = "FAIL")]
    Fail,
}

impl WcagGrade {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= AAA_NORMAL {
            WcagGrade::Aaa
        } else if ratio >= AA_NORMAL {
            WcagGrade::Aa
        } else if ratio >= AA_LARGE {
            WcagGrade::AaLarge
        } else {
            WcagGrade::Fail
        }
    }
}

impl fmt::Display for WcagGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WcagGrade::Aaa => "AAA",
            WcagGrade::Aa => "AA",
            WcagGrade::AaLarge => "AA-large",
            WcagGrade::Fail => "FAIL",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContrastResult {
    pub theme_id: String,
    pub theme_name: String,
    pub variant: String,
    pub pair: String,
    pub bg_hex: String,
    pub fg_hex: String,
    pub ratio: f64,
    pub grade: WcagGrade,
    pub pass: bool,
}

/// Check every pair in [`CHECKED_PAIRS`] for one palette.
pub fn check_palette(theme: &ThemeDefinition, palette: &DerivedPalette) -> Vec<ContrastResult> {
    CHECKED_PAIRS
        .iter()
        .map(|(bg_role, fg_role)| {
            let bg = palette.rgb(*bg_role);
            let fg = palette.rgb(*fg_role);
            let ratio = bg.contrast_ratio(&fg);

            ContrastResult {
                theme_id: theme.id().to_string(),
                theme_name: theme.name().to_string(),
                variant: theme.variant().to_string(),
                pair: format!("{} ↔ {}", bg_role, fg_role),
                bg_hex: bg.to_hex(),
                fg_hex: fg.to_hex(),
                ratio,
                grade: WcagGrade::from_ratio(ratio),
                pass: ratio >= AA_NORMAL,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::builtin_themes;
    use crate::derive::derive;

    #[test]
    fn test_wcag_grade_thresholds() {
        assert_eq!(WcagGrade::from_ratio(21.0), WcagGrade::Aaa);
        assert_eq!(WcagGrade::from_ratio(7.0), WcagGrade::Aaa);
        assert_eq!(WcagGrade::from_ratio(5.0), WcagGrade::Aa);
        assert_eq!(WcagGrade::from_ratio(3.0), WcagGrade::AaLarge);
        assert_eq!(WcagGrade::from_ratio(2.9), WcagGrade::Fail);
    }

    #[test]
    fn test_check_palette_covers_every_pair() {
        let theme = &builtin_themes()[0];
        let results = check_palette(theme, &derive(theme.core(), theme.variant()));
        assert_eq!(results.len(), CHECKED_PAIRS.len());
        assert_eq!(results[0].pair, "background ↔ text-primary");
        assert!(results.iter().all(|r| r.theme_id == theme.id()));
    }

    #[test]
    fn test_builtin_primary_text_passes_aa() {
        for theme in builtin_themes() {
            let palette = derive(theme.core(), theme.variant());
            let results = check_palette(&theme, &palette);
            assert!(
                results[0].pass,
                "{} primary text contrast {:.2}",
                theme.id(),
                results[0].ratio
            );
        }
    }
}
