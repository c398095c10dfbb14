//! Seed-level accessibility summary shown next to each theme.
//!
//! The contrast ratio here is a lightness-delta proxy,
//! `|L(base) - L(accent)| / 100 * 21`, not WCAG relative luminance. It is
//! kept for compatibility with existing grades; see [`crate::contrast`] for
//! the luminance-based audit of a derived palette. Harmony is a fixed label.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::ThemeCore;

const AAA_NORMAL: f64 = 7.0;
const AA_NORMAL: f64 = 4.5;
const MAX_RATIO: f64 = 21.0;

const COOL_HUES: (f64, f64) = (180.0, 300.0);
const LOW_SATURATION: f64 = 20.0;
const MEDIUM_SATURATION: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "FAIL")]
    Fail,
    #[serde(rename = "AA")]
    Aa,
    #[serde(rename = "AAA")]
    Aaa,
}

impl Grade {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= AAA_NORMAL {
            Grade::Aaa
        } else if ratio >= AA_NORMAL {
            Grade::Aa
        } else {
            Grade::Fail
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Grade::Aaa => "AAA",
            Grade::Aa => "AA",
            Grade::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Harmony {
    Complementary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Warm,
    Cool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaturationLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for Harmony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("complementary")
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temperature::Warm => f.write_str("warm"),
            Temperature::Cool => f.write_str("cool"),
        }
    }
}

impl fmt::Display for SaturationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaturationLevel::Low => f.write_str("low"),
            SaturationLevel::Medium => f.write_str("medium"),
            SaturationLevel::High => f.write_str("high"),
        }
    }
}

/// Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityReport {
    pub contrast_ratio: f64,
    pub grade: Grade,
    pub harmony: Harmony,
    pub temperature: Temperature,
    pub saturation_level: SaturationLevel,
}

pub fn analyze(core: &ThemeCore) -> AccessibilityReport {
    let contrast_ratio = contrast_ratio(core);
    AccessibilityReport {
        contrast_ratio,
        grade: Grade::from_ratio(contrast_ratio),
        harmony: Harmony::Complementary,
        temperature: temperature(core.base.h),
        saturation_level: saturation_level(core.base.c),
    }
}

/// Lightness-delta contrast proxy between the two seeds.
pub fn contrast_ratio(core: &ThemeCore) -> f64 {
    let delta = (core.base.l - core.accent.l).abs();
    (delta / 100.0 * MAX_RATIO).clamp(0.0, MAX_RATIO)
}

pub fn temperature(hue: f64) -> Temperature {
    if hue > COOL_HUES.0 && hue < COOL_HUES.1 {
        Temperature::Cool
    } else {
        Temperature::Warm
    }
}

pub fn saturation_level(chroma: f64) -> SaturationLevel {
    if chroma < LOW_SATURATION {
        SaturationLevel::Low
    } else if chroma < MEDIUM_SATURATION {
        SaturationLevel::Medium
    } else {
        SaturationLevel::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lch::LchColor;

    fn core(base: (f64, f64, f64), accent_l: f64) -> ThemeCore {
        ThemeCore::new(
            LchColor::new(base.0, base.1, base.2),
            LchColor::new(accent_l, 60.0, 255.0),
        )
    }

    #[test]
    fn test_reference_dark_theme() {
        let report = analyze(&core((8.0, 4.0, 250.0), 64.0));
        assert!((report.contrast_ratio - 11.76).abs() < 1e-9);
        assert_eq!(report.grade, Grade::Aaa);
        assert_eq!(report.temperature, Temperature::Cool);
        assert_eq!(report.saturation_level, SaturationLevel::Low);
        assert_eq!(report.harmony, Harmony::Complementary);
    }

    #[test]
    fn test_grade_thresholds_are_exact() {
        assert_eq!(Grade::from_ratio(7.0), Grade::Aaa);
        assert_eq!(Grade::from_ratio(6.999), Grade::Aa);
        assert_eq!(Grade::from_ratio(4.5), Grade::Aa);
        assert_eq!(Grade::from_ratio(4.499), Grade::Fail);
        assert_eq!(Grade::from_ratio(0.0), Grade::Fail);
    }

    #[test]
    fn test_grade_is_monotonic_in_lightness_delta() {
        let mut last = Grade::Fail;
        for base_l in (0..=64).rev() {
            let grade = analyze(&core((base_l as f64, 4.0, 250.0), 64.0)).grade;
            assert!(grade >= last, "grade dropped at base L {}", base_l);
            last = grade;
        }
        assert_eq!(last, Grade::Aaa);
    }

    #[test]
    fn test_temperature_bounds_are_exclusive() {
        assert_eq!(temperature(180.0), Temperature::Warm);
        assert_eq!(temperature(180.5), Temperature::Cool);
        assert_eq!(temperature(299.9), Temperature::Cool);
        assert_eq!(temperature(300.0), Temperature::Warm);
        assert_eq!(temperature(30.0), Temperature::Warm);
    }

    #[test]
    fn test_saturation_levels() {
        assert_eq!(saturation_level(0.0), SaturationLevel::Low);
        assert_eq!(saturation_level(19.9), SaturationLevel::Low);
        assert_eq!(saturation_level(20.0), SaturationLevel::Medium);
        assert_eq!(saturation_level(59.9), SaturationLevel::Medium);
        assert_eq!(saturation_level(60.0), SaturationLevel::High);
    }

    #[test]
    fn test_report_serializes_with_wire_labels() {
        let report = analyze(&core((94.0, 30.0, 40.0), 40.0));
        let json = serde_json::to_value(report).unwrap();
        assert_eq!(json["grade"], "AAA");
        assert_eq!(json["temperature"], "warm");
        assert_eq!(json["saturationLevel"], "medium");
        assert_eq!(json["harmony"], "complementary");
    }
}
