//! Perceptual color values.
//!
//! Themes are authored in CIE LCh(ab): lightness `0..=100`, chroma
//! `0..=MAX_CHROMA`, hue in degrees. Conversion to sRGB only happens at the
//! edge, when a palette is handed to the rendering layer.

use serde::{Deserialize, Serialize};

use crate::palette::Rgb;

/// Upper bound of chroma accepted anywhere in the engine.
pub const MAX_CHROMA: f64 = 132.0;

/// Lightness above which a background reads as "light".
pub const LIGHTNESS_MIDPOINT: f64 = 50.0;

/// Approximate sRGB gamut cusp chroma, sampled every 30 degrees of hue.
const CUSP_CHROMA: [f64; 12] = [
    100.0, // 0   magenta-red
    104.0, // 30  red
    90.0,  // 60  orange
    94.0,  // 90  yellow
    110.0, // 120 yellow-green
    115.0, // 150 green
    70.0,  // 180 teal
    55.0,  // 210 cyan
    70.0,  // 240 azure
    110.0, // 270 blue-violet
    131.0, // 300 blue
    118.0, // 330 magenta
];

// D65 reference white.
const XN: f64 = 0.95047;
const YN: f64 = 1.0;
const ZN: f64 = 1.08883;

const EPSILON: f64 = 216.0 / 24389.0;
const KAPPA: f64 = 24389.0 / 27.0;

/// A color in CIE LCh(ab). Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct LchColor {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl LchColor {
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    /// Bring every component into its valid range.
    ///
    /// Lightness is clamped to `[0, 100]`, hue wrapped modulo 360 and chroma
    /// clamped to the largest value reachable at that hue. NaN components
    /// collapse to zero.
    pub fn clamped(self) -> Self {
        let h = normalize_hue(self.h);
        let l = finite_or_zero(self.l).clamp(0.0, 100.0);
        let c = finite_or_zero(self.c).clamp(0.0, max_chroma_for_hue(h));
        Self { l, c, h }
    }

    pub fn with_lightness(self, l: f64) -> Self {
        Self { l, ..self }.clamped()
    }

    pub fn with_chroma(self, c: f64) -> Self {
        Self { c, ..self }.clamped()
    }

    pub fn with_hue(self, h: f64) -> Self {
        Self { h, ..self }.clamped()
    }

    /// Shift lightness by `delta`, clamping the result.
    pub fn lighten(self, delta: f64) -> Self {
        self.with_lightness(self.l + delta)
    }

    /// Convert to 8-bit sRGB through Lab and XYZ (D65).
    pub fn to_rgb(&self) -> Rgb {
        let lch = self.clamped();
        let rad = lch.h.to_radians();
        let a = lch.c * rad.cos();
        let b = lch.c * rad.sin();

        let fy = (lch.l + 16.0) / 116.0;
        let fx = fy + a / 500.0;
        let fz = fy - b / 200.0;

        let xr = lab_f_inv(fx);
        let yr = if lch.l > KAPPA * EPSILON {
            fy.powi(3)
        } else {
            lch.l / KAPPA
        };
        let zr = lab_f_inv(fz);

        let (x, y, z) = (xr * XN, yr * YN, zr * ZN);

        let r = 3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z;
        let g = -0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z;
        let b = 0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z;

        Rgb::new(encode_channel(r), encode_channel(g), encode_channel(b))
    }

    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }
}

impl From<[f64; 3]> for LchColor {
    fn from([l, c, h]: [f64; 3]) -> Self {
        Self::new(l, c, h)
    }
}

impl From<LchColor> for [f64; 3] {
    fn from(color: LchColor) -> Self {
        [color.l, color.c, color.h]
    }
}

/// Wrap a hue into `[0, 360)`.
pub fn normalize_hue(h: f64) -> f64 {
    let h = finite_or_zero(h).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}

/// Largest chroma the engine will produce for the given hue.
pub fn max_chroma_for_hue(h: f64) -> f64 {
    let h = normalize_hue(h);
    let pos = h / 30.0;
    let lo = pos.floor() as usize % CUSP_CHROMA.len();
    let hi = (lo + 1) % CUSP_CHROMA.len();
    let frac = pos - pos.floor();
    let chroma = CUSP_CHROMA[lo] + (CUSP_CHROMA[hi] - CUSP_CHROMA[lo]) * frac;
    chroma.min(MAX_CHROMA)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    let t3 = t.powi(3);
    if t3 > EPSILON {
        t3
    } else {
        (116.0 * t - 16.0) / KAPPA
    }
}

fn encode_channel(linear: f64) -> u8 {
    let v = linear.clamp(0.0, 1.0);
    let encoded = if v <= 0.003_130_8 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round().clamp(0.0, 255.0) as u8
}
