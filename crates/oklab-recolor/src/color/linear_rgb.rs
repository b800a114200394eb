//! Linear RGB color type
//!
//! Linear RGB is the color space where the OKLab matrices apply. It sits
//! between the gamma-encoded bytes and the perceptual coordinates.

use super::srgb::Srgb;

/// A color in linear RGB color space.
///
/// Values are in 0.0..=1.0 when decoded from sRGB bytes, but may fall
/// outside that range on the way back from the perceptual space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRgb {
    /// Red channel (linear light intensity)
    pub r: f64,
    /// Green channel (linear light intensity)
    pub g: f64,
    /// Blue channel (linear light intensity)
    pub b: f64,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl From<Srgb> for LinearRgb {
    /// sRGB transfer function (IEC 61966-2-1), evaluated exactly.
    fn from(srgb: Srgb) -> Self {
        Self {
            r: decode_gamma(srgb.r),
            g: decode_gamma(srgb.g),
            b: decode_gamma(srgb.b),
        }
    }
}

#[inline]
fn decode_gamma(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
