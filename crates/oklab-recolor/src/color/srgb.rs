//! sRGB color type
//!
//! sRGB is the encoding of every byte that enters or leaves the engine:
//! decoded image pixels, palette hex strings and the recolored output.

use std::str::FromStr;

use super::linear_rgb::LinearRgb;
use crate::palette::ParseColorError;

/// A color in gamma-encoded sRGB.
///
/// Channels are normalized to 0.0..=1.0 for in-gamut colors. Values coming
/// back from the perceptual space may overshoot that range; [`Srgb::clamped`]
/// and [`Srgb::to_bytes`] bring them back into gamut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    /// Red channel (gamma-encoded)
    pub r: f64,
    /// Green channel (gamma-encoded)
    pub g: f64,
    /// Blue channel (gamma-encoded)
    pub b: f64,
}

impl Srgb {
    #[inline]
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Create an Srgb color from 8-bit channel values.
    ///
    /// # Example
    /// ```
    /// use oklab_recolor::Srgb;
    /// let red = Srgb::from_u8(255, 0, 0);
    /// assert_eq!(red.r, 1.0);
    /// ```
    #[inline]
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Create an Srgb color from a byte array [R, G, B].
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::from_u8(bytes[0], bytes[1], bytes[2])
    }

    /// Force every channel back into 0.0..=1.0 (the gamut clamp).
    #[inline]
    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Convert to a byte array [R, G, B].
    ///
    /// Each channel is scaled to 0..=255, clamped, then rounded half to
    /// even, which is how an 8-bit clamped pixel store quantizes a real
    /// value.
    ///
    /// # Example
    /// ```
    /// use oklab_recolor::Srgb;
    /// let color = Srgb::new(1.2, 0.5, -0.1);
    /// assert_eq!(color.to_bytes(), [255, 128, 0]);
    /// ```
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
        ]
    }

    /// Format as a lowercase `#rrggbb` string.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_bytes();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

#[inline]
fn channel_to_u8(c: f64) -> u8 {
    (c * 255.0).clamp(0.0, 255.0).round_ties_even() as u8
}

impl From<LinearRgb> for Srgb {
    /// Inverse sRGB transfer function (IEC 61966-2-1), unclamped.
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: encode_gamma(linear.r),
            g: encode_gamma(linear.g),
            b: encode_gamma(linear.b),
        }
    }
}

#[inline]
fn encode_gamma(c: f64) -> f64 {
    if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse a `#RRGGBB` hex string.
    ///
    /// Hex digits are case-insensitive. Nothing else is accepted: no
    /// shorthand, no missing hash, no surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use oklab_recolor::Srgb;
    ///
    /// let white: Srgb = "#FFFFFF".parse().unwrap();
    /// assert_eq!(white.r, 1.0);
    /// assert!("red".parse::<Srgb>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').ok_or(ParseColorError::MissingHash)?;
        if digits.len() != 6 {
            return Err(ParseColorError::InvalidLength(digits.len()));
        }
        // from_str_radix tolerates a leading '+', so check the digits first
        if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidDigit(c));
        }

        let r = u8::from_str_radix(&digits[0..2], 16)?;
        let g = u8::from_str_radix(&digits[2..4], 16)?;
        let b = u8::from_str_radix(&digits[4..6], 16)?;
        Ok(Self::from_u8(r, g, b))
    }
}
