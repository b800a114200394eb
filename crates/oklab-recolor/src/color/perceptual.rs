//! The perceptual representation used for matching.

use super::{LinearRgb, Oklab, Oklch, Srgb};

/// One color in perceptual space, held in both Cartesian and polar form.
///
/// The Cartesian `a`/`b` are always derived from the polar `c`/`h`
/// (`a = c·cos(h)`, `b = c·sin(h)`), so the two forms agree bit for bit.
/// Matching measures distance on the Cartesian form; conversion back to
/// sRGB starts from the polar form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerceptualColor {
    lab: Oklab,
    lch: Oklch,
}

impl PerceptualColor {
    /// Build from the polar form, deriving the Cartesian axes.
    #[inline]
    pub fn from_lch(lch: Oklch) -> Self {
        Self {
            lab: Oklab::from(lch),
            lch,
        }
    }

    /// Convert an 8-bit sRGB triple into perceptual space.
    ///
    /// # Example
    ///
    /// ```
    /// use oklab_recolor::PerceptualColor;
    ///
    /// let white = PerceptualColor::from_rgb([255, 255, 255]);
    /// assert!((white.lab().l - 1.0).abs() < 1e-6);
    /// ```
    #[inline]
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self::from(Srgb::from_bytes(rgb))
    }

    #[inline]
    pub fn lab(&self) -> Oklab {
        self.lab
    }

    #[inline]
    pub fn lch(&self) -> Oklch {
        self.lch
    }

    /// Convert back to sRGB, gamut-clamped to 0.0..=1.0.
    pub fn to_srgb(&self) -> Srgb {
        // self.lab is already the Cartesian image of self.lch
        Srgb::from(LinearRgb::from(self.lab)).clamped()
    }

    /// Convert back to 8-bit sRGB.
    #[inline]
    pub fn to_rgb8(&self) -> [u8; 3] {
        self.to_srgb().to_bytes()
    }

    /// Squared Euclidean distance to `other` on the Cartesian form.
    #[inline]
    pub fn distance_squared(&self, other: &PerceptualColor) -> f64 {
        self.lab.distance_squared(other.lab)
    }
}

impl From<Srgb> for PerceptualColor {
    fn from(srgb: Srgb) -> Self {
        let lab = Oklab::from(LinearRgb::from(srgb));
        Self::from_lch(Oklch::from(lab))
    }
}
