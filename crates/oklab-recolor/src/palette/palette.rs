//! Palette struct with precomputed perceptual coordinates and matching.

use std::str::FromStr;

use super::error::PaletteError;
use crate::color::{PerceptualColor, Srgb};

/// An ordered target palette, preprocessed for per-pixel matching.
///
/// # Precomputation
///
/// All color space work happens once, when the palette is built:
/// - the parsed sRGB bytes of every entry
/// - its [`PerceptualColor`] (what pixels are compared against)
/// - the bytes the entry converts back to (what gets written out)
///
/// The per-pixel cost is then one forward conversion plus a linear scan.
///
/// Entry order is part of the contract: on equal distance the earlier
/// entry wins.
///
/// # Example
///
/// ```
/// use oklab_recolor::{Palette, PerceptualColor};
///
/// let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
/// let sample = PerceptualColor::from_rgb([10, 10, 10]);
/// assert_eq!(palette.find_nearest(&sample), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Palette {
    srgb: Vec<[u8; 3]>,
    perceptual: Vec<PerceptualColor>,
    output: Vec<[u8; 3]>,
}

impl Palette {
    /// Preprocess a palette from already-parsed sRGB colors.
    ///
    /// # Errors
    ///
    /// [`PaletteError::Empty`] if `colors` is empty.
    pub fn new(colors: &[Srgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }

        let srgb: Vec<[u8; 3]> = colors.iter().map(|c| c.to_bytes()).collect();
        let perceptual: Vec<PerceptualColor> =
            colors.iter().map(|&c| PerceptualColor::from(c)).collect();
        let output: Vec<[u8; 3]> = perceptual.iter().map(|p| p.to_rgb8()).collect();

        Ok(Self {
            srgb,
            perceptual,
            output,
        })
    }

    /// Parse and preprocess a palette of `#RRGGBB` strings.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::Empty`] if `hex` is empty
    /// - [`PaletteError::ParseColor`] for the first malformed entry
    ///
    /// ```
    /// use oklab_recolor::{Palette, PaletteError};
    ///
    /// let err = Palette::from_hex(&["#000000", "red"]).unwrap_err();
    /// assert!(matches!(err, PaletteError::ParseColor { index: 1, .. }));
    /// ```
    pub fn from_hex<S: AsRef<str>>(hex: &[S]) -> Result<Self, PaletteError> {
        let colors = hex
            .iter()
            .enumerate()
            .map(|(index, s)| {
                Srgb::from_str(s.as_ref()).map_err(|source| PaletteError::ParseColor {
                    index,
                    value: s.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&colors)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.perceptual.len()
    }

    /// Always `false`; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.perceptual.is_empty()
    }

    /// The entry's source bytes, as parsed.
    #[inline]
    pub fn srgb(&self, idx: usize) -> [u8; 3] {
        self.srgb[idx]
    }

    #[inline]
    pub fn perceptual(&self, idx: usize) -> &PerceptualColor {
        &self.perceptual[idx]
    }

    /// The bytes written for pixels matched to entry `idx`: the entry's
    /// perceptual form converted back to sRGB and gamut-clamped.
    #[inline]
    pub fn output(&self, idx: usize) -> [u8; 3] {
        self.output[idx]
    }

    /// Index of the entry nearest to `sample` by squared Euclidean
    /// distance in Oklab. Ties go to the lowest index.
    #[inline]
    pub fn find_nearest(&self, sample: &PerceptualColor) -> usize {
        // Linear scan; palettes are a few dozen entries at most
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;

        for (i, entry) in self.perceptual.iter().enumerate() {
            let dist = sample.distance_squared(entry);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        best_idx
    }
}
