//! Color types and conversion utilities
//!
//! Every conversion between 8-bit sRGB and the perceptual space goes through
//! the typed steps below, so a value can never be used in the wrong space
//! by accident.
//!
//! # Color Spaces
//!
//! - **sRGB**: gamma-encoded channels, used for input/output bytes.
//! - **LinearRgb**: linear light, the input to the OKLab matrices.
//! - **Oklab** / **Oklch**: perceptual coordinates, Cartesian and polar.
//! - **PerceptualColor**: both OKLab forms kept in lockstep; what the
//!   palette and the matcher work with.
//!
//! # Example
//!
//! ```
//! use oklab_recolor::PerceptualColor;
//!
//! let orange = PerceptualColor::from_rgb([255, 128, 64]);
//! assert_eq!(orange.to_rgb8(), [255, 128, 64]);
//! ```

mod linear_rgb;
mod oklab;
mod perceptual;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use oklab::{Oklab, Oklch};
pub use perceptual::PerceptualColor;
pub use srgb::Srgb;
