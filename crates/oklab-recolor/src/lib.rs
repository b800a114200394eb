#![allow(clippy::excessive_precision, clippy::module_inception)]

//! oklab-recolor: recolor images into a fixed palette in OKLab space
//!
//! Every pixel of an image is replaced by the perceptually nearest color
//! of a small target palette. This crate holds the synchronous core: color
//! conversion, palette preprocessing, nearest-color matching, row chunking
//! and progress aggregation. Scheduling chunks onto threads is left to the
//! caller; every piece here is deterministic and shares no mutable state.
//!
//! # Quick Start
//!
//! ```
//! use oklab_recolor::{recolor_buffer, Palette, PixelBuffer};
//!
//! let palette = Palette::from_hex(&["#000000", "#ffffff"]).unwrap();
//! let image = PixelBuffer::filled(4, 4, [10, 10, 10, 255]);
//!
//! let out = recolor_buffer(&image, &palette);
//! assert_eq!(out.pixel(0, 0), [0, 0, 0, 255]);
//! ```
//!
//! # Parallel Use
//!
//! Split the image with [`ChunkTask::split`], run [`recolor_chunk`] on each
//! task wherever you like, and copy every [`ChunkResult`] back at its
//! `start` offset. Feed the [`ProgressEvent`]s into a
//! [`ProgressAggregator`] for a job-level percentage. The result is
//! byte-identical to [`recolor_buffer`] for any worker count.
//!
//! # Color Science
//!
//! ```text
//! sRGB bytes ──► linear RGB ──► LMS ──cbrt──► Oklab ──► Oklch
//!                                                        │
//!                         a = C·cos(h), b = C·sin(h) ◄───┘
//!                                   │
//!               squared Euclidean distance on (L, a, b)
//!                                   │
//!              nearest entry ──► back through the inverse chain
//!                                   │
//!                      clamp to [0, 255], round half to even
//! ```
//!
//! Distances are measured on the Cartesian axes, never on chroma/hue: hue
//! is undefined at zero chroma, and greys would otherwise match at random.
//! The transfer functions and matrices are the exact sRGB and OKLab
//! (2021-01-25) ones; changing any constant changes which entry wins for
//! pixels near a decision boundary.

pub mod chunk;
pub mod color;
pub mod image;
pub mod palette;
pub mod progress;


pub use chunk::{chunk_rows, recolor_buffer, recolor_chunk, ChunkResult, ChunkTask};
pub use color::{LinearRgb, Oklab, Oklch, PerceptualColor, Srgb};
pub use image::{ImageError, PixelBuffer, CHANNELS};
pub use palette::{Palette, PaletteError, ParseColorError};
pub use progress::{ProgressAggregator, ProgressEvent, DEFAULT_PROGRESS_INTERVAL};
