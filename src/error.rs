use oklab_recolor::{ImageError, PaletteError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecolorError {
    #[error("Palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("Chunk {chunk} worker failed: {reason}")]
    WorkerFailure { chunk: usize, reason: String },

    #[error("No source image loaded")]
    NoSource,

    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    #[error("Conversion to {palette:?} was superseded by a newer request")]
    Superseded { palette: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: usize, height: usize },

    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
