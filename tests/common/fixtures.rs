//! Test fixtures and constants.

use oklab_recolor::PixelBuffer;
use tinct::models::PaletteSelection;

/// Palette names present in the embedded catalog
pub mod names {
    pub const KANAGAWA_PAPER: &str = "kanagawa paper";
    pub const ROSE_PINE: &str = "rose-pine";
    pub const NIGHT_OWL: &str = "night-owl";
}

pub fn black_white() -> PaletteSelection {
    PaletteSelection::named("black-white", vec!["#000000".into(), "#ffffff".into()])
}

pub fn single_red() -> PaletteSelection {
    PaletteSelection::named("red", vec!["#ff0000".into()])
}

/// A palette whose second entry is not valid hex
pub fn malformed() -> PaletteSelection {
    PaletteSelection::named("broken", vec!["#000000".into(), "red".into()])
}

pub fn empty() -> PaletteSelection {
    PaletteSelection::named("empty", Vec::new())
}

/// Every pixel a different color, alpha varying too
pub fn gradient(width: usize, height: usize) -> PixelBuffer {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                ((x * 31 + y * 17) % 256) as u8,
                (255 - (x + y) % 64) as u8,
            ]);
        }
    }
    PixelBuffer::new(width, height, data).unwrap()
}

pub fn solid(width: usize, height: usize, rgba: [u8; 4]) -> PixelBuffer {
    PixelBuffer::filled(width, height, rgba)
}
