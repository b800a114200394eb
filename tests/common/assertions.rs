//! Assertion helpers for tests.

use oklab_recolor::{Palette, PixelBuffer};
use pretty_assertions::assert_eq;

/// Assert bytes look like a PNG file
pub fn assert_png(bytes: &[u8]) {
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
        "Expected PNG image, got {} bytes starting with {:?}",
        bytes.len(),
        &bytes[..8.min(bytes.len())]
    );
}

/// Assert every output pixel is one of the palette's output colors
pub fn assert_only_palette_colors(image: &PixelBuffer, hex: &[&str]) {
    let palette = Palette::from_hex(hex).unwrap();
    let allowed: Vec<[u8; 3]> = (0..palette.len()).map(|i| palette.output(i)).collect();

    for (i, px) in image.as_bytes().chunks_exact(4).enumerate() {
        let rgb = [px[0], px[1], px[2]];
        assert!(
            allowed.contains(&rgb),
            "Pixel {i} has color {rgb:?}, not in palette {hex:?}"
        );
    }
}

/// Assert the output has the source's dimensions and alpha channel
pub fn assert_same_shape(source: &PixelBuffer, output: &PixelBuffer) {
    assert_eq!(
        (output.width(), output.height()),
        (source.width(), source.height())
    );
    let src_alpha: Vec<u8> = source.as_bytes().iter().skip(3).step_by(4).copied().collect();
    let out_alpha: Vec<u8> = output.as_bytes().iter().skip(3).step_by(4).copied().collect();
    assert_eq!(out_alpha, src_alpha, "alpha channel changed");
}

/// Assert progress never decreases and ends at 100
pub fn assert_progress_complete(progress: &[u8]) {
    assert!(
        progress.windows(2).all(|w| w[0] <= w[1]),
        "Progress went backwards: {progress:?}"
    );
    assert_eq!(progress.last(), Some(&100), "Progress did not reach 100");
}
