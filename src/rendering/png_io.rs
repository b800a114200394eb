use crate::error::RenderError;
use oklab_recolor::PixelBuffer;
use std::io::Cursor;
use std::path::Path;

/// Decode a PNG into an RGBA8 pixel buffer.
///
/// Palette images are expanded, 16-bit samples are stripped to 8 bits, and
/// grey or opaque images gain the missing channels (alpha = 255).
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, RenderError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| RenderError::PngDecode(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| RenderError::PngDecode(e.to_string()))?;
    buf.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(RenderError::PngDecode(format!(
            "unexpected bit depth {:?} after normalisation",
            info.bit_depth
        )));
    }

    let rgba = match info.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|px| [px[0], px[1], px[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|px| [px[0], px[0], px[0], px[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(RenderError::PngDecode(
                "indexed image was not expanded".to_string(),
            ))
        }
    };

    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "Decoded PNG"
    );
    Ok(PixelBuffer::new(
        info.width as usize,
        info.height as usize,
        rgba,
    )?)
}

/// Encode an RGBA8 pixel buffer as a PNG.
pub fn encode_png(image: &PixelBuffer) -> Result<Vec<u8>, RenderError> {
    let unsupported = || RenderError::UnsupportedDimensions {
        width: image.width(),
        height: image.height(),
    };
    let width = u32::try_from(image.width()).map_err(|_| unsupported())?;
    let height = u32::try_from(image.height()).map_err(|_| unsupported())?;
    if width == 0 || height == 0 {
        return Err(unsupported());
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(image.as_bytes())
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

pub fn read_png(path: &Path) -> Result<PixelBuffer, RenderError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

pub fn write_png(path: &Path, image: &PixelBuffer) -> Result<(), RenderError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
