use std::io::Cursor;

use anyhow::Context;

use crate::{RasterResult, raster::buffer::RasterBuffer};

/// Decode encoded image bytes into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> RasterResult<RasterBuffer> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    RasterBuffer::try_from(dyn_img.to_rgba8())
}

/// Encode a raster as PNG.
pub fn encode_png(buffer: &RasterBuffer) -> RasterResult<Vec<u8>> {
    let mut out = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut out),
        buffer.pixels(),
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
