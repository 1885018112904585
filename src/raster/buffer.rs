use crate::foundation::error::{RasterError, RasterResult};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// An owned, immutable straight-alpha RGBA8 raster.
///
/// Pixels are interleaved `R, G, B, A`, row-major, top-to-bottom and
/// left-to-right. `pixels().len() == width * height * 4` always holds; every
/// constructor checks it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterBuffer {
    /// Wrap raw RGBA8 bytes.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> RasterResult<Self> {
        let expected = byte_len(width, height)?;
        if pixels.len() != expected {
            return Err(RasterError::validation(format!(
                "rgba8 buffer for {width}x{height} must hold {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A fully transparent black raster.
    pub fn new_transparent(width: u32, height: u32) -> RasterResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0u8; len],
        })
    }

    /// A raster where every pixel equals `px`.
    pub fn solid(width: u32, height: u32, px: Rgba8) -> RasterResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: px.repeat(len / 4),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels (`width * height`).
    pub fn len_pixels(&self) -> usize {
        self.pixels.len() / 4
    }

    /// Interleaved RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.pixels[idx..idx + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Consume the raster and return its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Convert into an `image` crate buffer without copying.
    pub fn into_rgba_image(self) -> RasterResult<image::RgbaImage> {
        let (w, h) = (self.width, self.height);
        let len = self.pixels.len();
        image::RgbaImage::from_raw(w, h, self.pixels).ok_or_else(|| {
            RasterError::validation(format!("{w}x{h} raster holds {len} bytes"))
        })
    }

    /// Crate-internal mutable access for in-place writers that keep the size fixed.
    pub(crate) fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

impl TryFrom<image::RgbaImage> for RasterBuffer {
    type Error = RasterError;

    fn try_from(img: image::RgbaImage) -> RasterResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }
}

/// `width * height * 4`, rejecting zero-area and overflowing sizes.
pub(crate) fn byte_len(width: u32, height: u32) -> RasterResult<usize> {
    if width == 0 || height == 0 {
        return Err(RasterError::invalid_dimensions(width, height));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| RasterError::invalid_dimensions(width, height))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
