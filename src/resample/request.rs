use crate::foundation::error::{RasterError, RasterResult};
use crate::raster::buffer::RasterBuffer;

/// One downscale: source raster, target size and a global opacity.
///
/// `source: None` means "no image loaded yet"; resampling it produces nothing
/// and is not an error.
#[derive(Clone, Copy, Debug)]
pub struct ResampleRequest<'a> {
    /// Raster to draw.
    pub source: Option<&'a RasterBuffer>,
    /// Target width, must be >= 1.
    pub width: u32,
    /// Target height, must be >= 1.
    pub height: u32,
    /// Multiplies output alpha; clamped to `[0, 1]` when applied.
    pub opacity: f32,
}

impl<'a> ResampleRequest<'a> {
    /// Request at full opacity.
    pub fn new(source: Option<&'a RasterBuffer>, width: u32, height: u32) -> Self {
        Self {
            source,
            width,
            height,
            opacity: 1.0,
        }
    }

    /// Override the opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Check target size and opacity.
    pub fn validate(&self) -> RasterResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::invalid_dimensions(self.width, self.height));
        }
        if !self.opacity.is_finite() {
            return Err(RasterError::validation("resample opacity must be finite"));
        }
        Ok(())
    }

    /// `true` when both target dimensions are strictly smaller than the source.
    pub fn is_shrink(&self) -> bool {
        self.source
            .is_some_and(|s| self.width < s.width() && self.height < s.height())
    }
}
