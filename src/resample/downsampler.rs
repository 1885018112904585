use image::imageops::FilterType;

use crate::effects::composite::{draw_cleared_in_place, scale_alpha_in_place};
use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};
use crate::raster::buffer::RasterBuffer;
use crate::resample::mip::{halve_box, halving_steps};
use crate::resample::request::ResampleRequest;

/// Filter used for the final, arbitrary-ratio resample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    /// Nearest neighbour.
    Nearest,
    /// Linear (triangle) filter.
    #[default]
    Bilinear,
    /// Cubic Catmull-Rom.
    CatmullRom,
    /// Lanczos with window 3.
    Lanczos3,
}

impl ResampleFilter {
    fn as_filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Anti-aliased downscaler.
///
/// When both target dimensions are smaller than the source, the source is
/// halved with an area-weighted box filter for [`halving_steps`] levels and the last
/// level is resampled to the target size. Otherwise the source is resampled
/// directly. Averaging runs on premultiplied data; input and output are
/// straight alpha.
#[derive(Clone, Copy, Debug, Default)]
pub struct Downsampler {
    filter: ResampleFilter,
}

impl Downsampler {
    /// Downsampler with the default bilinear final step.
    pub fn new() -> Self {
        Self::default()
    }

    /// Downsampler with an explicit final-step filter.
    pub fn with_filter(filter: ResampleFilter) -> Self {
        Self { filter }
    }

    /// Final-step filter.
    pub fn filter(&self) -> ResampleFilter {
        self.filter
    }

    /// Produce a new `width x height` raster, or `None` when the request has no source.
    #[tracing::instrument(
        skip(self, request),
        fields(width = request.width, height = request.height, opacity = request.opacity)
    )]
    pub fn resample(&self, request: &ResampleRequest<'_>) -> RasterResult<Option<RasterBuffer>> {
        let Some(source) = request.source else {
            tracing::debug!("no source raster; nothing to draw");
            return Ok(None);
        };
        request.validate()?;

        let mut out = self.scaled(source, request.width, request.height)?;
        scale_alpha_in_place(out.pixels_mut(), request.opacity)?;
        Ok(Some(out))
    }

    /// Resample into an existing raster of exactly the requested size.
    ///
    /// Returns `false` (and leaves `dst` untouched) when the request has no
    /// source. All validation happens before `dst` is written.
    pub fn resample_into(
        &self,
        request: &ResampleRequest<'_>,
        dst: &mut RasterBuffer,
    ) -> RasterResult<bool> {
        let Some(source) = request.source else {
            return Ok(false);
        };
        request.validate()?;
        if dst.dimensions() != (request.width, request.height) {
            return Err(RasterError::validation(format!(
                "destination is {}x{}, request targets {}x{}",
                dst.width(),
                dst.height(),
                request.width,
                request.height
            )));
        }

        let scaled = self.scaled(source, request.width, request.height)?;
        draw_cleared_in_place(dst.pixels_mut(), scaled.pixels(), request.opacity)?;
        Ok(true)
    }

    fn scaled(&self, source: &RasterBuffer, width: u32, height: u32) -> RasterResult<RasterBuffer> {
        let (sw, sh) = source.dimensions();
        if (sw, sh) == (width, height) {
            return Ok(source.clone());
        }

        let mut premul = source.pixels().to_vec();
        premultiply_rgba8_in_place(&mut premul);
        let mut level = RasterBuffer::from_rgba8(sw, sh, premul)?;

        if width < sw && height < sh {
            let steps = halving_steps(sw, sh, width, height);
            for n in 1..=steps {
                level = halve_box(&level)?;
                tracing::debug!(
                    level = n,
                    width = level.width(),
                    height = level.height(),
                    "halved"
                );
            }
        }

        let resized = if level.dimensions() == (width, height) {
            level
        } else {
            let img = image::imageops::resize(
                &level.into_rgba_image()?,
                width,
                height,
                self.filter.as_filter_type(),
            );
            RasterBuffer::try_from(img)?
        };

        let mut pixels = resized.into_raw();
        unpremultiply_rgba8_in_place(&mut pixels);
        RasterBuffer::from_rgba8(width, height, pixels)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/resample/downsampler.rs"]
mod tests;
