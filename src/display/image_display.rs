use crate::display::options::{DisplayOptions, DisplayPatch};
use crate::foundation::error::RasterResult;
use crate::foundation::ids::DisplayId;
use crate::raster::buffer::RasterBuffer;
use crate::resample::downsampler::Downsampler;
use crate::resample::request::ResampleRequest;

/// Holds an optional source raster plus display options and renders it at the
/// configured size through a [`Downsampler`].
#[derive(Clone, Debug)]
pub struct ImageDisplay {
    id: DisplayId,
    options: DisplayOptions,
    image: Option<RasterBuffer>,
    downsampler: Downsampler,
}

impl ImageDisplay {
    /// New display without an image.
    pub fn new(id: DisplayId, options: DisplayOptions) -> Self {
        Self {
            id,
            options,
            image: None,
            downsampler: Downsampler::new(),
        }
    }

    /// Replace the downsampler (e.g. to change the final-step filter).
    pub fn with_downsampler(mut self, downsampler: Downsampler) -> Self {
        self.downsampler = downsampler;
        self
    }

    /// Caller-assigned id.
    pub fn id(&self) -> DisplayId {
        self.id
    }

    /// Current options.
    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Current source raster, if any.
    pub fn image(&self) -> Option<&RasterBuffer> {
        self.image.as_ref()
    }

    /// Set or clear the source raster.
    pub fn set_image(&mut self, image: Option<RasterBuffer>) {
        self.image = image;
    }

    /// Copy the fields present in `patch` onto the current options.
    pub fn configure(&mut self, patch: &DisplayPatch) {
        patch.apply_to(&mut self.options);
    }

    /// Like [`ImageDisplay::configure`], from JSON. Unknown keys are ignored;
    /// on error the options are left unchanged.
    pub fn configure_json(&mut self, value: &serde_json::Value) -> RasterResult<()> {
        let patch = DisplayPatch::from_json(value)?;
        self.configure(&patch);
        Ok(())
    }

    /// Draw the image at the configured size. `None` when no image is set.
    #[tracing::instrument(skip(self), fields(id = self.id.0))]
    pub fn render(&self) -> RasterResult<Option<RasterBuffer>> {
        let request = ResampleRequest::new(
            self.image.as_ref(),
            self.options.width,
            self.options.height,
        )
        .with_opacity(self.options.opacity);
        self.downsampler.resample(&request)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/display/image_display.rs"]
mod tests;
