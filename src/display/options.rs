use serde::{Deserialize, Serialize};

use crate::effects::convolution::{ConvolutionKernel, SHARPEN_3X3};
use crate::foundation::error::{RasterError, RasterResult};

/// Target size and opacity of an [`ImageDisplay`](crate::ImageDisplay).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Global alpha applied while drawing.
    pub opacity: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            opacity: 1.0,
        }
    }
}

/// Partial update for [`DisplayOptions`]. Absent fields keep their value.
///
/// Deserializing ignores keys other than `width`, `height` and `opacity`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPatch {
    /// New width.
    pub width: Option<u32>,
    /// New height.
    pub height: Option<u32>,
    /// New opacity.
    pub opacity: Option<f32>,
}

impl DisplayPatch {
    /// Parse a patch from loosely-typed JSON.
    pub fn from_json(value: &serde_json::Value) -> RasterResult<Self> {
        if !value.is_object() {
            return Err(RasterError::validation("display options must be a JSON object"));
        }
        let size = |key: &str| value.get(key).and_then(serde_json::Value::as_f64);
        if [size("width"), size("height")].iter().flatten().any(|&v| v <= 0.0) {
            let axis = |key: &str| size(key).map_or(0, |v| v.max(0.0) as u64);
            return Err(RasterError::invalid_dimensions(axis("width"), axis("height")));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| RasterError::validation(format!("display options: {e}")))
    }

    pub(crate) fn apply_to(&self, options: &mut DisplayOptions) {
        if let Some(w) = self.width {
            options.width = w;
        }
        if let Some(h) = self.height {
            options.height = h;
        }
        if let Some(o) = self.opacity {
            options.opacity = o;
        }
    }
}

/// Serializable convolution settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Row-major square kernel.
    pub weights: Vec<f32>,
    /// Blend factor between filtered and original values.
    pub mix: f32,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            weights: SHARPEN_3X3.to_vec(),
            mix: 1.0,
        }
    }
}

impl TryFrom<&FilterOptions> for ConvolutionKernel {
    type Error = RasterError;

    fn try_from(opts: &FilterOptions) -> RasterResult<Self> {
        ConvolutionKernel::new(opts.weights.clone(), opts.mix)
    }
}

impl TryFrom<FilterOptions> for ConvolutionKernel {
    type Error = RasterError;

    fn try_from(opts: FilterOptions) -> RasterResult<Self> {
        ConvolutionKernel::new(opts.weights, opts.mix)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/display/options.rs"]
mod tests;
