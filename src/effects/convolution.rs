use rayon::prelude::*;

use crate::foundation::error::{RasterError, RasterResult};
use crate::raster::buffer::RasterBuffer;

/// Classic 3x3 sharpen weights (`5` centre, `-1` on the four edge neighbours).
pub const SHARPEN_3X3: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Square convolution kernel plus the mix factor used to blend with the original.
///
/// Weights are stored row-major. The side length is `sqrt(weights.len())` and
/// must be an integer. `mix` is not restricted to `[0, 1]`: values outside that
/// range extrapolate linearly.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvolutionKernel {
    weights: Vec<f32>,
    side: usize,
    mix: f32,
}

impl ConvolutionKernel {
    /// Build a kernel, failing with [`RasterError::InvalidKernel`] when the
    /// weight count is not a non-zero perfect square.
    pub fn new(weights: Vec<f32>, mix: f32) -> RasterResult<Self> {
        if weights.is_empty() {
            return Err(RasterError::invalid_kernel("kernel has no weights"));
        }
        let side = weights.len().isqrt();
        if side * side != weights.len() {
            return Err(RasterError::invalid_kernel(format!(
                "{} weights do not form a square grid",
                weights.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite()) {
            return Err(RasterError::validation("kernel weights must be finite"));
        }
        if !mix.is_finite() {
            return Err(RasterError::validation("kernel mix must be finite"));
        }
        Ok(Self { weights, side, mix })
    }

    /// 3x3 sharpen kernel.
    pub fn sharpen(mix: f32) -> RasterResult<Self> {
        Self::new(SHARPEN_3X3.to_vec(), mix)
    }

    /// 3x3 box blur (every weight `1/9`).
    pub fn box_blur(mix: f32) -> RasterResult<Self> {
        Self::new(vec![1.0 / 9.0; 9], mix)
    }

    /// 1x1 identity kernel at full mix.
    pub fn identity() -> Self {
        Self {
            weights: vec![1.0],
            side: 1,
            mix: 1.0,
        }
    }

    /// Row-major weights.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Side length of the square footprint.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Blend factor between the filtered and the original value.
    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Same weights, different mix.
    pub fn with_mix(mut self, mix: f32) -> RasterResult<Self> {
        if !mix.is_finite() {
            return Err(RasterError::validation("kernel mix must be finite"));
        }
        self.mix = mix;
        Ok(self)
    }

    fn half(&self) -> i64 {
        (self.side / 2) as i64
    }
}

/// Unclamped convolution output: interleaved `R, G, B, A` as `f32`.
///
/// Colour channels may fall outside `[0, 255]`; alpha is the source alpha.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvolvedImage {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl ConvolvedImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Interleaved channel values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Channel values at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let v = &self.values[idx..idx + 4];
        Some([v[0], v[1], v[2], v[3]])
    }

    /// Store into RGBA8, rounding half to even and saturating to `[0, 255]`.
    pub fn to_rgba8(&self) -> RasterResult<RasterBuffer> {
        let pixels = self.values.iter().map(|&v| store_u8(v)).collect();
        RasterBuffer::from_rgba8(self.width, self.height, pixels)
    }
}

/// Row scheduling for [`ConvolutionFilter`].
#[derive(Clone, Debug, Default)]
pub struct FilterThreading {
    /// Convolve rows on rayon workers when `true`.
    pub parallel: bool,
    /// Dedicated worker count. `None` uses the global rayon pool.
    pub threads: Option<usize>,
}

/// Applies a [`ConvolutionKernel`] to every pixel of a raster.
#[derive(Clone, Debug, Default)]
pub struct ConvolutionFilter {
    threading: FilterThreading,
}

impl ConvolutionFilter {
    /// Serial filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter with explicit row scheduling. Output does not depend on it.
    pub fn with_threading(threading: FilterThreading) -> Self {
        Self { threading }
    }

    /// Convolve and store the result as RGBA8.
    ///
    /// Out-of-range channel values are saturated on store; use
    /// [`ConvolutionFilter::convolve`] for the raw values.
    pub fn apply(
        &self,
        buffer: &RasterBuffer,
        kernel: &ConvolutionKernel,
    ) -> RasterResult<RasterBuffer> {
        self.convolve(buffer, kernel)?.to_rgba8()
    }

    /// Convolve without clamping.
    ///
    /// For every pixel and each colour channel the weighted sum covers the
    /// kernel footprint centred on the pixel. Footprint cells outside the
    /// raster are skipped, so border pixels receive partial sums. The sum is
    /// blended as `sum * mix + original * (1 - mix)`; alpha is copied.
    #[tracing::instrument(
        skip(self, buffer, kernel),
        fields(width = buffer.width(), height = buffer.height(), side = kernel.side())
    )]
    pub fn convolve(
        &self,
        buffer: &RasterBuffer,
        kernel: &ConvolutionKernel,
    ) -> RasterResult<ConvolvedImage> {
        let (width, height) = buffer.dimensions();
        let row_len = (width as usize) * 4;
        let mut values = vec![0.0f32; buffer.pixels().len()];
        let src = buffer.pixels();

        let run_rows = |values: &mut [f32]| {
            values
                .par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| convolve_row(src, width, height, y as u32, kernel, row));
        };

        if !self.threading.parallel {
            for (y, row) in values.chunks_mut(row_len).enumerate() {
                convolve_row(src, width, height, y as u32, kernel, row);
            }
        } else if let Some(n) = self.threading.threads {
            build_thread_pool(n)?.install(|| run_rows(&mut values));
        } else {
            run_rows(&mut values);
        }

        tracing::debug!(parallel = self.threading.parallel, "convolution done");
        Ok(ConvolvedImage {
            width,
            height,
            values,
        })
    }
}

fn convolve_row(
    src: &[u8],
    width: u32,
    height: u32,
    y: u32,
    kernel: &ConvolutionKernel,
    out: &mut [f32],
) {
    let (w, h) = (i64::from(width), i64::from(height));
    let side = kernel.side();
    let half = kernel.half();
    let mix = kernel.mix();
    let y = i64::from(y);

    for x in 0..w {
        let mut acc = [0.0f32; 3];
        for (ky, weights) in kernel.weights().chunks_exact(side).enumerate() {
            let sy = y + ky as i64 - half;
            if sy < 0 || sy >= h {
                continue;
            }
            for (kx, &wt) in weights.iter().enumerate() {
                let sx = x + kx as i64 - half;
                if sx < 0 || sx >= w {
                    continue;
                }
                let idx = ((sy * w + sx) as usize) * 4;
                for c in 0..3 {
                    acc[c] += f32::from(src[idx + c]) * wt;
                }
            }
        }

        let idx = ((y * w + x) as usize) * 4;
        let o = (x as usize) * 4;
        for c in 0..3 {
            let orig = f32::from(src[idx + c]);
            out[o + c] = acc[c] * mix + orig * (1.0 - mix);
        }
        out[o + 3] = f32::from(src[idx + 3]);
    }
}

fn store_u8(v: f32) -> u8 {
    v.round_ties_even().clamp(0.0, 255.0) as u8
}

fn build_thread_pool(threads: usize) -> RasterResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(RasterError::validation(
            "filter threading 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| RasterError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/effects/convolution.rs"]
mod tests;
