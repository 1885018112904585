//! rasterfx is a small CPU raster toolkit for display surfaces.
//!
//! It provides two independent, pure operations over straight-alpha RGBA8
//! buffers ([`RasterBuffer`]):
//!
//! 1. **Downsample**: [`Downsampler`] shrinks a raster without aliasing by
//!    halving it with an area-weighted box filter until one more halving would drop
//!    below the target size, then resampling the last level to the exact target.
//!    A global opacity scales the output alpha.
//! 2. **Convolve**: [`ConvolutionFilter`] applies a square
//!    [`ConvolutionKernel`] (3x3 sharpen by default), blends the result with the
//!    original by the kernel's mix factor and passes alpha through.
//!
//! Both are deterministic, keep no state between calls and never mutate their
//! inputs. [`ImageDisplay`] wires the downsampler to a typed configuration
//! surface; [`decode_image`] and [`encode_png`] bridge to encoded files.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Straight RGBA8** at every public boundary; premultiplication is internal.
//! - **Validate first**: a call either fails before writing anything or returns
//!   a complete buffer.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod display;
mod effects;
mod foundation;
mod raster;
mod resample;

pub use assets::codec::{decode_image, encode_png};
pub use display::image_display::ImageDisplay;
pub use display::options::{DisplayOptions, DisplayPatch, FilterOptions};
pub use effects::composite::{draw_cleared_in_place, scale_alpha_in_place, with_opacity};
pub use effects::convolution::{
    ConvolutionFilter, ConvolutionKernel, ConvolvedImage, FilterThreading, SHARPEN_3X3,
};
pub use foundation::error::{RasterError, RasterResult};
pub use foundation::ids::{DisplayId, IdSequence};
pub use raster::buffer::{RasterBuffer, Rgba8};
pub use resample::downsampler::{Downsampler, ResampleFilter};
pub use resample::mip::{halve_box, halving_steps, mip_chain};
pub use resample::request::ResampleRequest;
