use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::math::scale_u8;
use crate::raster::buffer::Rgba8;

/// Scale a straight-alpha pixel's alpha by `opacity`; colour channels are kept.
pub fn with_opacity(px: Rgba8, opacity: f32) -> Rgba8 {
    if opacity >= 1.0 {
        return px;
    }
    [px[0], px[1], px[2], scale_u8(px[3], opacity)]
}

/// Multiply every alpha byte of an RGBA8 slice by `opacity` (clamped to `[0, 1]`).
pub fn scale_alpha_in_place(rgba: &mut [u8], opacity: f32) -> RasterResult<()> {
    if !rgba.len().is_multiple_of(4) {
        return Err(RasterError::validation(
            "scale_alpha_in_place expects an rgba8 buffer",
        ));
    }
    if !opacity.is_finite() {
        return Err(RasterError::validation("opacity must be finite"));
    }
    if opacity >= 1.0 {
        return Ok(());
    }
    for px in rgba.chunks_exact_mut(4) {
        px[3] = scale_u8(px[3], opacity);
    }
    Ok(())
}

/// Clear `dst`, then draw `src` into it with a global alpha of `opacity`.
///
/// Both slices must describe the same `width * height` raster.
pub fn draw_cleared_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> RasterResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(RasterError::validation(
            "draw_cleared_in_place expects equal-length rgba8 buffers",
        ));
    }
    if !opacity.is_finite() {
        return Err(RasterError::validation("opacity must be finite"));
    }
    dst.fill(0);
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = with_opacity([s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
