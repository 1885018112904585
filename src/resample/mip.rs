use crate::foundation::error::RasterResult;
use crate::raster::buffer::RasterBuffer;

/// Number of exact 2x halvings applied before the final resample.
///
/// This is the largest `n` such that `src_w / 2^n > dst_w`, `src_h / 2^n > dst_h`,
/// `src_w / 2^n >= 1` and `src_h / 2^n >= 1`, with the divisions taken as exact
/// rationals. The loop tests the *next* candidate level before committing to
/// it, so a source already within 2x of the target is never halved.
pub fn halving_steps(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> u32 {
    let (sw, sh) = (u64::from(src_w), u64::from(src_h));
    let (dw, dh) = (u64::from(dst_w), u64::from(dst_h));

    let mut steps = 0u32;
    loop {
        let k = steps + 1;
        // sources are at most u32::MAX wide
        if k > 32 {
            break;
        }
        let scale = 1u64 << k;
        let fits = sw >= scale && sh >= scale;
        let above_target = dw << k < sw && dh << k < sh;
        if !(fits && above_target) {
            break;
        }
        steps = k;
    }
    steps
}

/// Sizes of every level visited by the shrink path, source first.
pub fn mip_chain(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Vec<(u32, u32)> {
    let steps = halving_steps(src_w, src_h, dst_w, dst_h);
    (0..=steps)
        .map(|n| ((src_w >> n).max(1), (src_h >> n).max(1)))
        .collect()
}

/// Area-weighted halving of an RGBA8 raster.
///
/// Output is `(max(1, w / 2), max(1, h / 2))`. Every destination pixel averages
/// its exact source footprint of `w / dw` by `h / dh` pixels, so even sides
/// reduce to the plain 2x2 mean and an odd trailing column or row is shared by
/// the last destination cells instead of being lost. Each channel is averaged
/// independently with round-to-nearest, so callers wanting alpha-correct
/// averaging pass premultiplied data.
pub fn halve_box(src: &RasterBuffer) -> RasterResult<RasterBuffer> {
    let (sw, sh) = src.dimensions();
    let (dw, dh) = ((sw / 2).max(1), (sh / 2).max(1));
    let s = src.pixels();
    let stride = (sw as usize) * 4;

    let cols = footprint_taps(sw, dw);
    let rows = footprint_taps(sh, dh);
    // weights of one destination cell sum to sw * sh
    let total = u64::from(sw) * u64::from(sh);

    let mut out = Vec::with_capacity((dw as usize) * (dh as usize) * 4);
    for row_taps in &rows {
        for col_taps in &cols {
            let mut acc = [0u64; 4];
            for &(sy, wy) in row_taps {
                let line = &s[sy * stride..(sy + 1) * stride];
                for &(sx, wx) in col_taps {
                    let w = wx * wy;
                    let px = &line[sx * 4..sx * 4 + 4];
                    for (a, &v) in acc.iter_mut().zip(px) {
                        *a += u64::from(v) * w;
                    }
                }
            }
            for a in acc {
                out.push(((a + total / 2) / total) as u8);
            }
        }
    }

    RasterBuffer::from_rgba8(dw, dh, out)
}

/// Source taps and integer overlap weights for each of `dst_len` cells
/// spanning `src_len` pixels.
///
/// Coordinates are scaled by `dst_len * src_len` so overlaps stay integral:
/// cell `i` covers `[i * src_len, (i + 1) * src_len)` and source pixel `j`
/// covers `[j * dst_len, (j + 1) * dst_len)`. Each cell's weights sum to
/// `src_len`.
fn footprint_taps(src_len: u32, dst_len: u32) -> Vec<Vec<(usize, u64)>> {
    let (n, d) = (u64::from(src_len), u64::from(dst_len));
    (0..d)
        .map(|i| {
            let (lo, hi) = (i * n, (i + 1) * n);
            (lo / d..hi.div_ceil(d))
                .map(|j| {
                    let overlap = hi.min((j + 1) * d) - lo.max(j * d);
                    (j as usize, overlap)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/resample/mip.rs"]
mod tests;
