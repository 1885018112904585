use super::*;

fn noisy(w: u32, h: u32) -> RasterBuffer {
    let mut raw = Vec::with_capacity((w * h * 4) as usize);
    let mut s = 0x2545_f491u32;
    for _ in 0..w * h * 4 {
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        raw.push((s >> 24) as u8);
    }
    RasterBuffer::from_rgba8(w, h, raw).unwrap()
}

fn checker(w: u32, h: u32) -> RasterBuffer {
    let mut raw = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            raw.extend_from_slice(&[v, v, v, 255]);
        }
    }
    RasterBuffer::from_rgba8(w, h, raw).unwrap()
}

#[test]
fn solid_red_4x4_to_2x2_stays_red() {
    let src = RasterBuffer::solid(4, 4, [255, 0, 0, 255]).unwrap();
    let out = Downsampler::new()
        .resample(&ResampleRequest::new(Some(&src), 2, 2))
        .unwrap()
        .unwrap();
    assert_eq!(out.dimensions(), (2, 2));
    assert!(out.pixels().chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
}

#[test]
fn identity_resample_is_pixel_exact() {
    let src = noisy(13, 9);
    let out = Downsampler::new()
        .resample(&ResampleRequest::new(Some(&src), 13, 9))
        .unwrap()
        .unwrap();
    assert_eq!(out, src);
}

#[test]
fn output_always_matches_requested_size() {
    let src = noisy(37, 21);
    let ds = Downsampler::new();
    for (w, h) in [(1, 1), (5, 3), (36, 20), (37, 10), (10, 21), (80, 5), (100, 100)] {
        let out = ds
            .resample(&ResampleRequest::new(Some(&src), w, h))
            .unwrap()
            .unwrap();
        assert_eq!(out.dimensions(), (w, h));
        assert_eq!(out.pixels().len(), (w * h * 4) as usize);
    }
}

#[test]
fn every_filter_honours_the_size_contract() {
    let src = noisy(50, 40);
    for filter in [
        ResampleFilter::Nearest,
        ResampleFilter::Bilinear,
        ResampleFilter::CatmullRom,
        ResampleFilter::Lanczos3,
    ] {
        let out = Downsampler::with_filter(filter)
            .resample(&ResampleRequest::new(Some(&src), 7, 6))
            .unwrap()
            .unwrap();
        assert_eq!(out.dimensions(), (7, 6));
    }
}

#[test]
fn opacity_zero_clears_alpha_everywhere() {
    let src = noisy(32, 32);
    for (w, h) in [(5, 5), (32, 32), (64, 16)] {
        let out = Downsampler::new()
            .resample(&ResampleRequest::new(Some(&src), w, h).with_opacity(0.0))
            .unwrap()
            .unwrap();
        assert!(out.pixels().chunks_exact(4).all(|p| p[3] == 0));
    }
}

#[test]
fn opacity_scales_alpha_of_opaque_source() {
    let src = RasterBuffer::solid(16, 16, [10, 20, 30, 255]).unwrap();
    let full = Downsampler::new()
        .resample(&ResampleRequest::new(Some(&src), 3, 3))
        .unwrap()
        .unwrap();
    assert!(full.pixels().chunks_exact(4).all(|p| p == [10, 20, 30, 255]));

    let half = Downsampler::new()
        .resample(&ResampleRequest::new(Some(&src), 3, 3).with_opacity(0.5))
        .unwrap()
        .unwrap();
    assert!(half.pixels().chunks_exact(4).all(|p| p == [10, 20, 30, 128]));
}

#[test]
fn box_chain_averages_fine_detail() {
    let src = checker(8, 8);
    let out = Downsampler::new()
        .resample(&ResampleRequest::new(Some(&src), 1, 1))
        .unwrap()
        .unwrap();
    let p = out.pixel(0, 0).unwrap();
    assert!((i16::from(p[0]) - 128).abs() <= 1, "{p:?}");
    assert_eq!(p[3], 255);
}

#[test]
fn transparent_pixels_do_not_bleed_colour() {
    let (w, h) = (16u32, 16u32);
    let mut raw = Vec::new();
    for _ in 0..h {
        for x in 0..w {
            if x < w / 2 {
                raw.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                raw.extend_from_slice(&[0, 255, 0, 0]);
            }
        }
    }
    let src = RasterBuffer::from_rgba8(w, h, raw).unwrap();
    let out = Downsampler::new()
        .resample(&ResampleRequest::new(Some(&src), 3, 3))
        .unwrap()
        .unwrap();
    for p in out.pixels().chunks_exact(4).filter(|p| p[3] > 0) {
        assert_eq!(p[1], 0, "{p:?}");
    }
}

#[test]
fn zero_target_is_invalid_dimensions() {
    let src = RasterBuffer::solid(4, 4, [1, 2, 3, 4]).unwrap();
    for (w, h) in [(0u32, 2u32), (2, 0)] {
        let err = Downsampler::new()
            .resample(&ResampleRequest::new(Some(&src), w, h))
            .unwrap_err();
        assert!(matches!(err, RasterError::InvalidDimensions { .. }));
    }
}

#[test]
fn non_finite_opacity_is_rejected() {
    let src = RasterBuffer::solid(4, 4, [1, 2, 3, 4]).unwrap();
    let err = Downsampler::new()
        .resample(&ResampleRequest::new(Some(&src), 2, 2).with_opacity(f32::NAN))
        .unwrap_err();
    assert!(matches!(err, RasterError::Validation(_)));
}

#[test]
fn absent_source_is_a_no_op() {
    let ds = Downsampler::new();
    assert!(ds.resample(&ResampleRequest::new(None, 4, 4)).unwrap().is_none());
    assert!(ds.resample(&ResampleRequest::new(None, 0, 0)).unwrap().is_none());

    let mut dst = RasterBuffer::solid(4, 4, [9, 9, 9, 9]).unwrap();
    let before = dst.clone();
    assert!(!ds.resample_into(&ResampleRequest::new(None, 4, 4), &mut dst).unwrap());
    assert_eq!(dst, before);
}

#[test]
fn resample_into_clears_and_writes() {
    let src = RasterBuffer::solid(8, 8, [0, 0, 255, 255]).unwrap();
    let mut dst = RasterBuffer::solid(2, 2, [200, 200, 200, 200]).unwrap();
    let wrote = Downsampler::new()
        .resample_into(&ResampleRequest::new(Some(&src), 2, 2).with_opacity(0.0), &mut dst)
        .unwrap();
    assert!(wrote);
    assert!(dst.pixels().chunks_exact(4).all(|p| p == [0, 0, 255, 0]));
}

#[test]
fn resample_into_rejects_mismatched_destination_without_writing() {
    let src = RasterBuffer::solid(8, 8, [0, 0, 255, 255]).unwrap();
    let mut dst = RasterBuffer::solid(3, 2, [7, 7, 7, 7]).unwrap();
    let before = dst.clone();
    let err = Downsampler::new()
        .resample_into(&ResampleRequest::new(Some(&src), 2, 2), &mut dst)
        .unwrap_err();
    assert!(matches!(err, RasterError::Validation(_)));
    assert_eq!(dst, before);

    let err = Downsampler::new()
        .resample_into(&ResampleRequest::new(Some(&src), 0, 2), &mut dst)
        .unwrap_err();
    assert!(matches!(err, RasterError::InvalidDimensions { .. }));
    assert_eq!(dst, before);
}

#[test]
fn request_reports_shrink_branch() {
    let src = RasterBuffer::solid(10, 10, [0, 0, 0, 255]).unwrap();
    assert!(ResampleRequest::new(Some(&src), 9, 9).is_shrink());
    assert!(!ResampleRequest::new(Some(&src), 10, 9).is_shrink());
    assert!(!ResampleRequest::new(Some(&src), 20, 5).is_shrink());
    assert!(!ResampleRequest::new(None, 1, 1).is_shrink());
}

fn black_with_white(w: u32, h: u32, white: impl Fn(u32, u32) -> bool) -> RasterBuffer {
    let mut raw = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let v = if white(x, y) { 255 } else { 0 };
            raw.extend_from_slice(&[v, v, v, 255]);
        }
    }
    RasterBuffer::from_rgba8(w, h, raw).unwrap()
}

#[test]
fn odd_source_right_columns_reach_a_single_pixel() {
    let src = black_with_white(7, 7, |x, _| x >= 4);
    let out = Downsampler::new()
        .resample(&ResampleRequest::new(Some(&src), 1, 1))
        .unwrap()
        .unwrap();
    let [r, g, b, a] = out.pixel(0, 0).unwrap();
    assert_eq!(a, 255);
    assert_eq!((r, r), (g, b));
    // three of seven columns are white
    assert!((80..=130).contains(&r), "got {r}");
}

#[test]
fn odd_source_trailing_column_lands_in_right_output_column() {
    // 5x5 -> 2x2 takes one halving; the 2x2 level is the output
    let src = black_with_white(5, 5, |x, _| x == 4);
    let out = Downsampler::new()
        .resample(&ResampleRequest::new(Some(&src), 2, 2))
        .unwrap()
        .unwrap();
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(0, 1), Some([0, 0, 0, 255]));
    assert_eq!(out.pixel(1, 0), Some([102, 102, 102, 255]));
    assert_eq!(out.pixel(1, 1), Some([102, 102, 102, 255]));
}

#[test]
fn wide_odd_source_keeps_last_column_through_every_level() {
    let src = black_with_white(1023, 9, |x, _| x == 1022);
    let mut level = src;
    for _ in 0..halving_steps(1023, 9, 1, 1) {
        level = halve_box(&level).unwrap();
    }
    assert_eq!(level.dimensions(), (127, 1));
    // 255 * 511/1023 * 255/511 * 127/255, rounded per level
    let [r, _, _, a] = level.pixel(126, 0).unwrap();
    assert_eq!(a, 255);
    assert!((28..=34).contains(&r), "got {r}");
    assert!((0..126).all(|x| level.pixel(x, 0) == Some([0, 0, 0, 255])));
}

#[test]
fn odd_sizes_keep_right_and_bottom_border_when_shrunk_to_one_pixel() {
    for w in (3..=63u32).step_by(2) {
        for h in (3..=63u32).step_by(2) {
            let src = black_with_white(w, h, |x, y| x == w - 1 || y == h - 1);
            let out = Downsampler::new()
                .resample(&ResampleRequest::new(Some(&src), 1, 1))
                .unwrap()
                .unwrap();
            let [r, _, _, a] = out.pixel(0, 0).unwrap();
            assert_eq!(a, 255, "{w}x{h}");
            assert!(r > 0, "{w}x{h}: border vanished");
        }
    }
}
