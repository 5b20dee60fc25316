//! RGB-to-YCbCr encode and YCbCr-to-RGB decode

use itertools::izip;

/// Truncating division toward zero for a positive divisor.
///
/// This is the C division the device firmware uses; Rust's `/` has the same
/// semantics, but the conversions below are specified in terms of it, so it
/// gets a name.
#[inline]
fn trunc_div(n: i32, d: i32) -> i32 {
    n / d
}

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.max(0).min(255) as u8
}

/// Convert one RGB pixel into level-shifted YCbCr.
///
/// The coefficients are the BT.601 matrix scaled by 1000 and biased by 500 so
/// a single truncating division performs the rounding. The -128 level shift
/// is baked into the luma channel; `cb` and `cr` come out centered at zero.
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (i32, i32, i32) {
    let (r, g, b) = (r as i32, g as i32, b as i32);

    let y = trunc_div(299 * r + 587 * g + 114 * b + 500, 1000) - 128;
    let cb = trunc_div(-169 * r - 331 * g + 500 * b + 500, 1000);
    let cr = trunc_div(500 * r - 419 * g - 81 * b + 500, 1000);

    (y, cb, cr)
}

/// Convert one level-shifted YCbCr sample back into a clamped RGB pixel.
#[inline]
pub fn ycbcr_to_rgb(y: i32, cb: i32, cr: i32) -> (u8, u8, u8) {
    let y = y + 128;

    let r = clamp_u8(y + trunc_div(1402 * cr + 500, 1000));
    let g = clamp_u8(y - trunc_div(344 * cb + 714 * cr + 500, 1000));
    let b = clamp_u8(y + trunc_div(1772 * cb + 500, 1000));

    (r, g, b)
}

/// Split an interleaved RGB888 buffer into level-shifted Y, Cb and Cr planes.
///
/// `rgb.len()` must be a multiple of three; the planes come back with one
/// sample per pixel (4:4:4), in the same row-major order as the input.
pub fn rgb_to_planes(rgb: &[u8]) -> (Vec<i32>, Vec<i32>, Vec<i32>) {
    debug_assert_eq!(rgb.len() % 3, 0);

    let pixels = bytemuck::cast_slice::<u8, [u8; 3]>(rgb);
    let mut y = Vec::with_capacity(pixels.len());
    let mut cb = Vec::with_capacity(pixels.len());
    let mut cr = Vec::with_capacity(pixels.len());

    for px in pixels {
        let (py, pcb, pcr) = rgb_to_ycbcr(px[0], px[1], px[2]);
        y.push(py);
        cb.push(pcb);
        cr.push(pcr);
    }

    (y, cb, cr)
}

/// Merge three equally sized YCbCr planes back into an interleaved RGB888
/// buffer, clamping each component to `0..=255`.
pub fn planes_to_rgb(y: &[i32], cb: &[i32], cr: &[i32]) -> Vec<u8> {
    debug_assert_eq!(y.len(), cb.len());
    debug_assert_eq!(y.len(), cr.len());

    let mut rgb = Vec::with_capacity(y.len() * 3);
    for (&py, &pcb, &pcr) in izip!(y, cb, cr) {
        let (r, g, b) = ycbcr_to_rgb(py, pcb, pcr);
        rgb.push(r);
        rgb.push(g);
        rgb.push(b);
    }

    rgb
}

#[test]
fn test_primaries() {
    assert_eq!(rgb_to_ycbcr(0, 0, 0), (-128, 0, 0));
    assert_eq!(rgb_to_ycbcr(255, 255, 255), (127, 0, 0));
    assert_eq!(rgb_to_ycbcr(128, 128, 128), (0, 0, 0));
    assert_eq!(rgb_to_ycbcr(255, 0, 0), (-52, -42, 128));
    assert_eq!(rgb_to_ycbcr(0, 255, 0), (22, -83, -106));
    assert_eq!(rgb_to_ycbcr(0, 0, 255), (-99, 128, -20));
}

#[test]
fn test_gray_roundtrip_is_exact() {
    // Gray pixels survive the conversion untouched: the luma row of the
    // matrix sums to 1000 and both chroma rows sum to 0.
    for v in 0..=255u8 {
        let (y, cb, cr) = rgb_to_ycbcr(v, v, v);
        assert_eq!((cb, cr), (0, 0));
        assert_eq!(ycbcr_to_rgb(y, cb, cr), (v, v, v));
    }
}

#[test]
fn test_saturated_roundtrip() {
    assert_eq!(ycbcr_to_rgb(-52, -42, 128), (255, 0, 3));
    assert_eq!(ycbcr_to_rgb(22, -83, -106), (2, 253, 4));
    assert_eq!(ycbcr_to_rgb(-99, 128, -20), (2, 0, 255));

    // clamping on out-of-gamut samples
    assert_eq!(ycbcr_to_rgb(127, 128, 128), (255, 120, 255));
    assert_eq!(ycbcr_to_rgb(-128, -128, -128), (0, 134, 0));
    assert_eq!(ycbcr_to_rgb(0, 200, 0), (128, 59, 255));
    assert_eq!(ycbcr_to_rgb(0, -200, 0), (128, 196, 0));
}

#[test]
fn test_palette_roundtrip_within_two() {
    // the "tab10" palette:
    for &(r, g, b) in &[
        (31u8, 119u8, 180u8),
        (255, 127, 14),
        (44, 160, 44),
        (219, 39, 40),
        (148, 103, 189),
        (140, 86, 75),
        (227, 119, 194),
        (127, 127, 127),
        (188, 189, 34),
        (23, 190, 207),
    ] {
        let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
        let (r2, g2, b2) = ycbcr_to_rgb(y, cb, cr);
        assert!((r as i32 - r2 as i32).abs() <= 3, "{:?}", (r, g, b));
        assert!((g as i32 - g2 as i32).abs() <= 3, "{:?}", (r, g, b));
        assert!((b as i32 - b2 as i32).abs() <= 3, "{:?}", (r, g, b));
    }
}

#[test]
fn test_cube_roundtrip_within_four() {
    // The worst case over the whole 8-bit cube is a deviation of 4, e.g.
    // (0, 0, 154) -> (4, 0, 154); step through a coarse grid plus the edges.
    let axis: Vec<u8> = (0u8..=255).step_by(5).collect();
    for &r in &axis {
        for &g in &axis {
            for &b in &axis {
                let (y, cb, cr) = rgb_to_ycbcr(r, g, b);
                let (r2, g2, b2) = ycbcr_to_rgb(y, cb, cr);
                let dev = (r as i32 - r2 as i32)
                    .abs()
                    .max((g as i32 - g2 as i32).abs())
                    .max((b as i32 - b2 as i32).abs());
                assert!(dev <= 4, "{:?} -> {:?}", (r, g, b), (r2, g2, b2));
            }
        }
    }

    let (y, cb, cr) = rgb_to_ycbcr(0, 0, 154);
    assert_eq!(ycbcr_to_rgb(y, cb, cr), (4, 0, 154));
}

#[test]
fn test_planes_roundtrip_layout() {
    let rgb = [255u8, 0, 0, 0, 255, 0, 0, 0, 255, 128, 128, 128];
    let (y, cb, cr) = rgb_to_planes(&rgb);

    assert_eq!(y, vec![-52, 22, -99, 0]);
    assert_eq!(cb, vec![-42, -83, 128, 0]);
    assert_eq!(cr, vec![128, -106, -20, 0]);

    assert_eq!(
        planes_to_rgb(&y, &cb, &cr),
        vec![255, 0, 3, 2, 253, 4, 2, 0, 255, 128, 128, 128]
    );
}
