//! End-to-end codec scenarios over synthetic images.
//!
//! The reference figures in here were produced by an exact integer model of
//! the pipeline; the implementation must reproduce them bit for bit, which
//! is the same promise the capture device and the host make to each other.

use mcujpeg_rs::{
    compress, compress_report, decompress, zigzag_bpp, CodecOption, Image, KernelKind, Params,
    QuantizedBundle,
};

// ---------------------------------------------------------------------------
// deterministic test images
// ---------------------------------------------------------------------------

/// Integer lattice hash for the value-noise image.
fn hash2(ix: u32, iy: u32, seed: u32) -> u32 {
    let mut h = ix
        .wrapping_mul(374_761_393)
        .wrapping_add(iy.wrapping_mul(668_265_263))
        .wrapping_add(seed.wrapping_mul(144_664_589));
    h ^= h >> 13;
    h = h.wrapping_mul(1_274_126_177);
    (h ^ (h >> 16)) & 0xFF
}

/// Bilinear value noise on a lattice with spacing `p`, in `0..=255`.
fn vnoise(x: usize, y: usize, p: usize, seed: u32) -> i32 {
    let (ix, iy) = ((x / p) as u32, (y / p) as u32);
    let (fx, fy) = ((x % p) as i64, (y % p) as i64);
    let p = p as i64;

    let a = hash2(ix, iy, seed) as i64;
    let b = hash2(ix + 1, iy, seed) as i64;
    let c = hash2(ix, iy + 1, seed) as i64;
    let d = hash2(ix + 1, iy + 1, seed) as i64;

    let top = a * (p - fx) + b * fx;
    let bot = c * (p - fx) + d * fx;
    ((top * (p - fy) + bot * fy) / (p * p)) as i32
}

/// A natural-looking fractal test image: four octaves of value noise with a
/// 1/f amplitude falloff, per channel.
fn noise_image(width: usize, height: usize) -> Vec<u8> {
    const OCTAVES: [(usize, i32); 4] = [(32, 90), (16, 70), (8, 60), (4, 45)];

    let mut rgb = Vec::with_capacity(3 * width * height);
    for y in 0..height {
        for x in 0..width {
            for ch in 0..3u32 {
                let mut v = 128i32;
                for &(p, amp) in OCTAVES.iter() {
                    // the blend floors its quotients; `/` would truncate
                    v += ((vnoise(x, y, p, ch * 7 + p as u32) - 128) * amp).div_euclid(128);
                }
                rgb.push(v.max(0).min(255) as u8);
            }
        }
    }
    rgb
}

fn psnr(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len());
    let se: u64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i64 - y as i64;
            (d * d) as u64
        })
        .sum();
    if se == 0 {
        return f64::INFINITY;
    }
    let mse = se as f64 / a.len() as f64;
    10.0 * (255.0 * 255.0 / mse).log10()
}

fn max_channel_dev(a: &[u8], b: &[u8]) -> i32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x as i32 - y as i32).abs())
        .max()
        .unwrap_or(0)
}

fn blocks(plane: &[i32]) -> impl Iterator<Item = &[i32]> {
    plane.chunks_exact(64)
}

// ---------------------------------------------------------------------------
// scenarios
// ---------------------------------------------------------------------------

#[test]
fn all_zero_image() {
    let image = Image::from_rgb(16, 8, vec![0; 3 * 16 * 8]).unwrap();
    let bundle = compress(&image, &Params::new(KernelKind::Loeffler, 1.0)).unwrap();

    // the -128 level shift leaves a lone DC of -1024 per luma block, which
    // the Q50 table divides down to -64; chroma is exactly centered
    for block in blocks(bundle.as_luma()) {
        assert_eq!(block[0], -64);
        assert!(block[1..].iter().all(|&v| v == 0));
    }
    assert!(bundle.as_chroma_b().iter().all(|&v| v == 0));
    assert!(bundle.as_chroma_r().iter().all(|&v| v == 0));

    // one coefficient per luma block: 2 * 8 bits over 6 * 64 samples
    let bpp = zigzag_bpp(&bundle);
    assert!((bpp - 16.0 / 384.0).abs() < 1e-12, "bpp {}", bpp);

    let rebuilt = decompress(&bundle).unwrap();
    assert!(rebuilt.data().iter().all(|&v| v == 0));
}

#[test]
fn constant_gray_image_vanishes_entirely() {
    let image = Image::from_rgb(8, 8, vec![128; 192]).unwrap();
    let bundle = compress(&image, &Params::new(KernelKind::Loeffler, 1.0)).unwrap();

    // (128, 128, 128) converts to (0, 0, 0), so every coefficient dies
    assert!(bundle.as_luma().iter().all(|&v| v == 0));
    assert!(bundle.as_chroma_b().iter().all(|&v| v == 0));
    assert!(bundle.as_chroma_r().iter().all(|&v| v == 0));
    assert_eq!(zigzag_bpp(&bundle), 0.0);

    let rebuilt = decompress(&bundle).unwrap();
    assert_eq!(rebuilt.data(), image.data());
}

#[test]
fn pure_red_block_through_the_matrix_kernel() {
    let mut data = Vec::with_capacity(192);
    for _ in 0..64 {
        data.extend_from_slice(&[255, 0, 0]);
    }
    let image = Image::from_rgb(8, 8, data).unwrap();
    let bundle = compress(&image, &Params::new(KernelKind::Matrix, 1.0)).unwrap();

    // Y = 76 - 128 = -52 everywhere; the 2D DC is -416; quantized by 16
    assert_eq!(bundle.as_luma()[0], -26);
    assert!(bundle.as_luma()[1..].iter().all(|&v| v == 0));
    // Cb = -42 -> DC -336 / 17; Cr = 128 -> DC 1024 / 17
    assert_eq!(bundle.as_chroma_b()[0], -20);
    assert_eq!(bundle.as_chroma_r()[0], 60);

    let rebuilt = decompress(&bundle).unwrap();
    for px in rebuilt.data().chunks_exact(3) {
        assert_eq!(px, &[255, 0, 3]);
    }
}

#[test]
fn identity_kernel_with_unity_tables_is_transparent() {
    // a pseudo-random RGB image from a xorshift32 stream
    let mut state = 0x2545_F491u32;
    let data: Vec<u8> = (0..(3 * 32 * 24))
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state & 0xFF) as u8
        })
        .collect();
    let image = Image::from_rgb(32, 24, data).unwrap();

    let params = Params {
        k: 1.0,
        kernel: KernelKind::Identity,
        options: CodecOption::empty(), // unity tables
    };
    let bundle = compress(&image, &params).unwrap();
    let rebuilt = decompress(&bundle).unwrap();

    // the transform and quantizer are both pass-throughs here, so the only
    // loss left is the integer color conversion, bounded by 4 per channel
    assert!(max_channel_dev(image.data(), rebuilt.data()) <= 4);

    // and the whole thing is deterministic
    let again = compress(&image, &params).unwrap();
    assert_eq!(bundle, again);
}

#[test]
fn small_reference_image_pins() {
    let data = noise_image(16, 12);
    assert_eq!(&data[..9], &[0, 14, 216, 0, 20, 214, 0, 28, 214]);

    let image = Image::from_rgb(16, 12, data).unwrap();
    let params = Params::new(KernelKind::Loeffler, 2.0);
    let (bundle, report) = compress_report(&image, &params).unwrap();
    assert_eq!(bundle.num_blocks(), 6);

    #[rustfmt::skip]
    let expected_y0: [i32; 64] = [
        -13, -3,  4, -1, 0, 0, 0, 0,
         -5, -2, -1,  0, 0, 0, 0, 0,
          1, -1,  0,  0, 0, 0, 0, 0,
         -1,  0,  0,  0, 0, 0, 0, 0,
          0,  0,  0,  0, 0, 0, 0, 0,
          0,  0,  0,  0, 0, 0, 0, 0,
          0,  0,  0,  0, 0, 0, 0, 0,
          0,  0,  0,  0, 0, 0, 0, 0,
    ];
    assert_eq!(&bundle.as_luma()[..64], &expected_y0[..]);

    let cb0 = &bundle.as_chroma_b()[..64];
    assert_eq!(&cb0[..3], &[22, 1, -1]);
    assert_eq!(cb0[8], 1);
    assert_eq!(cb0[16], -1);

    // 832 estimated bits over 12 blocks of 64 samples
    assert!((report.bitrate_bpp - 832.0 / 768.0).abs() < 1e-12);

    let rebuilt = decompress(&bundle).unwrap();
    assert_eq!(&rebuilt.data()[..9], &[1, 13, 188, 8, 17, 202, 15, 22, 217]);
    let p = psnr(image.data(), rebuilt.data());
    assert!((p - 28.269).abs() < 0.01, "psnr {}", p);

    // the fast kernel and the matrix reference must produce the same bundle
    let matrix = compress(&image, &Params::new(KernelKind::Matrix, 2.0)).unwrap();
    assert_eq!(matrix.as_luma(), bundle.as_luma());
    assert_eq!(matrix.as_chroma_b(), bundle.as_chroma_b());
    assert_eq!(matrix.as_chroma_r(), bundle.as_chroma_r());
}

#[test]
fn skip_quantization_roundtrip() {
    let data = noise_image(16, 12);
    let image = Image::from_rgb(16, 12, data).unwrap();
    let params = Params {
        k: 2.0,
        kernel: KernelKind::Loeffler,
        options: CodecOption::STANDARD_TABLES
            | CodecOption::SKIP_QUANTIZATION
            | CodecOption::KEEP_COEFFICIENTS,
    };

    let bundle = compress(&image, &params).unwrap();
    // with quantization bypassed, the quantized planes are the raw ones
    assert_eq!(Some(bundle.as_luma()), bundle.raw_luma());
    assert_eq!(bundle.as_luma()[..4], [-419, -70, 72, -20]);

    // only transform and color rounding remain
    let rebuilt = decompress(&bundle).unwrap();
    assert!(max_channel_dev(image.data(), rebuilt.data()) <= 6);
}

/// The 320x240 reference comparison the whole experiment exists for:
/// each kernel across the quality sweep, with pinned bitrate figures,
/// monotonically non-increasing bitrate in `k` and the reference PSNR.
#[test]
fn reference_image_quality_sweep() {
    const KS: [f32; 6] = [0.25, 0.5, 1.0, 2.0, 4.0, 8.0];

    // (kernel, [(bpp, psnr)]) produced by the integer reference model
    let expectations: [(KernelKind, [(f64, f64); 6]); 3] = [
        (
            KernelKind::Loeffler,
            [
                (1.8049, 38.272),
                (1.4637, 36.151),
                (1.1750, 33.221),
                (0.9112, 29.940),
                (0.5667, 26.127),
                (0.3033, 22.715),
            ],
        ),
        (
            KernelKind::Matrix,
            [
                (1.8049, 38.272),
                (1.4637, 36.151),
                (1.1750, 33.221),
                (0.9112, 29.940),
                (0.5667, 26.127),
                (0.3033, 22.715),
            ],
        ),
        (
            KernelKind::Approximate,
            [
                (4.0256, 33.444),
                (2.3485, 30.493),
                (1.3893, 28.775),
                (0.9325, 27.181),
                (0.5417, 24.846),
                (0.2886, 22.175),
            ],
        ),
    ];

    let data = noise_image(320, 240);
    let image = Image::from_rgb(320, 240, data).unwrap();

    for (kernel, expected) in expectations.iter() {
        let mut previous_bpp = f64::INFINITY;
        for (&k, &(want_bpp, want_psnr)) in KS.iter().zip(expected.iter()) {
            let bundle = compress(&image, &Params::new(*kernel, k)).unwrap();
            let bpp = zigzag_bpp(&bundle);

            assert!(
                (bpp - want_bpp).abs() < 5e-4,
                "{:?} k={}: bpp {} want {}",
                kernel,
                k,
                bpp,
                want_bpp
            );
            assert!(bpp <= previous_bpp, "{:?}: bitrate rose at k={}", kernel, k);
            previous_bpp = bpp;

            let rebuilt = decompress(&bundle).unwrap();
            let p = psnr(image.data(), rebuilt.data());
            assert!(
                (p - want_psnr).abs() < 5e-3,
                "{:?} k={}: psnr {} want {}",
                kernel,
                k,
                p,
                want_psnr
            );
        }
    }
}

#[test]
fn bundles_survive_the_wire_contract() {
    // what the receiver does: decompress a bundle rebuilt from raw planes
    let data = noise_image(24, 17);
    let image = Image::from_rgb(24, 17, data).unwrap();
    let params = Params::new(KernelKind::Approximate, 1.0);

    let bundle = compress(&image, &params).unwrap();
    let rebuilt_bundle = QuantizedBundle::new(
        bundle.width(),
        bundle.height(),
        bundle.quality(),
        bundle.kernel(),
        bundle.options(),
        bundle.as_luma().to_vec(),
        bundle.as_chroma_b().to_vec(),
        bundle.as_chroma_r().to_vec(),
    )
    .unwrap();

    assert_eq!(
        decompress(&bundle).unwrap(),
        decompress(&rebuilt_bundle).unwrap()
    );
}
