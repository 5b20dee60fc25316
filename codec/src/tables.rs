//! Frozen fixed-point constants and quantization tables
//!
//! Every table in here is a plain `const`. Deriving any of them from
//! floating point at run time is forbidden: the device and the host must
//! agree bit for bit, and two libm builds are two opinions.

/// Fixed-point scale for the trigonometric constants, 2^20.
pub const SCALE: i64 = 1 << 20;

// round(cos(PI / 16) * SCALE) and friends. The set is frozen; a compile-time
// recomputation is only acceptable if it reproduces these exact integers.
pub const C1: i64 = 1_028_428;
pub const S1: i64 = 204_567;
pub const C3: i64 = 871_859;
pub const S3: i64 = 582_558;
pub const C6: i64 = 401_273;
pub const S6: i64 = 968_758;
pub const SQRT_2: i64 = 1_482_910;

/*
// The matrix-kernel basis, before freezing:
//
//     COS[k][n] = round(cos(PI * k * (2n + 1) / 16) * SCALE)
//     NORM[0]   = round(sqrt(1.0 / 8.0) * SCALE)
//     NORM[k>0] = round(sqrt(2.0 / 8.0) * SCALE)
*/

/// DCT-II basis for the direct matrix kernel, row `k` = frequency.
#[rustfmt::skip]
pub const COS: [[i64; 8]; 8] = [
    [ 1_048_576,  1_048_576,  1_048_576,  1_048_576,  1_048_576,  1_048_576,  1_048_576,  1_048_576, ],
    [ 1_028_428,    871_859,    582_558,    204_567,   -204_567,   -582_558,   -871_859, -1_028_428, ],
    [   968_758,    401_273,   -401_273,   -968_758,   -968_758,   -401_273,    401_273,    968_758, ],
    [   871_859,   -204_567, -1_028_428,   -582_558,    582_558,  1_028_428,    204_567,   -871_859, ],
    [   741_455,   -741_455,   -741_455,    741_455,    741_455,   -741_455,   -741_455,    741_455, ],
    [   582_558, -1_028_428,    204_567,    871_859,   -871_859,   -204_567,  1_028_428,   -582_558, ],
    [   401_273,   -968_758,    968_758,   -401_273,   -401_273,    968_758,   -968_758,    401_273, ],
    [   204_567,   -582_558,    871_859, -1_028_428,  1_028_428,   -871_859,    582_558,   -204_567, ],
];

/// Per-frequency normalization for the matrix kernel.
pub const NORM: [i64; 8] = [
    370_728, 524_288, 524_288, 524_288, 524_288, 524_288, 524_288, 524_288,
];

/// Row norms of the Cintra-Bayer matrix, `round(sqrt(norm^2) * 1024)`.
///
/// The approximation's rows have squared norms {8, 6, 4, 6, 8, 6, 4, 6}; the
/// quantizer folds these into the scaled table so that a given `k` means the
/// same thing for every kernel.
pub const APPROX_ROW_NORM: [i64; 8] = [2896, 2508, 2048, 2508, 2896, 2508, 2048, 2508];

/// Annex K luminance table at quality 50.
#[rustfmt::skip]
pub const Q50_LUMA: [i32; 64] = [
    16, 11, 10, 16,  24,  40,  51,  61,
    12, 12, 14, 19,  26,  58,  60,  55,
    14, 13, 16, 24,  40,  57,  69,  56,
    14, 17, 22, 29,  51,  87,  80,  62,
    18, 22, 37, 56,  68, 109, 103,  77,
    24, 35, 55, 64,  81, 104, 113,  92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103,  99,
];

/// Annex K chrominance table at quality 50.
#[rustfmt::skip]
pub const Q50_CHROMA: [i32; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// All-ones table, used when the standard tables are disabled.
pub const UNITY_TABLE: [i32; 64] = [1; 64];

/// The standard JPEG zigzag scan: `ZIGZAG[scan_position] = flat_index`.
#[rustfmt::skip]
pub const ZIGZAG: [usize; 64] = [
     0,  1,  8, 16,  9,  2,  3, 10,
    17, 24, 32, 25, 18, 11,  4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13,  6,  7, 14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];
