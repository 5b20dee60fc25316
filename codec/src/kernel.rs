//! 1D transform kernels and the 2D separable wrapper

mod approx;
mod loeffler;
mod matrix;

use crate::types::KernelKind;

/// Apply the forward 1D transform selected by `kind`.
#[inline]
pub(crate) fn forward_1d(kind: KernelKind, input: &[i32; 8]) -> [i32; 8] {
    match kind {
        KernelKind::Loeffler => loeffler::forward(input),
        KernelKind::Matrix => matrix::forward(input),
        KernelKind::Approximate => approx::forward(input),
        KernelKind::Identity => *input,
    }
}

/// Apply the inverse 1D transform selected by `kind`.
#[inline]
pub(crate) fn inverse_1d(kind: KernelKind, input: &[i32; 8]) -> [i32; 8] {
    match kind {
        KernelKind::Loeffler => loeffler::inverse(input),
        KernelKind::Matrix => matrix::inverse(input),
        KernelKind::Approximate => approx::inverse(input),
        KernelKind::Identity => *input,
    }
}

#[inline]
fn row(block: &[i32; 64], r: usize) -> [i32; 8] {
    let mut out = [0i32; 8];
    out.copy_from_slice(&block[r * 8..r * 8 + 8]);
    out
}

/// Forward 2D transform of one 8x8 block: rows first, then columns.
///
/// The order is part of the contract. The Loeffler and matrix kernels round
/// asymmetrically, so running columns first would produce different bits.
pub fn forward_2d(kind: KernelKind, block: &[i32; 64]) -> [i32; 64] {
    let mut transposed = [0i32; 64];
    for r in 0..8 {
        let out = forward_1d(kind, &row(block, r));
        for (c, &v) in out.iter().enumerate() {
            // store transposed so the column pass can read rows
            transposed[c * 8 + r] = v;
        }
    }

    let mut result = [0i32; 64];
    for r in 0..8 {
        let out = forward_1d(kind, &row(&transposed, r));
        for (c, &v) in out.iter().enumerate() {
            // undo the transposition
            result[c * 8 + r] = v;
        }
    }
    result
}

/// Inverse 2D transform of one 8x8 block: columns first, then rows.
pub fn inverse_2d(kind: KernelKind, block: &[i32; 64]) -> [i32; 64] {
    let mut columns_done = [0i32; 64];
    for c in 0..8 {
        let mut col = [0i32; 8];
        for r in 0..8 {
            col[r] = block[r * 8 + c];
        }
        let out = inverse_1d(kind, &col);
        for (r, &v) in out.iter().enumerate() {
            columns_done[r * 8 + c] = v;
        }
    }

    let mut result = [0i32; 64];
    for r in 0..8 {
        let out = inverse_1d(kind, &row(&columns_done, r));
        result[r * 8..r * 8 + 8].copy_from_slice(&out);
    }
    result
}
