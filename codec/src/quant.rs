//! Coefficient quantization
//!
//! The divider is the only data-dependent division in the hot loop, so it is
//! replaced by a reciprocal multiplication. The reciprocal recipe is the one
//! the capture device runs; the host must use the same one, because the two
//! sides promise byte-identical bundles. `quantize_reference` keeps the
//! plain rounded division around as the cross-check.

use crate::fixed::round_div;
use crate::tables::{APPROX_ROW_NORM, SCALE};
use crate::types::KernelKind;

const RECIP_SHIFT: u32 = 16;

/// A scaled quantization table with its precomputed reciprocals.
#[derive(Debug, Clone)]
pub struct QuantTable {
    values: [i32; 64],
    recip: [i64; 64],
}

impl QuantTable {
    /// Scale a base table by the quality factor `k`.
    ///
    /// `k` is quantized to 1/1024 and applied as a fixed-point multiply;
    /// every entry is clamped to at least 1 afterwards, so quantization can
    /// never divide by zero no matter how small `k` gets.
    pub fn scaled(base: &[i32; 64], k: f32) -> QuantTable {
        let kq = (k * 1024.0).floor() as i64;
        let mut values = [0i32; 64];
        for (v, &b) in values.iter_mut().zip(base.iter()) {
            *v = ((b as i64 * kq) >> 10).max(1) as i32;
        }
        QuantTable::from_values(values)
    }

    /// Scale a base table for a particular kernel.
    ///
    /// For the approximate kernel the scaled entries are additionally
    /// multiplied by the row norms of the Cintra-Bayer matrix, which folds
    /// the transform's missing normalization into the divider and keeps a
    /// given `k` comparable across kernels.
    pub fn scaled_for_kernel(base: &[i32; 64], k: f32, kernel: KernelKind) -> QuantTable {
        let plain = QuantTable::scaled(base, k);
        if kernel != KernelKind::Approximate {
            return plain;
        }

        let mut values = [0i32; 64];
        for i in 0..8 {
            for j in 0..8 {
                let scaled = plain.values[i * 8 + j] as i64;
                let corrected = round_div(scaled * APPROX_ROW_NORM[i] * APPROX_ROW_NORM[j], SCALE);
                values[i * 8 + j] = corrected.max(1) as i32;
            }
        }
        QuantTable::from_values(values)
    }

    fn from_values(values: [i32; 64]) -> QuantTable {
        let mut recip = [0i64; 64];
        for (r, &q) in recip.iter_mut().zip(values.iter()) {
            let q = q as i64;
            *r = ((1 << RECIP_SHIFT) + q / 2) / q;
        }
        QuantTable { values, recip }
    }

    /// The scaled divider entries, row-major.
    pub fn values(&self) -> &[i32; 64] {
        &self.values
    }

    /// Quantize one coefficient block with the reciprocal fast path.
    pub fn quantize_block(&self, coeffs: &[i32; 64]) -> [i32; 64] {
        let mut out = [0i32; 64];
        for i in 0..64 {
            let q = self.values[i] as i64;
            let c = coeffs[i] as i64;
            let m = ((c.abs() + q / 2) * self.recip[i]) >> RECIP_SHIFT;
            out[i] = (if c >= 0 { m } else { -m }) as i32;
        }
        out
    }

    /// Undo quantization: a plain multiply.
    pub fn dequantize_block(&self, quantized: &[i32; 64]) -> [i32; 64] {
        let mut out = [0i32; 64];
        for i in 0..64 {
            out[i] = quantized[i] * self.values[i];
        }
        out
    }
}

/// Slow-path reference quantizer: rounded division, ties away from zero.
///
/// Agrees with the fast path to within one step everywhere and exactly when
/// the divider is a power of two; test suites use it to cross-check the
/// reciprocal recipe.
pub fn quantize_reference(coeff: i32, divider: i32) -> i32 {
    round_div(coeff as i64, divider as i64) as i32
}
