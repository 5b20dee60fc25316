//! Per-plane compress and decompress passes
//!
//! One color plane moves through: extract -> forward 2D transform ->
//! quantize, and back through dequantize -> inverse 2D transform ->
//! reconstruct. The orchestrator in [`crate::codec`] runs this three times
//! per call with the right table for each plane.

use log::trace;

use crate::blocks::{extract, reconstruct, BLOCK_AREA};
use crate::error::{Error, Result};
use crate::kernel::{forward_2d, inverse_2d};
use crate::quant::QuantTable;
use crate::types::KernelKind;

/// Allocate an output buffer, surfacing allocation failure as an error
/// instead of an abort. Everything allocated before a failure is dropped on
/// the way out, so a failed call leaves nothing behind.
fn try_alloc<T>(len: usize) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| Error::AllocationFailed)?;
    Ok(buffer)
}

/// Output of one plane's forward pass.
pub(crate) struct CompressedPlane {
    /// Quantized coefficients, `num_blocks * 64`.
    pub quantized: Vec<i32>,

    /// Pre-quantization transform output, when requested.
    pub raw: Option<Vec<i32>>,
}

/// Forward pass over one level-shifted plane.
pub(crate) fn compress_plane(
    plane: &[i32],
    width: usize,
    height: usize,
    qt: &QuantTable,
    kernel: KernelKind,
    skip_quant: bool,
    keep_raw: bool,
) -> Result<CompressedPlane> {
    let blocks = extract(plane, width, height);
    trace!(
        "compress plane {}x{}: {} blocks, kernel {}",
        width,
        height,
        blocks.len(),
        kernel
    );

    let mut quantized = try_alloc::<i32>(blocks.len() * BLOCK_AREA)?;
    let mut raw = if keep_raw {
        Some(try_alloc::<i32>(blocks.len() * BLOCK_AREA)?)
    } else {
        None
    };

    for block in blocks.iter() {
        let coeffs = forward_2d(kernel, block);
        if let Some(raw) = raw.as_mut() {
            raw.extend_from_slice(&coeffs);
        }
        if skip_quant {
            quantized.extend_from_slice(&coeffs);
        } else {
            quantized.extend_from_slice(&qt.quantize_block(&coeffs));
        }
    }

    Ok(CompressedPlane { quantized, raw })
}

/// Inverse pass: rebuild one plane from its quantized coefficients.
pub(crate) fn decompress_plane(
    quantized: &[i32],
    width: usize,
    height: usize,
    qt: &QuantTable,
    kernel: KernelKind,
    skip_quant: bool,
) -> Result<Vec<i32>> {
    let mut blocks = try_alloc::<[i32; BLOCK_AREA]>(quantized.len() / BLOCK_AREA)?;
    for qblock in quantized.chunks_exact(BLOCK_AREA) {
        let mut coeffs = [0i32; BLOCK_AREA];
        coeffs.copy_from_slice(qblock);
        let restored = if skip_quant {
            coeffs
        } else {
            qt.dequantize_block(&coeffs)
        };
        blocks.push(inverse_2d(kernel, &restored));
    }

    Ok(reconstruct(&blocks, width, height))
}
