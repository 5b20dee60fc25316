//! Pure-rust fixed-point 8x8 block transform codec
//!
//! A deterministic, integer-only JPEG-style transform codec built for
//! comparing three DCT kernels (the 11-multiplication Loeffler fast
//! transform, a direct matrix reference and the multiplierless Cintra-Bayer
//! approximation) at several quantization strengths. The same arithmetic
//! runs on a microcontroller capture device and on the receiving host, and
//! the two must agree bit for bit, so every rounding step in here is part of
//! the contract.
//!
//! Entropy coding is out of scope: the "compressed" representation is the
//! raw quantized coefficient planes held by [`QuantizedBundle`].

#[macro_use]
extern crate bitflags;

mod bitrate;
mod blocks;
mod codec;
mod error;
mod fixed;
mod kernel;
mod pipeline;
mod quant;
mod tables;
mod types;

pub use crate::bitrate::{plane_stats, zigzag_bpp, BitrateStats};
pub use crate::blocks::{block_count, extract, reconstruct, BLOCK_AREA, BLOCK_SIZE};
pub use crate::codec::{compress, compress_report, decompress, CompressReport};
pub use crate::error::{Error, Result};
pub use crate::kernel::{forward_2d, inverse_2d};
pub use crate::quant::{quantize_reference, QuantTable};
pub use crate::tables::{Q50_CHROMA, Q50_LUMA, UNITY_TABLE, ZIGZAG};
pub use crate::types::{
    CodecOption, Colorspace, Image, KernelKind, Params, QuantizedBundle,
};
