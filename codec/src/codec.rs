//! Codec orchestration
//!
//! Drives the three-plane compress and decompress passes and owns the
//! validation and rollback story: a call either returns a fully populated
//! bundle or image, or an error and nothing else. All per-call state lives
//! on the stack of these functions; two calls never share anything, so
//! callers may run them concurrently on disjoint inputs.

use std::time::Instant;

use log::debug;

use mcujpeg_rs_yuv::{planes_to_rgb, rgb_to_planes};

use crate::bitrate::zigzag_bpp;
use crate::error::{Error, Result};
use crate::pipeline::{compress_plane, decompress_plane};
use crate::quant::QuantTable;
use crate::tables::{Q50_CHROMA, Q50_LUMA, UNITY_TABLE};
use crate::types::{CodecOption, Colorspace, Image, Params, QuantizedBundle};

/// Timing and bitrate facts about one compress call, for the transport
/// headers the capture device sends alongside the body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressReport {
    /// Wall-clock duration of the compress call, in microseconds.
    pub elapsed_us: u64,

    /// Zigzag bitrate estimate over the produced bundle.
    pub bitrate_bpp: f64,
}

fn base_tables(options: CodecOption) -> (&'static [i32; 64], &'static [i32; 64]) {
    if options.contains(CodecOption::STANDARD_TABLES) {
        (&Q50_LUMA, &Q50_CHROMA)
    } else {
        (&UNITY_TABLE, &UNITY_TABLE)
    }
}

/// Compress an RGB image into a quantized coefficient bundle.
pub fn compress(image: &Image, params: &Params) -> Result<QuantizedBundle> {
    if image.data().is_empty() {
        return Err(Error::NullPointer);
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::InvalidDimensions);
    }
    if image.colorspace() != Colorspace::Rgb {
        return Err(Error::InvalidDimensions);
    }

    let (width, height) = (image.width(), image.height());
    let skip_quant = params.options.contains(CodecOption::SKIP_QUANTIZATION);
    let keep_raw = params.options.contains(CodecOption::KEEP_COEFFICIENTS);
    debug!(
        "compress {}x{} kernel={} k={} options={:?}",
        width, height, params.kernel, params.k, params.options
    );

    let (luma_base, chroma_base) = base_tables(params.options);
    let luma_qt = QuantTable::scaled_for_kernel(luma_base, params.k, params.kernel);
    let chroma_qt = QuantTable::scaled_for_kernel(chroma_base, params.k, params.kernel);

    let (y, cb, cr) = rgb_to_planes(image.data());

    let y_out = compress_plane(&y, width, height, &luma_qt, params.kernel, skip_quant, keep_raw)?;
    let cb_out = compress_plane(&cb, width, height, &chroma_qt, params.kernel, skip_quant, keep_raw)?;
    let cr_out = compress_plane(&cr, width, height, &chroma_qt, params.kernel, skip_quant, keep_raw)?;

    let mut bundle = QuantizedBundle::new(
        width,
        height,
        params.k,
        params.kernel,
        params.options,
        y_out.quantized,
        cb_out.quantized,
        cr_out.quantized,
    )?;
    if let (Some(ry), Some(rcb), Some(rcr)) = (y_out.raw, cb_out.raw, cr_out.raw) {
        bundle.attach_raw(ry, rcb, rcr);
    }
    Ok(bundle)
}

/// [`compress`], plus the timing and bitrate the device reports out of band.
pub fn compress_report(image: &Image, params: &Params) -> Result<(QuantizedBundle, CompressReport)> {
    let start = Instant::now();
    let bundle = compress(image, params)?;
    let elapsed_us = start.elapsed().as_micros() as u64;

    let report = CompressReport {
        elapsed_us,
        bitrate_bpp: zigzag_bpp(&bundle),
    };
    Ok((bundle, report))
}

/// Reverse a bundle back into an RGB image.
pub fn decompress(bundle: &QuantizedBundle) -> Result<Image> {
    if bundle.as_luma().is_empty() {
        return Err(Error::NullPointer);
    }
    let (width, height) = (bundle.width(), bundle.height());
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions);
    }

    let options = bundle.options();
    let skip_quant = options.contains(CodecOption::SKIP_QUANTIZATION);
    debug!(
        "decompress {}x{} kernel={} k={}",
        width,
        height,
        bundle.kernel(),
        bundle.quality()
    );

    let (luma_base, chroma_base) = base_tables(options);
    let k = bundle.quality();
    let luma_qt = QuantTable::scaled_for_kernel(luma_base, k, bundle.kernel());
    let chroma_qt = QuantTable::scaled_for_kernel(chroma_base, k, bundle.kernel());

    let y = decompress_plane(bundle.as_luma(), width, height, &luma_qt, bundle.kernel(), skip_quant)?;
    let cb = decompress_plane(bundle.as_chroma_b(), width, height, &chroma_qt, bundle.kernel(), skip_quant)?;
    let cr = decompress_plane(bundle.as_chroma_r(), width, height, &chroma_qt, bundle.kernel(), skip_quant)?;

    Image::from_rgb(width, height, planes_to_rgb(&y, &cb, &cr))
}
