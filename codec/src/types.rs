//! Codec data model

use std::fmt;
use std::str::FromStr;

use crate::blocks::block_count;
use crate::error::{Error, Result};

bitflags! {
    /// Per-call codec switches.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct CodecOption : u8 {
        /// Quantize with the Annex K Q50 tables. When clear, an all-ones
        /// table is used instead (every coefficient survives verbatim).
        const STANDARD_TABLES = 0b1;

        /// Replace the quantize and dequantize steps with pass-throughs.
        /// A debug facility: the bundle then carries raw DCT coefficients.
        const SKIP_QUANTIZATION = 0b10;

        /// Additionally store the pre-quantization DCT coefficients in the
        /// bundle, for inspection on the host.
        const KEEP_COEFFICIENTS = 0b100;
    }
}

/// Which 1D transform pair drives the 2D passes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KernelKind {
    /// 11-multiplication fast DCT (Loeffler/Ligtenberg/Moschytz).
    Loeffler,

    /// Direct 64-multiply matrix DCT; the reference the others are checked
    /// against.
    Matrix,

    /// Multiplierless Cintra-Bayer approximation.
    Approximate,

    /// Pass-through, for debugging the color and quantization paths.
    Identity,
}

impl KernelKind {
    /// The lowercase token used on the wire and in the capture URLs.
    pub fn token(self) -> &'static str {
        match self {
            KernelKind::Loeffler => "loeffler",
            KernelKind::Matrix => "matrix",
            KernelKind::Approximate => "approx",
            KernelKind::Identity => "identity",
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for KernelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "loeffler" => Ok(KernelKind::Loeffler),
            "matrix" => Ok(KernelKind::Matrix),
            // the boundary API spells it out; the wire abbreviates
            "approx" | "approximate" => Ok(KernelKind::Approximate),
            "identity" => Ok(KernelKind::Identity),
            _ => Err(Error::InvalidMethod),
        }
    }
}

/// Knobs for one compress call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Params {
    /// Quality factor multiplying the base quantization table, quantized to
    /// 1/1024 internally. Small `k` preserves quality.
    pub k: f32,

    /// The transform kernel to run.
    pub kernel: KernelKind,

    /// Table selection and debug switches.
    pub options: CodecOption,
}

impl Params {
    /// Parameters for a given kernel at quality `k`, with standard tables.
    pub fn new(kernel: KernelKind, k: f32) -> Params {
        Params {
            k,
            kernel,
            options: CodecOption::STANDARD_TABLES,
        }
    }
}

impl Default for Params {
    fn default() -> Params {
        Params::new(KernelKind::Loeffler, 1.0)
    }
}

/// How the pixel buffer of an [`Image`] is laid out.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Colorspace {
    /// Interleaved RGB888, row-major, `3 * width * height` bytes.
    Rgb,

    /// One byte per pixel, `width * height` bytes.
    Grayscale,
}

/// An owned raster image, the source and sink of codec calls.
///
/// The codec never mutates an image it was handed; decompression allocates a
/// fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: usize,
    height: usize,
    colorspace: Colorspace,
    data: Vec<u8>,
}

impl Image {
    /// Wrap an interleaved RGB888 buffer.
    ///
    /// Fails with `NullPointer` for an empty buffer and `InvalidDimensions`
    /// when the dimensions are zero or disagree with the buffer length.
    pub fn from_rgb(width: usize, height: usize, data: Vec<u8>) -> Result<Image> {
        Image::validated(width, height, Colorspace::Rgb, data)
    }

    /// Wrap a single-plane grayscale buffer.
    pub fn from_grayscale(width: usize, height: usize, data: Vec<u8>) -> Result<Image> {
        Image::validated(width, height, Colorspace::Grayscale, data)
    }

    fn validated(
        width: usize,
        height: usize,
        colorspace: Colorspace,
        data: Vec<u8>,
    ) -> Result<Image> {
        if data.is_empty() {
            return Err(Error::NullPointer);
        }
        let expected = match colorspace {
            Colorspace::Rgb => width.checked_mul(height).and_then(|p| p.checked_mul(3)),
            Colorspace::Grayscale => width.checked_mul(height),
        };
        if width == 0 || height == 0 || expected != Some(data.len()) {
            return Err(Error::InvalidDimensions);
        }
        Ok(Image {
            width,
            height,
            colorspace,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn colorspace(&self) -> Colorspace {
        self.colorspace
    }

    /// Borrow the raw pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the image and take its pixel buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// The output of compression: three quantized coefficient planes plus the
/// header fields a receiver needs to reverse them.
///
/// Chroma is not subsampled (4:4:4), so all three planes hold
/// `num_blocks * 64` coefficients. The bundle owns every buffer in it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedBundle {
    width: usize,
    height: usize,
    k: f32,
    kernel: KernelKind,
    options: CodecOption,
    luma: Vec<i32>,
    chroma_b: Vec<i32>,
    chroma_r: Vec<i32>,
    raw_luma: Option<Vec<i32>>,
    raw_chroma_b: Option<Vec<i32>>,
    raw_chroma_r: Option<Vec<i32>>,
}

impl QuantizedBundle {
    /// Assemble a bundle, checking the plane sizes against the dimensions.
    pub fn new(
        width: usize,
        height: usize,
        k: f32,
        kernel: KernelKind,
        options: CodecOption,
        luma: Vec<i32>,
        chroma_b: Vec<i32>,
        chroma_r: Vec<i32>,
    ) -> Result<QuantizedBundle> {
        if luma.is_empty() {
            return Err(Error::NullPointer);
        }
        let expected = block_count(width, height) * crate::blocks::BLOCK_AREA;
        if width == 0
            || height == 0
            || luma.len() != expected
            || chroma_b.len() != expected
            || chroma_r.len() != expected
        {
            return Err(Error::InvalidDimensions);
        }
        Ok(QuantizedBundle {
            width,
            height,
            k,
            kernel,
            options,
            luma,
            chroma_b,
            chroma_r,
            raw_luma: None,
            raw_chroma_b: None,
            raw_chroma_r: None,
        })
    }

    pub(crate) fn attach_raw(
        &mut self,
        luma: Vec<i32>,
        chroma_b: Vec<i32>,
        chroma_r: Vec<i32>,
    ) {
        self.raw_luma = Some(luma);
        self.raw_chroma_b = Some(chroma_b);
        self.raw_chroma_r = Some(chroma_r);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The quality factor the planes were quantized with.
    pub fn quality(&self) -> f32 {
        self.k
    }

    pub fn kernel(&self) -> KernelKind {
        self.kernel
    }

    pub fn options(&self) -> CodecOption {
        self.options
    }

    /// Blocks per plane, `ceil(width / 8) * ceil(height / 8)`.
    pub fn num_blocks(&self) -> usize {
        block_count(self.width, self.height)
    }

    /// Quantized luma coefficients, `num_blocks * 64` values.
    pub fn as_luma(&self) -> &[i32] {
        &self.luma
    }

    pub fn as_chroma_b(&self) -> &[i32] {
        &self.chroma_b
    }

    pub fn as_chroma_r(&self) -> &[i32] {
        &self.chroma_r
    }

    /// Pre-quantization luma coefficients, if the compress call kept them.
    pub fn raw_luma(&self) -> Option<&[i32]> {
        self.raw_luma.as_deref()
    }

    pub fn raw_chroma_b(&self) -> Option<&[i32]> {
        self.raw_chroma_b.as_deref()
    }

    pub fn raw_chroma_r(&self) -> Option<&[i32]> {
        self.raw_chroma_r.as_deref()
    }
}
