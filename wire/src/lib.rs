//! Device-to-host coefficient stream
//!
//! The capture device ships a compressed frame as a fixed-layout binary
//! body: `num_blocks * 64` little-endian int16 coefficients for Y, then the
//! same for Cb, then Cr (no subsampling). Everything else a receiver needs
//! travels out of band as string key/value header fields. int16 on the wire
//! is part of the contract; both sides widen to int32 before touching the
//! codec.

use std::convert::TryFrom;
use std::str::FromStr;

use thiserror::Error;

use mcujpeg_rs::{CodecOption, KernelKind, QuantizedBundle};

/// Bytes of one coefficient on the wire.
const COEFF_SIZE: usize = 2;

/// Everything that can go wrong assembling or parsing a frame.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WireError {
    /// A quantized coefficient does not fit in an int16.
    #[error("coefficient {0} does not fit the int16 wire format")]
    CoefficientRange(i32),

    /// The body length disagrees with the header's block count.
    #[error("body is {actual} bytes, header implies {expected}")]
    BodySize { expected: usize, actual: usize },

    /// A required header field is absent.
    #[error("missing header field {0}")]
    MissingField(&'static str),

    /// A header field failed to parse.
    #[error("malformed header field {0}")]
    MalformedField(&'static str),

    /// The reassembled bundle failed the codec's own validation.
    #[error("bundle validation failed: {0}")]
    Bundle(#[from] mcujpeg_rs::Error),
}

const X_WIDTH: &str = "x-width";
const X_HEIGHT: &str = "x-height";
const X_METHOD: &str = "x-method";
const X_QUALITY: &str = "x-quality";
const X_NUM_BLOCKS: &str = "x-num-blocks";
const X_COMPRESS_TIME_US: &str = "x-compress-time-us";
const X_BITRATE: &str = "x-bitrate";

/// The out-of-band companion of a coefficient body.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub method: KernelKind,
    pub quality: f32,
    pub num_blocks: u32,
    pub compress_time_us: u64,
    pub bitrate_bpp: f64,
}

impl Header {
    /// Describe a bundle the device is about to transmit.
    pub fn for_bundle(bundle: &QuantizedBundle, compress_time_us: u64, bitrate_bpp: f64) -> Header {
        Header {
            width: bundle.width() as u32,
            height: bundle.height() as u32,
            method: bundle.kernel(),
            quality: bundle.quality(),
            num_blocks: bundle.num_blocks() as u32,
            compress_time_us,
            bitrate_bpp,
        }
    }

    /// Expected body size in bytes: three planes of int16 blocks.
    pub fn body_len(&self) -> usize {
        3 * self.num_blocks as usize * 64 * COEFF_SIZE
    }

    /// Render the header as transport field pairs.
    pub fn to_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            (X_WIDTH, self.width.to_string()),
            (X_HEIGHT, self.height.to_string()),
            (X_METHOD, self.method.token().to_string()),
            (X_QUALITY, self.quality.to_string()),
            (X_NUM_BLOCKS, self.num_blocks.to_string()),
            (X_COMPRESS_TIME_US, self.compress_time_us.to_string()),
            (X_BITRATE, self.bitrate_bpp.to_string()),
        ]
    }

    /// Parse transport field pairs back into a header.
    ///
    /// Field names are matched case-insensitively, as HTTP header names are.
    /// `x-compress-time-us` and `x-bitrate` are informational and default to
    /// zero when absent; everything else is required.
    pub fn from_fields<'a, I>(fields: I) -> Result<Header, WireError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut width = None;
        let mut height = None;
        let mut method = None;
        let mut quality = None;
        let mut num_blocks = None;
        let mut compress_time_us = 0u64;
        let mut bitrate_bpp = 0f64;

        for (name, value) in fields {
            let name = name.to_ascii_lowercase();
            match name.as_str() {
                X_WIDTH => width = Some(parse::<u32>(X_WIDTH, value)?),
                X_HEIGHT => height = Some(parse::<u32>(X_HEIGHT, value)?),
                X_METHOD => {
                    method = Some(
                        KernelKind::from_str(value)
                            .map_err(|_| WireError::MalformedField(X_METHOD))?,
                    )
                }
                X_QUALITY => quality = Some(parse::<f32>(X_QUALITY, value)?),
                X_NUM_BLOCKS => num_blocks = Some(parse::<u32>(X_NUM_BLOCKS, value)?),
                X_COMPRESS_TIME_US => compress_time_us = parse::<u64>(X_COMPRESS_TIME_US, value)?,
                X_BITRATE => bitrate_bpp = parse::<f64>(X_BITRATE, value)?,
                _ => {} // transports add fields of their own; ignore them
            }
        }

        Ok(Header {
            width: width.ok_or(WireError::MissingField(X_WIDTH))?,
            height: height.ok_or(WireError::MissingField(X_HEIGHT))?,
            method: method.ok_or(WireError::MissingField(X_METHOD))?,
            quality: quality.ok_or(WireError::MissingField(X_QUALITY))?,
            num_blocks: num_blocks.ok_or(WireError::MissingField(X_NUM_BLOCKS))?,
            compress_time_us,
            bitrate_bpp,
        })
    }
}

fn parse<T: FromStr>(field: &'static str, value: &str) -> Result<T, WireError> {
    value
        .trim()
        .parse()
        .map_err(|_| WireError::MalformedField(field))
}

fn narrow_plane(plane: &[i32], out: &mut Vec<i16>) -> Result<(), WireError> {
    for &v in plane {
        out.push(i16::try_from(v).map_err(|_| WireError::CoefficientRange(v))?);
    }
    Ok(())
}

/// Serialize a bundle's three planes as the little-endian int16 body.
pub fn encode_body(bundle: &QuantizedBundle) -> Result<Vec<u8>, WireError> {
    let mut shorts = Vec::with_capacity(3 * bundle.as_luma().len());
    narrow_plane(bundle.as_luma(), &mut shorts)?;
    narrow_plane(bundle.as_chroma_b(), &mut shorts)?;
    narrow_plane(bundle.as_chroma_r(), &mut shorts)?;

    // An int16 slice viewed as bytes already is the wire layout on
    // little-endian targets; elsewhere serialize pairwise.
    if cfg!(target_endian = "little") {
        Ok(bytemuck::cast_slice::<i16, u8>(&shorts).to_vec())
    } else {
        let mut body = Vec::with_capacity(shorts.len() * COEFF_SIZE);
        for v in shorts {
            body.extend_from_slice(&v.to_le_bytes());
        }
        Ok(body)
    }
}

fn widen_plane(bytes: &[u8]) -> Vec<i32> {
    // The input is a transport buffer with no alignment guarantee, so the
    // byte pairs are decoded explicitly rather than cast.
    bytes
        .chunks_exact(COEFF_SIZE)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as i32)
        .collect()
}

/// Parse a body back into a bundle, widening the coefficients to int32.
///
/// The caller got the geometry from the header; the body must be exactly
/// three planes of `num_blocks * 64` int16 values. Captures always run with
/// the standard tables, which is the configuration the rebuilt bundle gets.
pub fn decode_body(header: &Header, body: &[u8]) -> Result<QuantizedBundle, WireError> {
    let expected = header.body_len();
    if body.len() != expected {
        return Err(WireError::BodySize {
            expected,
            actual: body.len(),
        });
    }

    let plane_bytes = expected / 3;
    let y = widen_plane(&body[..plane_bytes]);
    let cb = widen_plane(&body[plane_bytes..2 * plane_bytes]);
    let cr = widen_plane(&body[2 * plane_bytes..]);

    QuantizedBundle::new(
        header.width as usize,
        header.height as usize,
        header.quality,
        header.method,
        CodecOption::STANDARD_TABLES,
        y,
        cb,
        cr,
    )
    .map_err(WireError::from)
}
