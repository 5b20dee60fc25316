//! Codec error taxonomy
//!
//! Errors are fatal to the call that raised them: no partially filled image
//! or bundle is ever returned. Each kind carries a small negative status
//! code that is stable across the device and host builds, so a transport can
//! ship the code and the peer can recover the meaning.

use thiserror::Error;

/// Result alias used throughout the codec.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong inside a codec call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A required input buffer was absent or empty.
    #[error("required input buffer is missing or empty")]
    NullPointer,

    /// Image dimensions are non-positive, or disagree with the size of the
    /// buffer that supposedly holds them.
    #[error("image dimensions are invalid or do not match the buffer size")]
    InvalidDimensions,

    /// A heap allocation failed. Anything allocated before the failure has
    /// already been released when this is returned.
    #[error("heap allocation failed")]
    AllocationFailed,

    /// The transform kernel selector is not one of the known four.
    #[error("unknown transform kernel selector")]
    InvalidMethod,
}

impl Error {
    /// The stable status code for this error kind.
    pub fn code(self) -> i32 {
        match self {
            Error::NullPointer => -1,
            Error::InvalidDimensions => -2,
            Error::AllocationFailed => -3,
            Error::InvalidMethod => -4,
        }
    }

    /// Recover an error kind from a wire status code. Zero is success and
    /// therefore not an error; anything unknown yields `None`.
    pub fn from_code(code: i32) -> Option<Error> {
        match code {
            -1 => Some(Error::NullPointer),
            -2 => Some(Error::InvalidDimensions),
            -3 => Some(Error::AllocationFailed),
            -4 => Some(Error::InvalidMethod),
            _ => None,
        }
    }

    /// Constant message for a status code, including success.
    pub fn describe(code: i32) -> &'static str {
        match code {
            0 => "success",
            -1 => "required input buffer is missing or empty",
            -2 => "image dimensions are invalid or do not match the buffer size",
            -3 => "heap allocation failed",
            -4 => "unknown transform kernel selector",
            _ => "unknown status code",
        }
    }
}
