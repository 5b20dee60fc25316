//! Integer BT.601 color conversion

mod bt601;

pub use bt601::{planes_to_rgb, rgb_to_planes, rgb_to_ycbcr, ycbcr_to_rgb};
