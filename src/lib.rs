//! # zenbmp
//!
//! Uncompressed BMP codec for 24-bit and 32-bit images: load a file into a
//! pixel buffer, save a pixel buffer to a file, and synthesize solid-color
//! buffers.
//!
//! ## Pixel Buffers
//!
//! Buffers crossing the public API are in *caller order*: R,G,B for 24-bit
//! and R,G,B,A for 32-bit, row-major, no row padding. On disk the same bytes
//! are stored B,G,R[,A]; the codec converts in both directions.
//!
//! ## File Layout
//!
//! - 14-byte file header (`BM`, file size, data offset)
//! - 40-byte info header for 24-bit, 124-byte info header for 32-bit
//!   (R/G/B/A channel masks and an sRGB color space tag)
//! - pixel data immediately after the headers
//!
//! ## Limitations
//!
//! - Rows are neither padded to 4 bytes nor flipped. Files written here
//!   round-trip exactly, but BMPs from other encoders whose row size is not
//!   a multiple of 4 bytes will not decode correctly, and bottom-up files
//!   come out with their rows in stored order.
//! - No compressed, paletted, or 1/4/8/16-bit images; no multi-image files.
//!
//! ## Usage
//!
//! ```no_run
//! use zenbmp::Color;
//!
//! let pixels = zenbmp::generate(2, 2, 32, Color::rgba(255, 0, 0, 255))?;
//! zenbmp::save("red.bmp", &pixels, 2, 2, 32)?;
//!
//! let image = zenbmp::load("red.bmp")?;
//! assert_eq!((image.width, image.height), (2, 2));
//! assert_eq!(image.pixels(), &pixels[..]);
//! # Ok::<(), zenbmp::BmpError>(())
//! ```
//!
//! ## Logging
//!
//! Failures to open, load, or save a file are reported through the [`log`]
//! facade at `error` level before being returned. Permissive decoding logs
//! accepted deviations at `warn`; parsed geometry is logged at `trace`.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod bmp;
mod error;
mod generate;
mod info;
mod limits;
mod pixel;

mod decode;
mod encode;

use alloc::vec::Vec;

// Re-exports
pub use bmp::Permissiveness;
pub use bmp::header::{
    BmpHeaders, COLOR_SPACE_SRGB, COMPRESSION_BITFIELDS, COMPRESSION_RGB, ChannelMasks,
    DEFAULT_PIXELS_PER_METER, EXTENDED_INFO_HEADER_SIZE, ExtendedInfo, FILE_HEADER_SIZE,
    FileHeader, INFO_HEADER_SIZE, InfoHeader, encode_headers, parse_headers,
};
pub use bmp::reorder::{to_caller_order, to_caller_order_into, to_file_order, to_file_order_into};
pub use decode::{DecodeOutput, DecodeRequest};
pub use encode::EncodeRequest;
pub use enough::{Stop, Unstoppable};
pub use error::BmpError;
pub use generate::{Color, generate_pixels};
pub use info::ImageInfo;
pub use limits::Limits;
#[cfg(feature = "rgb")]
pub use pixel::DecodePixel;
pub use pixel::{BitDepth, PixelLayout};

/// Decode a BMP held in memory with default settings.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, BmpError> {
    DecodeRequest::new().decode(data, stop)
}

/// Encode caller-order pixels to an in-memory BMP.
///
/// `bit_depth` must be 24 or 32.
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    bit_depth: u16,
    stop: impl Stop,
) -> Result<Vec<u8>, BmpError> {
    EncodeRequest::new(BitDepth::try_from(bit_depth)?).encode(pixels, width, height, stop)
}

/// Synthesize a caller-order buffer filled with `color`.
///
/// `bit_depth` must be 24 or 32; alpha is only written at 32 bits.
pub fn generate(width: u32, height: u32, bit_depth: u16, color: Color) -> Result<Vec<u8>, BmpError> {
    generate_pixels(width, height, BitDepth::try_from(bit_depth)?, color)
}

/// Load the BMP file at `path` with default settings.
///
/// The bit depth of the result is in [`DecodeOutput::bit_depth`].
#[cfg(feature = "std")]
pub fn load(path: impl AsRef<std::path::Path>) -> Result<DecodeOutput, BmpError> {
    DecodeRequest::new().load(path, Unstoppable)
}

/// Save caller-order pixels as a BMP file at `path`, truncating existing content.
///
/// `bit_depth` must be 24 or 32.
#[cfg(feature = "std")]
pub fn save(
    path: impl AsRef<std::path::Path>,
    pixels: &[u8],
    width: u32,
    height: u32,
    bit_depth: u16,
) -> Result<(), BmpError> {
    EncodeRequest::new(BitDepth::try_from(bit_depth)?).save(path, pixels, width, height, Unstoppable)
}
