use alloc::vec::Vec;

use enough::Stop;

use crate::bmp;
use crate::error::BmpError;
use crate::pixel::BitDepth;

/// Encode configuration.
///
/// Input pixels are caller order (R,G,B for 24-bit, R,G,B,A for 32-bit),
/// row-major, no row padding. Extra trailing bytes are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeRequest {
    bit_depth: BitDepth,
}

impl EncodeRequest {
    pub fn new(bit_depth: BitDepth) -> Self {
        Self { bit_depth }
    }

    /// 24-bit BMP with a 40-byte info header.
    pub fn rgb24() -> Self {
        Self::new(BitDepth::Rgb24)
    }

    /// 32-bit BMP with a 124-byte info header carrying channel masks.
    pub fn rgba32() -> Self {
        Self::new(BitDepth::Rgba32)
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Encode to an in-memory BMP file.
    pub fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<Vec<u8>, BmpError> {
        bmp::encode(pixels, width, height, self.bit_depth, &stop)
    }

    /// Encode and write to `writer`.
    #[cfg(feature = "std")]
    pub fn write_to<W: std::io::Write>(
        &self,
        writer: &mut W,
        pixels: &[u8],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<(), BmpError> {
        bmp::write(writer, pixels, width, height, self.bit_depth, &stop)
    }

    /// Encode and write to the file at `path`, truncating existing content.
    #[cfg(feature = "std")]
    pub fn save(
        &self,
        path: impl AsRef<std::path::Path>,
        pixels: &[u8],
        width: u32,
        height: u32,
        stop: impl Stop,
    ) -> Result<(), BmpError> {
        bmp::save(path.as_ref(), pixels, width, height, self.bit_depth, &stop)
    }
}
