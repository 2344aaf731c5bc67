//! BMP container codec (internal).
//!
//! Use top-level [`crate::load`], [`crate::save`], [`crate::decode`],
//! [`crate::encode`], or the request builders.

pub(crate) mod decode;
mod encode;
pub(crate) mod header;
pub(crate) mod reorder;

use alloc::vec::Vec;
use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::BitDepth;

pub use decode::Permissiveness;

/// Allocate a zeroed buffer, reporting failure instead of aborting.
pub(crate) fn try_zeroed(len: usize) -> Result<Vec<u8>, BmpError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| BmpError::Allocation { bytes: len })?;
    buf.resize(len, 0);
    Ok(buf)
}

/// Decode BMP data held in memory (output in RGB/RGBA byte order).
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<DecodeOutput, BmpError> {
    decode::decode_bytes(data, limits, permissiveness, stop)
}

/// Encode to an in-memory BMP.
pub(crate) fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    depth: BitDepth,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BmpError> {
    encode::encode_bmp(pixels, width, height, depth, stop)
}

/// Decode a BMP from a seekable stream.
#[cfg(feature = "std")]
pub(crate) fn read<R: std::io::Read + std::io::Seek>(
    reader: &mut R,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<DecodeOutput, BmpError> {
    decode::read_image(reader, limits, permissiveness, stop)
}

/// Encode and write a BMP to `writer`.
#[cfg(feature = "std")]
pub(crate) fn write<W: std::io::Write>(
    writer: &mut W,
    pixels: &[u8],
    width: u32,
    height: u32,
    depth: BitDepth,
    stop: &dyn Stop,
) -> Result<(), BmpError> {
    encode::prepare_file_order(pixels, width, height, depth, stop)?.write_to(writer)
}

/// Open `path` and decode it.
#[cfg(feature = "std")]
pub(crate) fn load(
    path: &std::path::Path,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<DecodeOutput, BmpError> {
    let file = std::fs::File::open(path).map_err(|e| {
        log::error!("cannot open {} for reading: {e}", path.display());
        BmpError::Io(e)
    })?;
    let mut reader = std::io::BufReader::new(file);
    read(&mut reader, limits, permissiveness, stop).inspect_err(|e| {
        log::error!("failed to load {}: {e}", path.display());
    })
}

/// Create (or truncate) `path` and write a BMP to it.
#[cfg(feature = "std")]
pub(crate) fn save(
    path: &std::path::Path,
    pixels: &[u8],
    width: u32,
    height: u32,
    depth: BitDepth,
    stop: &dyn Stop,
) -> Result<(), BmpError> {
    let prepared = encode::prepare_file_order(pixels, width, height, depth, stop)?;
    let file = std::fs::File::create(path).map_err(|e| {
        log::error!("cannot open {} for writing: {e}", path.display());
        BmpError::Io(e)
    })?;
    let mut writer = std::io::BufWriter::new(file);
    prepared.write_to(&mut writer).inspect_err(|e| {
        log::error!("failed to save {}: {e}", path.display());
    })
}
