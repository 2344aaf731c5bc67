//! BMP encoder: uncompressed 24-bit and 32-bit BMP.
//!
//! Output is the 14-byte file header, the 40- or 124-byte info header, then
//! the pixel rows in B,G,R[,A] order with no row padding.

use alloc::vec::Vec;
use enough::Stop;

use super::header::{BmpHeaders, encode_headers};
use super::reorder::{reorder_rows, to_file_order_into};
use super::try_zeroed;
use crate::error::BmpError;
use crate::pixel::BitDepth;

/// Build headers and check that `pixels` covers the image.
///
/// Returns the headers and the number of pixel bytes to write.
fn prepare(
    pixels: &[u8],
    width: u32,
    height: u32,
    depth: BitDepth,
) -> Result<(BmpHeaders, usize), BmpError> {
    if width == 0 || height == 0 {
        return Err(BmpError::InvalidHeader(alloc::format!(
            "cannot encode an empty {width}x{height} image"
        )));
    }
    let headers = encode_headers(width, height, depth)?;
    let expected = headers.info.image_size as usize;
    if pixels.len() < expected {
        return Err(BmpError::BufferTooSmall {
            needed: expected,
            actual: pixels.len(),
        });
    }
    Ok((headers, expected))
}

/// Encode caller-order pixels to an in-memory BMP file.
pub(crate) fn encode_bmp(
    pixels: &[u8],
    width: u32,
    height: u32,
    depth: BitDepth,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BmpError> {
    let (headers, expected) = prepare(pixels, width, height, depth)?;
    stop.check()?;

    let header_bytes = headers.to_bytes();
    let mut out = try_zeroed(headers.file.file_size as usize)?;
    let (head, body) = out.split_at_mut(header_bytes.len());
    head.copy_from_slice(&header_bytes);
    reorder_rows(
        &pixels[..expected],
        body,
        width as usize,
        depth,
        stop,
        to_file_order_into,
    )?;
    Ok(out)
}

/// Headers plus pixels already converted to file order, ready to write.
#[cfg(feature = "std")]
pub(crate) struct PreparedBmp {
    headers: BmpHeaders,
    file_order: Vec<u8>,
}

/// Build headers and convert caller-order pixels into a temporary
/// file-order buffer.
#[cfg(feature = "std")]
pub(crate) fn prepare_file_order(
    pixels: &[u8],
    width: u32,
    height: u32,
    depth: BitDepth,
    stop: &dyn Stop,
) -> Result<PreparedBmp, BmpError> {
    let (headers, expected) = prepare(pixels, width, height, depth)?;
    stop.check()?;

    let mut file_order = try_zeroed(expected)?;
    reorder_rows(
        &pixels[..expected],
        &mut file_order,
        width as usize,
        depth,
        stop,
        to_file_order_into,
    )?;
    Ok(PreparedBmp {
        headers,
        file_order,
    })
}

#[cfg(feature = "std")]
impl PreparedBmp {
    /// Write file header, info header and pixel bytes in sequence.
    pub(crate) fn write_to<W: std::io::Write>(&self, writer: &mut W) -> Result<(), BmpError> {
        writer.write_all(&self.headers.file.to_bytes())?;
        writer.write_all(&self.headers.info.to_bytes())?;
        writer.write_all(&self.file_order)?;
        writer.flush()?;
        Ok(())
    }
}
