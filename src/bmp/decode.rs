//! BMP decoder for uncompressed 24-bit and 32-bit images.
//!
//! Pixel rows are taken exactly as stored: no row padding is skipped and
//! rows are not flipped, so files written by [`super::encode`] round-trip
//! byte for byte.

use alloc::vec::Vec;

use enough::Stop;

use super::header::{BmpHeaders, COMPRESSION_BITFIELDS, COMPRESSION_RGB, parse_headers};
use super::reorder::{reorder_rows, to_caller_order_into};
use super::try_zeroed;
use crate::decode::DecodeOutput;
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::BitDepth;

// ── Permissiveness ──────────────────────────────────────────────────

/// Controls how strictly the BMP decoder validates input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permissiveness {
    /// Everything `Standard` checks, plus: planes == 1, compression is
    /// `BI_RGB` (or `BI_BITFIELDS` at 32 bits), no palette, and the file
    /// size field matches the input length when that length is known.
    Strict,

    /// Default behavior. Rejects an info header size that does not match
    /// the bit depth (40 for 24-bit, 124 for 32-bit), a data offset inside
    /// the headers, and pixel data shorter than the header declares.
    #[default]
    Standard,

    /// Accept as much as possible. The info header size only locates the
    /// end of the headers, and a short pixel read is accepted as long as at
    /// least one byte is available: whole pixels that were read are
    /// converted and the rest of the output stays zero.
    Permissive,
}

// ── Validated header ────────────────────────────────────────────────

/// Headers plus the geometry derived from them.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ImageHeader {
    pub headers: BmpHeaders,
    pub width: u32,
    pub height: u32,
    pub depth: BitDepth,
    /// `width * height * bytes_per_pixel`.
    pub pixel_bytes: usize,
}

/// Check parsed headers against `permissiveness`.
///
/// `input_len` is the total input size when known; only `Strict` uses it.
pub(crate) fn validate(
    headers: BmpHeaders,
    permissiveness: Permissiveness,
    input_len: Option<u64>,
) -> Result<ImageHeader, BmpError> {
    let info = &headers.info;
    let depth = BitDepth::try_from(info.bits_per_pixel)?;

    if info.width <= 0 || info.height == 0 {
        return Err(BmpError::InvalidHeader(alloc::format!(
            "invalid dimensions {}x{}",
            info.width,
            info.height
        )));
    }
    let width = info.width.unsigned_abs();
    // Negative height marks a top-down file; rows are read as stored either way.
    let height = info.height.unsigned_abs();

    log::trace!("Width: {width}");
    log::trace!("Height: {height}");
    log::trace!("Bit depth: {}", depth.bits());
    log::trace!("Info header size: {}", info.size);

    if info.size != depth.info_header_size() {
        if permissiveness == Permissiveness::Permissive {
            log::warn!(
                "info header size {} does not match {}-bit images, expected {}",
                info.size,
                depth.bits(),
                depth.info_header_size()
            );
        } else {
            return Err(BmpError::InvalidHeader(alloc::format!(
                "info header size {} does not match {}-bit images (expected {})",
                info.size,
                depth.bits(),
                depth.info_header_size()
            )));
        }
    }

    if permissiveness != Permissiveness::Permissive
        && u64::from(headers.file.data_offset) < headers.headers_end()
    {
        return Err(BmpError::InvalidHeader(alloc::format!(
            "data offset {} points inside the headers (end at {})",
            headers.file.data_offset,
            headers.headers_end()
        )));
    }

    if permissiveness == Permissiveness::Strict {
        check_strict(&headers, depth, input_len)?;
    }

    let pixel_bytes = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(depth.bytes_per_pixel()))
        .ok_or(BmpError::DimensionsTooLarge { width, height })?;

    Ok(ImageHeader {
        headers,
        width,
        height,
        depth,
        pixel_bytes,
    })
}

fn check_strict(
    headers: &BmpHeaders,
    depth: BitDepth,
    input_len: Option<u64>,
) -> Result<(), BmpError> {
    let info = &headers.info;
    if info.planes != 1 {
        return Err(BmpError::InvalidHeader(alloc::format!(
            "planes must be 1, got {}",
            info.planes
        )));
    }
    let compression_ok = match depth {
        BitDepth::Rgb24 => info.compression == COMPRESSION_RGB,
        BitDepth::Rgba32 => {
            info.compression == COMPRESSION_RGB || info.compression == COMPRESSION_BITFIELDS
        }
    };
    if !compression_ok {
        return Err(BmpError::InvalidHeader(alloc::format!(
            "compression {} not valid for {}-bit images",
            info.compression,
            depth.bits()
        )));
    }
    if info.colors_used != 0 {
        return Err(BmpError::InvalidHeader(alloc::format!(
            "unexpected palette of {} colors",
            info.colors_used
        )));
    }
    if let Some(len) = input_len {
        let declared = headers.file.file_size;
        if declared != 0 && u64::from(declared) != len {
            return Err(BmpError::InvalidHeader(alloc::format!(
                "file size field {declared} does not match input length {len}"
            )));
        }
    }
    Ok(())
}

fn check_limits(limits: Option<&Limits>, image: &ImageHeader) -> Result<(), BmpError> {
    if let Some(limits) = limits {
        limits.check_image(image.width, image.height, image.pixel_bytes)?;
    }
    Ok(())
}

// ── Pixel conversion ────────────────────────────────────────────────

/// Convert the file-order bytes that were available into a caller-order buffer.
///
/// `file_order` holds at most `image.pixel_bytes` bytes.
fn finish(
    file_order: &[u8],
    image: &ImageHeader,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<Vec<u8>, BmpError> {
    let expected = image.pixel_bytes;
    let actual = file_order.len();
    if actual == 0 || (actual < expected && permissiveness != Permissiveness::Permissive) {
        return Err(BmpError::ShortRead { expected, actual });
    }
    if actual < expected {
        log::warn!("pixel data truncated: expected {expected} bytes, got {actual}");
    }

    let mut out = try_zeroed(expected)?;
    stop.check()?;
    reorder_rows(
        file_order,
        &mut out[..actual],
        image.width as usize,
        image.depth,
        stop,
        to_caller_order_into,
    )?;
    Ok(out)
}

// ── Entry points ────────────────────────────────────────────────────

/// Decode a complete BMP held in memory.
pub(crate) fn decode_bytes(
    data: &[u8],
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<DecodeOutput, BmpError> {
    let headers = parse_headers(data)?;
    let image = validate(headers, permissiveness, Some(data.len() as u64))?;
    check_limits(limits, &image)?;
    stop.check()?;

    let offset = image.headers.file.data_offset as usize;
    let available = data.get(offset..).unwrap_or(&[]);
    let pixel_data = &available[..available.len().min(image.pixel_bytes)];
    let pixels = finish(pixel_data, &image, permissiveness, stop)?;
    Ok(DecodeOutput::new(pixels, image.width, image.height, image.depth))
}

/// Decode a BMP from a seekable stream.
///
/// The signature is checked before anything is allocated. Pixel bytes are
/// read into a scratch buffer at the header-declared data offset, which is
/// released once converted.
#[cfg(feature = "std")]
pub(crate) fn read_image<R: std::io::Read + std::io::Seek>(
    reader: &mut R,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
    stop: &dyn Stop,
) -> Result<DecodeOutput, BmpError> {
    use super::header::{
        EXTENDED_INFO_HEADER_SIZE, FILE_HEADER_SIZE, INFO_HEADER_SIZE, MAX_HEADERS_SIZE, SIGNATURE,
    };
    use std::io::SeekFrom;

    let start = reader.stream_position()?;
    let mut head = [0u8; MAX_HEADERS_SIZE];
    read_header_bytes(reader, &mut head[..2])?;
    if head[..2] != SIGNATURE {
        return Err(BmpError::UnrecognizedFormat);
    }
    let fixed = FILE_HEADER_SIZE as usize + 4;
    read_header_bytes(reader, &mut head[2..fixed])?;

    let info_size = u32::from_le_bytes([head[14], head[15], head[16], head[17]]);
    let info_len = info_size.clamp(INFO_HEADER_SIZE, EXTENDED_INFO_HEADER_SIZE) as usize;
    let header_len = FILE_HEADER_SIZE as usize + info_len;
    read_header_bytes(reader, &mut head[fixed..header_len])?;

    let headers = parse_headers(&head[..header_len])?;
    let end = reader.seek(SeekFrom::End(0))?;
    let input_len = (permissiveness == Permissiveness::Strict).then(|| end - start);
    let image = validate(headers, permissiveness, input_len)?;
    check_limits(limits, &image)?;
    stop.check()?;

    // The scratch buffer never outgrows what the stream still holds.
    let data_start = start + u64::from(image.headers.file.data_offset);
    let available = usize::try_from(end.saturating_sub(data_start))
        .unwrap_or(usize::MAX)
        .min(image.pixel_bytes);
    if available < image.pixel_bytes && permissiveness != Permissiveness::Permissive {
        return Err(BmpError::ShortRead {
            expected: image.pixel_bytes,
            actual: available,
        });
    }

    reader.seek(SeekFrom::Start(data_start))?;
    let mut scratch = try_zeroed(available)?;
    let filled = read_up_to(reader, &mut scratch)?;
    let pixels = finish(&scratch[..filled], &image, permissiveness, stop)?;
    Ok(DecodeOutput::new(pixels, image.width, image.height, image.depth))
}

#[cfg(feature = "std")]
fn read_header_bytes<R: std::io::Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), BmpError> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        std::io::ErrorKind::UnexpectedEof => BmpError::UnexpectedEof,
        _ => BmpError::Io(e),
    })
}

/// Fill `buf` from `reader` until it is full or the stream ends.
#[cfg(feature = "std")]
fn read_up_to<R: std::io::Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
