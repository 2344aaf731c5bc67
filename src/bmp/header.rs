//! BMP file header and info header codec.
//!
//! Every field is decoded and encoded explicitly as little-endian at its
//! fixed offset; nothing relies on native struct layout.
//!
//! ```text
//! offset size field
//!      0    2 signature "BM"
//!      2    4 file size
//!      6    4 reserved (2 x u16)
//!     10    4 data offset
//!     14    4 info header size (40 or 124)
//!     18    4 width (signed)
//!     22    4 height (signed)
//!     26    2 planes
//!     28    2 bits per pixel
//!     30    4 compression
//!     34    4 raw data size
//!     38    4 horizontal resolution (pixels per meter)
//!     42    4 vertical resolution (pixels per meter)
//!     46    4 palette colors
//!     50    4 important colors
//!     54   16 R, G, B, A channel masks      (124-byte variant only)
//!     70    4 color space tag               (124-byte variant only)
//!     74   64 endpoints, gamma, intent, ... (124-byte variant only, zero)
//! ```

use alloc::vec::Vec;

use crate::error::BmpError;
use crate::pixel::BitDepth;

/// Size of the leading file header.
pub const FILE_HEADER_SIZE: u32 = 14;
/// Size of the standard `BITMAPINFOHEADER`.
pub const INFO_HEADER_SIZE: u32 = 40;
/// Size of the extended `BITMAPV5HEADER` carrying channel masks and a color space.
pub const EXTENDED_INFO_HEADER_SIZE: u32 = 124;

/// Resolution written for 32-bit images (72 DPI).
pub const DEFAULT_PIXELS_PER_METER: i32 = 2835;
/// `LCS_sRGB`, stored on disk as the bytes `B G R s`.
pub const COLOR_SPACE_SRGB: u32 = 0x7352_4742;

pub const COMPRESSION_RGB: u32 = 0;
pub const COMPRESSION_BITFIELDS: u32 = 3;

/// Largest header block this codec reads or writes.
#[cfg(feature = "std")]
pub(crate) const MAX_HEADERS_SIZE: usize =
    (FILE_HEADER_SIZE + EXTENDED_INFO_HEADER_SIZE) as usize;

pub(crate) const SIGNATURE: [u8; 2] = *b"BM";

// ── Little-endian cursor ────────────────────────────────────────────

struct LeReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> LeReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn bytes<const N: usize>(&mut self) -> Result<[u8; N], BmpError> {
        let end = self.pos.checked_add(N).ok_or(BmpError::UnexpectedEof)?;
        let slice = self.data.get(self.pos..end).ok_or(BmpError::UnexpectedEof)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(slice);
        self.pos = end;
        Ok(buf)
    }

    fn u16(&mut self) -> Result<u16, BmpError> {
        self.bytes().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> Result<u32, BmpError> {
        self.bytes().map(u32::from_le_bytes)
    }

    fn i32(&mut self) -> Result<i32, BmpError> {
        self.bytes().map(i32::from_le_bytes)
    }
}

// ── File header ─────────────────────────────────────────────────────

/// The 14-byte block that identifies the format and locates the pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    /// Total file size in bytes.
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Byte offset of the pixel data from the start of the file.
    pub data_offset: u32,
}

impl FileHeader {
    /// Decode a file header from the start of `data`.
    ///
    /// Fails with [`BmpError::UnrecognizedFormat`] unless `data` starts with `BM`.
    pub fn parse(data: &[u8]) -> Result<Self, BmpError> {
        let mut r = LeReader::new(data);
        if r.bytes::<2>()? != SIGNATURE {
            return Err(BmpError::UnrecognizedFormat);
        }
        Ok(Self {
            file_size: r.u32()?,
            reserved1: r.u16()?,
            reserved2: r.u16()?,
            data_offset: r.u32()?,
        })
    }

    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE as usize] {
        let mut out = [0u8; FILE_HEADER_SIZE as usize];
        out[0..2].copy_from_slice(&SIGNATURE);
        out[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        out[6..8].copy_from_slice(&self.reserved1.to_le_bytes());
        out[8..10].copy_from_slice(&self.reserved2.to_le_bytes());
        out[10..14].copy_from_slice(&self.data_offset.to_le_bytes());
        out
    }
}

// ── Info header ─────────────────────────────────────────────────────

/// Per-channel bit masks of a 32-bit pixel read as a little-endian `u32`.
///
/// Declared R, G, B, A even though the pixel bytes are stored B, G, R, A.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelMasks {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub alpha: u32,
}

impl ChannelMasks {
    /// Masks for B,G,R,A byte order.
    pub const BGRA8: Self = Self {
        red: 0x00FF_0000,
        green: 0x0000_FF00,
        blue: 0x0000_00FF,
        alpha: 0xFF00_0000,
    };
}

/// Fields only present in the 124-byte info header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExtendedInfo {
    pub masks: ChannelMasks,
    /// Color space tag, e.g. [`COLOR_SPACE_SRGB`].
    pub color_space: u32,
}

/// Image geometry and pixel encoding.
///
/// Values are passed through as read; range checks happen in the decoder
/// according to its permissiveness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InfoHeader {
    /// Declared size of this header (40 or 124).
    pub size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    /// Raw pixel data size in bytes.
    pub image_size: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
    /// Present when `size` is at least 124.
    pub extended: Option<ExtendedInfo>,
}

impl InfoHeader {
    /// Decode an info header from `data`, which starts right after the file header.
    pub fn parse(data: &[u8]) -> Result<Self, BmpError> {
        let mut r = LeReader::new(data);
        let size = r.u32()?;
        let mut info = Self {
            size,
            width: r.i32()?,
            height: r.i32()?,
            planes: r.u16()?,
            bits_per_pixel: r.u16()?,
            compression: r.u32()?,
            image_size: r.u32()?,
            x_pixels_per_meter: r.i32()?,
            y_pixels_per_meter: r.i32()?,
            colors_used: r.u32()?,
            colors_important: r.u32()?,
            extended: None,
        };
        if size >= EXTENDED_INFO_HEADER_SIZE {
            let masks = ChannelMasks {
                red: r.u32()?,
                green: r.u32()?,
                blue: r.u32()?,
                alpha: r.u32()?,
            };
            info.extended = Some(ExtendedInfo {
                masks,
                color_space: r.u32()?,
            });
        }
        Ok(info)
    }

    /// Number of bytes [`Self::to_bytes`] produces: 124 with extended fields, else 40.
    pub fn encoded_len(&self) -> usize {
        if self.extended.is_some() {
            EXTENDED_INFO_HEADER_SIZE as usize
        } else {
            INFO_HEADER_SIZE as usize
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        let start = out.len();
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.planes.to_le_bytes());
        out.extend_from_slice(&self.bits_per_pixel.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&self.image_size.to_le_bytes());
        out.extend_from_slice(&self.x_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.y_pixels_per_meter.to_le_bytes());
        out.extend_from_slice(&self.colors_used.to_le_bytes());
        out.extend_from_slice(&self.colors_important.to_le_bytes());
        if let Some(ext) = &self.extended {
            out.extend_from_slice(&ext.masks.red.to_le_bytes());
            out.extend_from_slice(&ext.masks.green.to_le_bytes());
            out.extend_from_slice(&ext.masks.blue.to_le_bytes());
            out.extend_from_slice(&ext.masks.alpha.to_le_bytes());
            out.extend_from_slice(&ext.color_space.to_le_bytes());
        }
        // endpoints, gamma, intent, profile fields stay zero
        out.resize(start + self.encoded_len(), 0);
    }
}

// ── Header pair ─────────────────────────────────────────────────────

/// File header and info header as they appear at the start of a file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpHeaders {
    pub file: FileHeader,
    pub info: InfoHeader,
}

impl BmpHeaders {
    /// Offset just past the info header, as declared by its size field.
    pub fn headers_end(&self) -> u64 {
        u64::from(FILE_HEADER_SIZE) + u64::from(self.info.size)
    }

    /// Serialize the file header followed by the info header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(FILE_HEADER_SIZE as usize + self.info.encoded_len());
        out.extend_from_slice(&self.file.to_bytes());
        self.info.encode_into(&mut out);
        out
    }
}

/// Decode both headers from the start of a file.
///
/// Only the signature is validated here. The info header size is used
/// solely to decide whether the extended fields are present.
pub fn parse_headers(data: &[u8]) -> Result<BmpHeaders, BmpError> {
    let file = FileHeader::parse(data)?;
    let info_bytes = data
        .get(FILE_HEADER_SIZE as usize..)
        .ok_or(BmpError::UnexpectedEof)?;
    let info = InfoHeader::parse(info_bytes)?;
    Ok(BmpHeaders { file, info })
}

/// Build the headers for an image written by this codec.
///
/// Pixel data starts immediately after the info header: no gap, no palette.
/// 32-bit images get the 124-byte variant with B,G,R,A masks, a 2835
/// pixels-per-meter resolution and the sRGB color space tag.
pub fn encode_headers(width: u32, height: u32, depth: BitDepth) -> Result<BmpHeaders, BmpError> {
    let signed_width = i32::try_from(width).map_err(|_| too_large_err(width, height))?;
    let signed_height = i32::try_from(height).map_err(|_| too_large_err(width, height))?;
    let image_size = u64::from(width)
        .checked_mul(u64::from(height))
        .and_then(|px| px.checked_mul(depth.bytes_per_pixel() as u64))
        .and_then(|bytes| u32::try_from(bytes).ok())
        .ok_or_else(|| too_large_err(width, height))?;
    let data_offset = depth.data_offset();
    let file_size = image_size
        .checked_add(data_offset)
        .ok_or_else(|| too_large_err(width, height))?;

    let (compression, resolution, extended) = match depth {
        BitDepth::Rgb24 => (COMPRESSION_RGB, 0, None),
        BitDepth::Rgba32 => (
            COMPRESSION_BITFIELDS,
            DEFAULT_PIXELS_PER_METER,
            Some(ExtendedInfo {
                masks: ChannelMasks::BGRA8,
                color_space: COLOR_SPACE_SRGB,
            }),
        ),
    };

    Ok(BmpHeaders {
        file: FileHeader {
            file_size,
            reserved1: 0,
            reserved2: 0,
            data_offset,
        },
        info: InfoHeader {
            size: depth.info_header_size(),
            width: signed_width,
            height: signed_height,
            planes: 1,
            bits_per_pixel: depth.bits(),
            compression,
            image_size,
            x_pixels_per_meter: resolution,
            y_pixels_per_meter: resolution,
            colors_used: 0,
            colors_important: 0,
            extended,
        },
    })
}

fn too_large_err(width: u32, height: u32) -> BmpError {
    BmpError::DimensionsTooLarge { width, height }
}
