use crate::bmp::Permissiveness;
use crate::bmp::decode::validate;
use crate::bmp::header::parse_headers;
use crate::error::BmpError;
use crate::pixel::BitDepth;

/// Image metadata read from the headers alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub bit_depth: BitDepth,
    /// Declared info header size (40 or 124 for files this crate writes).
    pub info_header_size: u32,
    /// Byte offset of the pixel data.
    pub data_offset: u32,
    pub compression: u32,
}

impl ImageInfo {
    /// Probe BMP headers without touching pixel data.
    ///
    /// Accepts anything the permissive decoder would; decoding may still
    /// reject the file under stricter settings.
    pub fn from_bytes(data: &[u8]) -> Result<Self, BmpError> {
        let image = validate(parse_headers(data)?, Permissiveness::Permissive, None)?;
        Ok(Self {
            width: image.width,
            height: image.height,
            bit_depth: image.depth,
            info_header_size: image.headers.info.size,
            data_offset: image.headers.file.data_offset,
            compression: image.headers.info.compression,
        })
    }
}
