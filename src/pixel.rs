use crate::error::BmpError;

/// Bits per pixel of an uncompressed BMP.
///
/// Only the two direct-color depths with whole-byte channels are supported.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 24 bits per pixel: B,G,R on disk, R,G,B for callers.
    Rgb24,
    /// 32 bits per pixel: B,G,R,A on disk, R,G,B,A for callers.
    Rgba32,
}

impl BitDepth {
    /// The on-disk bits-per-pixel value.
    pub const fn bits(self) -> u16 {
        match self {
            Self::Rgb24 => 24,
            Self::Rgba32 => 32,
        }
    }

    /// Bytes per pixel (the pixel stride), 3 or 4.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb24 => 3,
            Self::Rgba32 => 4,
        }
    }

    /// Info header size implied by this depth: 40 for 24-bit, 124 for 32-bit.
    pub const fn info_header_size(self) -> u32 {
        match self {
            Self::Rgb24 => crate::bmp::header::INFO_HEADER_SIZE,
            Self::Rgba32 => crate::bmp::header::EXTENDED_INFO_HEADER_SIZE,
        }
    }

    /// Offset of the pixel data when headers are written back to back.
    pub const fn data_offset(self) -> u32 {
        crate::bmp::header::FILE_HEADER_SIZE + self.info_header_size()
    }

    /// Caller-facing channel layout for this depth.
    pub const fn layout(self) -> PixelLayout {
        match self {
            Self::Rgb24 => PixelLayout::Rgb8,
            Self::Rgba32 => PixelLayout::Rgba8,
        }
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = BmpError;

    fn try_from(bits: u16) -> Result<Self, BmpError> {
        match bits {
            24 => Ok(Self::Rgb24),
            32 => Ok(Self::Rgba32),
            other => Err(BmpError::UnsupportedBitDepth(other)),
        }
    }
}

/// Pixel memory layout as seen by callers.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelLayout {
    /// 3 channels, 8-bit RGB.
    Rgb8,
    /// 4 channels, 8-bit RGBA.
    Rgba8,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        self.channels()
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// Typed pixels that decoded output can be viewed as.
#[cfg(feature = "rgb")]
pub trait DecodePixel: Copy {
    fn layout() -> PixelLayout;
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGB8 {
    fn layout() -> PixelLayout {
        PixelLayout::Rgb8
    }
}

#[cfg(feature = "rgb")]
impl DecodePixel for rgb::RGBA8 {
    fn layout() -> PixelLayout {
        PixelLayout::Rgba8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_from_bits() {
        assert_eq!(BitDepth::try_from(24).unwrap(), BitDepth::Rgb24);
        assert_eq!(BitDepth::try_from(32).unwrap(), BitDepth::Rgba32);
        for bits in [0u16, 1, 8, 16, 48] {
            match BitDepth::try_from(bits) {
                Err(BmpError::UnsupportedBitDepth(b)) => assert_eq!(b, bits),
                other => panic!("expected UnsupportedBitDepth, got {other:?}"),
            }
        }
    }

    #[test]
    fn depth_geometry() {
        assert_eq!(BitDepth::Rgb24.data_offset(), 54);
        assert_eq!(BitDepth::Rgba32.data_offset(), 138);
        assert_eq!(BitDepth::Rgba32.layout().channels(), 4);
    }
}
