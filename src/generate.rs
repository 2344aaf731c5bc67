//! Solid-color pixel buffer synthesis.

use alloc::vec::Vec;

use crate::bmp::try_zeroed;
use crate::error::BmpError;
use crate::pixel::BitDepth;

/// A fill color. Alpha is only used for 32-bit buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    /// Opaque color.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 255)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

/// Build a caller-order buffer of `width * height` pixels, all set to `color`.
///
/// No header is involved. Fails only if the size overflows or the
/// allocation cannot be made.
pub fn generate_pixels(
    width: u32,
    height: u32,
    depth: BitDepth,
    color: Color,
) -> Result<Vec<u8>, BmpError> {
    let bpp = depth.bytes_per_pixel();
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(bpp))
        .ok_or(BmpError::DimensionsTooLarge { width, height })?;

    let pixel = [color.red, color.green, color.blue, color.alpha];
    let mut buf = try_zeroed(len)?;
    for px in buf.chunks_exact_mut(bpp) {
        px.copy_from_slice(&pixel[..bpp]);
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb24_triples() {
        let buf = generate_pixels(3, 2, BitDepth::Rgb24, Color::rgba(1, 2, 3, 4)).unwrap();
        assert_eq!(buf.len(), 3 * 2 * 3);
        assert!(buf.chunks_exact(3).all(|px| px == [1, 2, 3]));
    }

    #[test]
    fn rgba32_quads() {
        let buf = generate_pixels(2, 2, BitDepth::Rgba32, Color::rgba(255, 0, 0, 255)).unwrap();
        assert_eq!(buf, [255u8, 0, 0, 255].repeat(4));
    }

    #[test]
    fn empty_image() {
        let buf = generate_pixels(0, 5, BitDepth::Rgb24, Color::rgb(9, 9, 9)).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn rgb_is_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).alpha, 255);
    }
}
