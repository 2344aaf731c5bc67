use alloc::vec::Vec;

use enough::Stop;

#[cfg(feature = "rgb")]
use rgb::AsPixels as _;

use crate::bmp::{self, Permissiveness};
use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::{BitDepth, PixelLayout};

/// Decoded image: caller-order pixels (R,G,B[,A]), row-major, rows in
/// file order, no row padding.
///
/// The buffer is owned by the caller; the codec keeps no reference to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeOutput {
    pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub bit_depth: BitDepth,
}

impl DecodeOutput {
    pub(crate) fn new(pixels: Vec<u8>, width: u32, height: u32, bit_depth: BitDepth) -> Self {
        Self {
            pixels,
            width,
            height,
            bit_depth,
        }
    }

    /// Access the pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Take ownership of the pixel data.
    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Caller-facing channel layout (`Rgb8` or `Rgba8`).
    pub fn layout(&self) -> PixelLayout {
        self.bit_depth.layout()
    }

    /// Reinterpret pixel data as typed pixel slice.
    ///
    /// Returns [`BmpError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::DecodePixel>(&self) -> Result<&[P], BmpError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        if self.layout() != P::layout() {
            return Err(BmpError::LayoutMismatch {
                expected: P::layout(),
                actual: self.layout(),
            });
        }
        Ok(self.pixels().as_pixels())
    }

    /// Zero-copy view as an [`imgref::ImgRef`] of typed pixels.
    ///
    /// Returns [`BmpError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::DecodePixel>(&self) -> Result<imgref::ImgRef<'_, P>, BmpError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width as usize,
            self.height as usize,
        ))
    }

    /// Convert to an [`imgref::ImgVec`] of typed pixels.
    ///
    /// Returns [`BmpError::LayoutMismatch`] if the pixel layout doesn't match `P`.
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: crate::DecodePixel>(&self) -> Result<imgref::ImgVec<P>, BmpError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width as usize,
            self.height as usize,
        ))
    }
}

/// Decode configuration: resource limits and header permissiveness.
///
/// ```no_run
/// use zenbmp::{DecodeRequest, Limits, Permissiveness, Unstoppable};
///
/// let limits = Limits { max_pixels: Some(4096 * 4096), ..Default::default() };
/// let image = DecodeRequest::new()
///     .with_limits(&limits)
///     .with_permissiveness(Permissiveness::Strict)
///     .load("image.bmp", Unstoppable)?;
/// # Ok::<(), zenbmp::BmpError>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DecodeRequest<'a> {
    limits: Option<&'a Limits>,
    permissiveness: Permissiveness,
}

impl<'a> DecodeRequest<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_permissiveness(mut self, permissiveness: Permissiveness) -> Self {
        self.permissiveness = permissiveness;
        self
    }

    /// Decode a complete BMP file held in memory.
    pub fn decode(&self, data: &[u8], stop: impl Stop) -> Result<DecodeOutput, BmpError> {
        bmp::decode(data, self.limits, self.permissiveness, &stop)
    }

    /// Decode a BMP from a seekable stream, starting at its current position.
    #[cfg(feature = "std")]
    pub fn read<R: std::io::Read + std::io::Seek>(
        &self,
        reader: &mut R,
        stop: impl Stop,
    ) -> Result<DecodeOutput, BmpError> {
        bmp::read(reader, self.limits, self.permissiveness, &stop)
    }

    /// Open and decode the BMP file at `path`.
    #[cfg(feature = "std")]
    pub fn load(
        &self,
        path: impl AsRef<std::path::Path>,
        stop: impl Stop,
    ) -> Result<DecodeOutput, BmpError> {
        bmp::load(path.as_ref(), self.limits, self.permissiveness, &stop)
    }
}
