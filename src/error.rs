use alloc::string::String;
use enough::StopReason;

/// Errors from BMP loading, saving, decoding and encoding.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
    /// The first two bytes are not `BM`.
    #[error("unrecognized format magic bytes (expected \"BM\")")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// Only 24-bit and 32-bit images are supported.
    #[error("unsupported bit depth: {0} (supported: 24, 32)")]
    UnsupportedBitDepth(u16),

    #[error("failed to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    /// Fewer pixel bytes were available than the header declares.
    #[error("short pixel read: expected {expected} bytes, got {actual}")]
    ShortRead { expected: usize, actual: usize },

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("dimensions too large: {width}x{height}")]
    DimensionsTooLarge { width: u32, height: u32 },

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("pixel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: crate::PixelLayout,
        actual: crate::PixelLayout,
    },

    #[cfg(feature = "std")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for BmpError {
    fn from(r: StopReason) -> Self {
        BmpError::Cancelled(r)
    }
}
