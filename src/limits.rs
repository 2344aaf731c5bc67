use alloc::format;

use crate::error::BmpError;

/// Caps applied to a header before any pixel buffer is allocated.
///
/// `None` means unbounded; the default caps nothing.
#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub max_width: Option<u64>,
    pub max_height: Option<u64>,
    /// Maximum pixel count (width * height).
    pub max_pixels: Option<u64>,
    /// Maximum size of the decoded caller-order buffer.
    pub max_memory_bytes: Option<u64>,
}

impl Limits {
    /// Validate the geometry of an image about to be decoded.
    pub(crate) fn check_image(
        &self,
        width: u32,
        height: u32,
        pixel_bytes: usize,
    ) -> Result<(), BmpError> {
        let pixels = u64::from(width) * u64::from(height);
        cap("width", u64::from(width), self.max_width)?;
        cap("height", u64::from(height), self.max_height)?;
        cap("pixel count", pixels, self.max_pixels)?;
        cap("pixel buffer size", pixel_bytes as u64, self.max_memory_bytes)
    }
}

fn cap(what: &str, value: u64, max: Option<u64>) -> Result<(), BmpError> {
    match max {
        Some(max) if value > max => Err(BmpError::LimitExceeded(format!(
            "{what} {value} exceeds limit {max}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unlimited() {
        let limits = Limits::default();
        assert!(limits.check_image(u32::MAX, u32::MAX, usize::MAX).is_ok());
    }

    #[test]
    fn each_cap_applies() {
        let limits = Limits {
            max_width: Some(10),
            max_height: Some(20),
            max_pixels: Some(150),
            max_memory_bytes: Some(400),
        };
        assert!(limits.check_image(10, 15, 400).is_ok());
        assert!(matches!(
            limits.check_image(11, 1, 33),
            Err(BmpError::LimitExceeded(msg)) if msg.starts_with("width")
        ));
        assert!(matches!(
            limits.check_image(1, 21, 63),
            Err(BmpError::LimitExceeded(msg)) if msg.starts_with("height")
        ));
        assert!(matches!(
            limits.check_image(10, 16, 480),
            Err(BmpError::LimitExceeded(msg)) if msg.starts_with("pixel count")
        ));
        assert!(matches!(
            limits.check_image(10, 14, 401),
            Err(BmpError::LimitExceeded(msg)) if msg.starts_with("pixel buffer")
        ));
    }
}
