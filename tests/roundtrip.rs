use enough::Unstoppable;
use zenbmp::*;

#[test]
fn bmp_roundtrip_rgb8() {
    let w = 3;
    let h = 2;
    let pixels = vec![
        255u8, 0, 0, 0, 255, 0, 0, 0, 255, // row 0: R G B
        128, 128, 128, 64, 64, 64, 0, 0, 0, // row 1: gray dark black
    ];

    let encoded = EncodeRequest::rgb24()
        .encode(&pixels, w, h, Unstoppable)
        .unwrap();

    assert_eq!(&encoded[0..2], b"BM");
    assert_eq!(encoded.len(), 54 + pixels.len());

    let decoded = DecodeRequest::new().decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.width, w);
    assert_eq!(decoded.height, h);
    assert_eq!(decoded.bit_depth, BitDepth::Rgb24);
    assert_eq!(decoded.layout(), PixelLayout::Rgb8);
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn bmp_roundtrip_rgba8() {
    let w = 2;
    let h = 2;
    let pixels = vec![
        255u8, 0, 0, 255, 0, 255, 0, 128, // row 0
        0, 0, 255, 64, 128, 128, 128, 255, // row 1
    ];

    let encoded = EncodeRequest::rgba32()
        .encode(&pixels, w, h, Unstoppable)
        .unwrap();
    assert_eq!(encoded.len(), 138 + pixels.len());

    let decoded = DecodeRequest::new().decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.width, w);
    assert_eq!(decoded.height, h);
    assert_eq!(decoded.layout(), PixelLayout::Rgba8);
    assert_eq!(decoded.pixels(), &pixels[..]);
}

#[test]
fn pixels_stored_in_file_order() {
    let encoded = encode(&[10, 20, 30, 40], 1, 1, 32, Unstoppable).unwrap();
    assert_eq!(&encoded[138..], &[30, 20, 10, 40]);

    let encoded = encode(&[10, 20, 30], 1, 1, 24, Unstoppable).unwrap();
    assert_eq!(&encoded[54..], &[30, 20, 10]);
}

#[test]
fn rows_not_padded_or_flipped() {
    // 1x2 at 24 bits: 3-byte rows would be padded to 4 by other encoders
    let pixels = [1u8, 2, 3, 4, 5, 6];
    let encoded = encode(&pixels, 1, 2, 24, Unstoppable).unwrap();
    assert_eq!(&encoded[54..], &[3, 2, 1, 6, 5, 4]);
}

#[test]
fn generate_then_encode_decode() {
    let pixels = generate(2, 2, 32, Color::rgba(255, 0, 0, 255)).unwrap();
    let encoded = encode(&pixels, 2, 2, 32, Unstoppable).unwrap();
    let decoded = decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.width, 2);
    assert_eq!(decoded.height, 2);
    assert_eq!(decoded.bit_depth.bits(), 32);
    assert_eq!(decoded.pixels(), [255u8, 0, 0, 255].repeat(4).as_slice());
}

#[test]
fn generate_rgb24_ignores_alpha() {
    let pixels = generate(4, 3, 24, Color::rgba(7, 8, 9, 10)).unwrap();
    assert_eq!(pixels.len(), 4 * 3 * 3);
    assert!(pixels.chunks_exact(3).all(|px| px == [7, 8, 9]));
}

#[test]
fn unsupported_bit_depths_rejected() {
    for bits in [0u16, 1, 8, 16, 48] {
        assert!(matches!(
            generate(1, 1, bits, Color::rgb(0, 0, 0)),
            Err(BmpError::UnsupportedBitDepth(b)) if b == bits
        ));
        assert!(matches!(
            encode(&[0; 16], 1, 1, bits, Unstoppable),
            Err(BmpError::UnsupportedBitDepth(_))
        ));
    }
}

#[test]
fn image_info_probe() {
    let encoded = encode(&[0u8; 2 * 5 * 4], 2, 5, 32, Unstoppable).unwrap();

    let info = ImageInfo::from_bytes(&encoded).unwrap();
    assert_eq!(info.width, 2);
    assert_eq!(info.height, 5);
    assert_eq!(info.bit_depth, BitDepth::Rgba32);
    assert_eq!(info.info_header_size, 124);
    assert_eq!(info.data_offset, 138);
    assert_eq!(info.compression, COMPRESSION_BITFIELDS);
}

#[test]
fn limits_reject_large() {
    let encoded = encode(&[255u8; 6], 1, 2, 24, Unstoppable).unwrap();

    let limits = Limits {
        max_pixels: Some(1), // only 1 pixel allowed
        ..Default::default()
    };

    let result = DecodeRequest::new()
        .with_limits(&limits)
        .decode(&encoded, Unstoppable);
    match result.unwrap_err() {
        BmpError::LimitExceeded(_) => {}
        other => panic!("expected LimitExceeded, got {other:?}"),
    }
}

#[test]
fn buffer_too_small() {
    let result = encode(&[0u8; 5], 1, 2, 24, Unstoppable);
    assert!(matches!(
        result,
        Err(BmpError::BufferTooSmall {
            needed: 6,
            actual: 5
        })
    ));
}

#[test]
fn empty_image_not_encoded() {
    assert!(matches!(
        encode(&[], 0, 4, 24, Unstoppable),
        Err(BmpError::InvalidHeader(_))
    ));
}

#[test]
fn reorder_involution_public() {
    let buf: Vec<u8> = (0..=255).collect();
    // 256 is not a multiple of 3; the trailing byte passes through
    for depth in [BitDepth::Rgb24, BitDepth::Rgba32] {
        assert_eq!(to_file_order(&to_caller_order(&buf, depth), depth), buf);
    }
}

#[test]
fn into_pixels_hands_over_buffer() {
    let pixels = vec![1u8, 2, 3];
    let encoded = encode(&pixels, 1, 1, 24, Unstoppable).unwrap();
    let decoded = decode(&encoded, Unstoppable).unwrap();
    assert_eq!(decoded.into_pixels(), pixels);
}

#[cfg(feature = "rgb")]
#[test]
fn typed_pixel_views() {
    let pixels = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let encoded = encode(&pixels, 2, 1, 32, Unstoppable).unwrap();
    let decoded = decode(&encoded, Unstoppable).unwrap();

    let typed: &[rgb::RGBA8] = decoded.as_pixels().unwrap();
    assert_eq!(typed[1], rgb::RGBA8::new(5, 6, 7, 8));
    assert!(matches!(
        decoded.as_pixels::<rgb::RGB8>(),
        Err(BmpError::LayoutMismatch { .. })
    ));
}

#[cfg(feature = "imgref")]
#[test]
fn imgref_view() {
    let pixels = generate(3, 2, 24, Color::rgb(1, 2, 3)).unwrap();
    let encoded = encode(&pixels, 3, 2, 24, Unstoppable).unwrap();
    let decoded = decode(&encoded, Unstoppable).unwrap();

    let img = decoded.as_imgref::<rgb::RGB8>().unwrap();
    assert_eq!(img.width(), 3);
    assert_eq!(img.height(), 2);
    let owned = decoded.to_imgvec::<rgb::RGB8>().unwrap();
    assert!(owned.buf().iter().all(|&p| p == rgb::RGB8::new(1, 2, 3)));
}

// ── Cancellation ─────────────────────────────────────────────────────

/// Cancels once `allowed` checks have passed.
struct CancelAfter {
    allowed: usize,
    seen: std::sync::atomic::AtomicUsize,
}

impl CancelAfter {
    fn new(allowed: usize) -> Self {
        Self {
            allowed,
            seen: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl Stop for CancelAfter {
    fn check(&self) -> Result<(), enough::StopReason> {
        let seen = self.seen.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        if seen < self.allowed {
            Ok(())
        } else {
            Err(enough::StopReason::Cancelled)
        }
    }
}

#[test]
fn cancelled_encode_and_decode() {
    let pixels = [1u8, 2, 3, 4];
    assert!(matches!(
        encode(&pixels, 1, 1, 32, CancelAfter::new(0)),
        Err(BmpError::Cancelled(enough::StopReason::Cancelled))
    ));

    let encoded = encode(&pixels, 1, 1, 32, Unstoppable).unwrap();
    assert!(matches!(
        decode(&encoded, CancelAfter::new(0)),
        Err(BmpError::Cancelled(enough::StopReason::Cancelled))
    ));
}

#[cfg(feature = "std")]
#[test]
fn cancelled_stream_read_and_write() {
    let pixels = [9u8; 2 * 2 * 3];
    let mut out = Vec::new();
    assert!(matches!(
        EncodeRequest::rgb24().write_to(&mut out, &pixels, 2, 2, CancelAfter::new(0)),
        Err(BmpError::Cancelled(_))
    ));

    let encoded = encode(&pixels, 2, 2, 24, Unstoppable).unwrap();
    assert!(matches!(
        DecodeRequest::new().read(&mut std::io::Cursor::new(&encoded), CancelAfter::new(0)),
        Err(BmpError::Cancelled(_))
    ));
}

#[test]
fn cancellation_reaches_row_loop() {
    // 40 rows: checks before conversion, then at rows 0, 16 and 32
    let pixels = noise(1, 40, 3);
    let encoded = encode(&pixels, 1, 40, 24, Unstoppable).unwrap();
    assert!(matches!(
        decode(&encoded, CancelAfter::new(3)),
        Err(BmpError::Cancelled(_))
    ));
    let decoded = decode(&encoded, CancelAfter::new(usize::MAX)).unwrap();
    assert_eq!(decoded.pixels(), &pixels[..]);

    assert!(matches!(
        encode(&pixels, 1, 40, 24, CancelAfter::new(2)),
        Err(BmpError::Cancelled(_))
    ));
}

fn noise(w: usize, h: usize, bpp: usize) -> Vec<u8> {
    let mut state: u32 = 0x1234_5678;
    (0..w * h * bpp)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}
