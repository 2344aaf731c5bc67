//! Channel reordering between file order (B,G,R[,A]) and caller order (R,G,B[,A]).
//!
//! Swapping the first and third byte of every pixel is its own inverse, so
//! both directions share one kernel. Trailing bytes that do not form a whole
//! pixel are copied unchanged, which keeps both directions total and
//! length-preserving.

use alloc::vec::Vec;

use enough::Stop;

use crate::error::BmpError;
use crate::pixel::BitDepth;

/// Convert file-order pixels (B,G,R[,A]) to caller order (R,G,B[,A]).
pub fn to_caller_order(file_order: &[u8], depth: BitDepth) -> Vec<u8> {
    let mut out = alloc::vec![0u8; file_order.len()];
    swap_red_blue_into(file_order, &mut out, depth);
    out
}

/// Convert caller-order pixels (R,G,B[,A]) to file order (B,G,R[,A]).
pub fn to_file_order(caller_order: &[u8], depth: BitDepth) -> Vec<u8> {
    let mut out = alloc::vec![0u8; caller_order.len()];
    swap_red_blue_into(caller_order, &mut out, depth);
    out
}

/// [`to_caller_order`] into a caller-provided buffer of the same length.
///
/// # Panics
///
/// Panics if `out.len() != file_order.len()`.
pub fn to_caller_order_into(file_order: &[u8], out: &mut [u8], depth: BitDepth) {
    swap_red_blue_into(file_order, out, depth);
}

/// [`to_file_order`] into a caller-provided buffer of the same length.
///
/// # Panics
///
/// Panics if `out.len() != caller_order.len()`.
pub fn to_file_order_into(caller_order: &[u8], out: &mut [u8], depth: BitDepth) {
    swap_red_blue_into(caller_order, out, depth);
}

/// Run `kernel` over `src` into `dst` one row at a time, checking `stop`
/// every 16 rows.
///
/// Only whole pixels are converted; `dst` must be as long as `src`.
pub(crate) fn reorder_rows(
    src: &[u8],
    dst: &mut [u8],
    width: usize,
    depth: BitDepth,
    stop: &dyn Stop,
    kernel: fn(&[u8], &mut [u8], BitDepth),
) -> Result<(), BmpError> {
    let bpp = depth.bytes_per_pixel();
    let whole = src.len() - src.len() % bpp;
    let row_bytes = width.saturating_mul(bpp).max(bpp);
    let rows = src[..whole]
        .chunks(row_bytes)
        .zip(dst[..whole].chunks_mut(row_bytes));
    for (row_idx, (s, d)) in rows.enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        kernel(s, d, depth);
    }
    Ok(())
}

fn swap_red_blue_into(src: &[u8], dst: &mut [u8], depth: BitDepth) {
    assert_eq!(src.len(), dst.len(), "reorder buffers differ in length");
    match depth {
        BitDepth::Rgb24 => swap_pixels::<3>(src, dst),
        BitDepth::Rgba32 => swap_pixels::<4>(src, dst),
    }
}

fn swap_pixels<const N: usize>(src: &[u8], dst: &mut [u8]) {
    let mut src_px = src.chunks_exact(N);
    let mut dst_px = dst.chunks_exact_mut(N);
    for (s, d) in (&mut src_px).zip(&mut dst_px) {
        d[0] = s[2];
        d[1] = s[1];
        d[2] = s[0];
        if N == 4 {
            d[3] = s[3];
        }
    }
    dst_px
        .into_remainder()
        .copy_from_slice(src_px.remainder());
}
