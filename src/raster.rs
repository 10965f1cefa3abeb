//! Raster buffer helpers shared by the selection engine and filters.
//!
//! Images are `Array3<u8>` of shape (height, width, channels):
//! - **Grayscale**: (height, width, 1) - read as R=G=B
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4) - alpha is carried but never compared
//!
//! Other channel counts are tolerated: two channels read as gray + alpha,
//! five or more expose their first three as RGB, and a channel-less raster
//! reads as black everywhere.

use ndarray::{Array3, ArrayView3, ShapeError};

/// Owned 8-bit raster, (height, width, channels).
pub type Raster = Array3<u8>;

/// Build a raster from a flat, row-major pixel buffer.
///
/// # Arguments
/// * `data` - Flat array of bytes (length = width * height * channels)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - Bytes per pixel (1, 3 or 4)
///
/// # Returns
/// The raster, or the ndarray shape error when the length does not match
pub fn raster_from_raw(
    data: Vec<u8>,
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Raster, ShapeError> {
    Array3::from_shape_vec((height, width, channels), data)
}

/// Resolve a signed coordinate to an in-bounds `(x, y)` pair.
#[inline]
pub fn resolve(width: usize, height: usize, x: i64, y: i64) -> Option<(usize, usize)> {
    if x >= 0 && y >= 0 && (x as u64) < width as u64 && (y as u64) < height as u64 {
        Some((x as usize, y as usize))
    } else {
        None
    }
}

/// Number of leading channels that carry color for a given channel count.
///
/// 1 (gray) and 2 (gray + alpha) give 1, 3 and 4 give 3, anything larger
/// is capped at 3. Channels past this count are never recolored.
#[inline]
pub fn color_channels(channels: usize) -> usize {
    match channels {
        2 => 1,
        n => n.min(3),
    }
}

/// Read the RGB triple of a pixel. Gray rasters repeat the single channel.
#[inline]
pub fn rgb_at(image: &ArrayView3<u8>, x: usize, y: usize) -> (u8, u8, u8) {
    let channels = image.dim().2;
    if channels == 0 {
        (0, 0, 0)
    } else if color_channels(channels) == 1 {
        let v = image[[y, x, 0]];
        (v, v, v)
    } else {
        (image[[y, x, 0]], image[[y, x, 1]], image[[y, x, 2]])
    }
}

/// Width and height of a raster, in that order.
#[inline]
pub fn size_of(image: &ArrayView3<u8>) -> (usize, usize) {
    let (height, width, _) = image.dim();
    (width, height)
}
