//! Shading filters for selection previews.
//!
//! Each color channel is scaled by `100 / factor`: a factor of 200 halves
//! the channel, 300 divides it by three. Factors at or below 100 leave the
//! color unchanged, so shading never brightens. Alpha and any channel past
//! the color channels are preserved.

use ndarray::{Array3, ArrayView2, ArrayView3};
use rayon::prelude::*;

use crate::raster::color_channels;

/// Default darkening factor for unselected pixels (half brightness).
pub const DEFAULT_DARKEN_FACTOR: u32 = 200;

/// Darken a single channel value.
#[inline]
pub fn darker(value: u8, factor: u32) -> u8 {
    if factor <= 100 {
        return value;
    }
    (value as u32 * 100 / factor) as u8
}

/// Darken every pixel outside the mask (u8 version).
///
/// # Arguments
/// * `input` - Image (height, width, channels); see [`color_channels`] for which channels darken
/// * `mask` - Selection mask of shape (height, width); `true` pixels are copied unchanged
/// * `factor` - Darkening factor, see module docs
///
/// # Returns
/// New image where unselected pixels are darkened, selected pixels identical to `input`
pub fn darken_unselected_u8(input: ArrayView3<u8>, mask: ArrayView2<bool>, factor: u32) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    debug_assert_eq!(mask.dim(), (height, width));

    let mut output = Array3::<u8>::zeros((height, width, channels));
    output.assign(&input);

    let row_len = width * channels;
    if row_len == 0 || height == 0 {
        return output;
    }

    let color_count = color_channels(channels);

    // zeros() always yields standard layout
    if let Some(data) = output.as_slice_mut() {
        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_mut(channels).enumerate() {
                    if mask[[y, x]] {
                        continue;
                    }
                    for v in pixel.iter_mut().take(color_count) {
                        *v = darker(*v, factor);
                    }
                }
            });
    }

    output
}
