//! Channel swap recoloring: exchange two of the R, G, B channels.
//!
//! ## Supported Formats
//!
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4) - alpha preserved
//! - **Grayscale**: (height, width, 1) or gray + alpha (height, width, 2) -
//!   no-op, there is nothing to permute

use ndarray::{Array3, ArrayView3, ArrayViewMut1, Axis};

use crate::raster::color_channels;

/// The three supported channel permutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelSwap {
    /// Exchange red and blue.
    RedBlue,
    /// Exchange green and blue.
    GreenBlue,
    /// Exchange red and green.
    RedGreen,
}

impl ChannelSwap {
    /// Channel indices exchanged by this permutation.
    #[inline]
    pub fn channels(self) -> (usize, usize) {
        match self {
            ChannelSwap::RedBlue => (0, 2),
            ChannelSwap::GreenBlue => (1, 2),
            ChannelSwap::RedGreen => (0, 1),
        }
    }

    /// Permute a single pixel in place.
    ///
    /// `pixel` holds one pixel's channel values. Gray and gray + alpha
    /// pixels are left untouched.
    #[inline]
    pub fn apply(self, mut pixel: ArrayViewMut1<u8>) {
        if color_channels(pixel.len()) < 3 {
            return;
        }
        let (a, b) = self.channels();
        pixel.swap(a, b);
    }
}

/// Apply a channel swap to every pixel of an image (u8 version).
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `swap` - Which pair of channels to exchange
///
/// # Returns
/// Recolored image with same channel count, alpha preserved
pub fn channel_swap_u8(input: ArrayView3<u8>, swap: ChannelSwap) -> Array3<u8> {
    let mut output = input.to_owned();
    if color_channels(output.dim().2) < 3 {
        return output;
    }

    for pixel in output.lanes_mut(Axis(2)) {
        swap.apply(pixel);
    }
    output
}
