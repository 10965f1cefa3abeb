//! Chain-similarity flood fill.
//!
//! Selects the 4-connected region reachable from a seed pixel where every
//! step of the walk stays within tolerance of the pixel that discovered it.
//! Unlike a magic wand that compares against the seed color, a chain fill
//! follows gradual gradients: the endpoints of a selected region may differ
//! arbitrarily as long as each neighbor-to-neighbor step is small.

use ndarray::{Array2, ArrayView3};

use crate::raster::{resolve, rgb_at, size_of};

/// Neighbor offsets, in the order they are explored: left, right, down, up.
const NEIGHBORS: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

/// Chain fill result with metadata.
pub struct ChainFillResult {
    /// Selection mask of shape (height, width)
    pub mask: Array2<bool>,
    /// Selected `(x, y)` coordinates in discovery order
    pub points: Vec<(usize, usize)>,
    /// Bounds of selected region
    pub bounds: Option<(usize, usize, usize, usize)>, // (x, y, width, height)
}

/// Squared RGB distance between two colors. Alpha is not part of the color.
#[inline]
pub fn color_distance_sq(a: (u8, u8, u8), b: (u8, u8, u8)) -> i32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    dr * dr + db * db + dg * dg
}

/// Run a chain fill into freshly allocated buffers.
///
/// # Arguments
/// * `image` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `seed` - Starting `(x, y)`; may lie outside the image
/// * `tolerance` - A step is accepted iff its squared RGB distance is strictly below this
pub fn chain_fill(image: ArrayView3<u8>, seed: (i64, i64), tolerance: i32) -> ChainFillResult {
    let (width, height) = size_of(&image);
    let mut mask = Array2::from_elem((height, width), false);
    let mut points = Vec::new();

    chain_fill_into(image, seed, tolerance, &mut mask, &mut points);

    let bounds = points_bounds(&points);
    ChainFillResult { mask, points, bounds }
}

/// Run a chain fill, marking `mask` and appending to `points`.
///
/// Pixels already marked in `mask` are treated as visited and never
/// revisited. `mask` must have shape (height, width) of `image`.
///
/// # Returns
/// Number of pixels newly selected
pub fn chain_fill_into(
    image: ArrayView3<u8>,
    seed: (i64, i64),
    tolerance: i32,
    mask: &mut Array2<bool>,
    points: &mut Vec<(usize, usize)>,
) -> usize {
    let (width, height) = size_of(&image);
    debug_assert_eq!(mask.dim(), (height, width));

    let Some(origin) = resolve(width, height, seed.0, seed.1) else {
        return 0;
    };

    let before = points.len();

    // Each entry is a candidate and the accepted pixel that discovered it.
    // The seed is its own reference.
    let mut stack: Vec<((usize, usize), (usize, usize))> = vec![(origin, origin)];

    while let Some(((x, y), reference)) = stack.pop() {
        if mask[[y, x]] {
            continue;
        }

        let color = rgb_at(&image, x, y);
        if color_distance_sq(color, rgb_at(&image, reference.0, reference.1)) >= tolerance {
            continue;
        }

        mask[[y, x]] = true;
        points.push((x, y));

        // Reversed so the first listed neighbor is explored first
        for &(dx, dy) in NEIGHBORS.iter().rev() {
            if let Some(next) = resolve(width, height, x as i64 + dx, y as i64 + dy) {
                if !mask[[next.1, next.0]] {
                    stack.push((next, (x, y)));
                }
            }
        }
    }

    let added = points.len() - before;
    log::trace!(
        "chain fill from ({}, {}) with tolerance {} selected {} pixels",
        seed.0,
        seed.1,
        tolerance,
        added
    );
    added
}

/// Bounding box `(x, y, width, height)` of a point list.
pub fn points_bounds(points: &[(usize, usize)]) -> Option<(usize, usize, usize, usize)> {
    let (&(fx, fy), rest) = points.split_first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (fx, fy, fx, fy);
    for &(x, y) in rest {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    Some((min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}
