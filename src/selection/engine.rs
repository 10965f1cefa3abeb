//! Interactive selection session over a committed and a working raster.
//!
//! The engine keeps two buffers: `core`, the authoritative image, and
//! `display`, the preview handed to whatever surface draws the image. A
//! selection darkens everything outside the chain-filled region in
//! `display`; recoloring then edits only selected pixels of `display`, and
//! a commit writes those pixels back into `core`.
//!
//! Every mutating operation (load, select, swap, commit, discard) requests
//! exactly one repaint through the optional listener.

use ndarray::{s, Array2, ArrayView2, ArrayView3, ShapeError};

use crate::filters::channel_swap::ChannelSwap;
use crate::filters::shade::{darken_unselected_u8, DEFAULT_DARKEN_FACTOR};
use crate::raster::{raster_from_raw, Raster};
use crate::selection::chain_fill::{chain_fill_into, points_bounds};

/// Default squared-distance tolerance.
pub const DEFAULT_TOLERANCE: i32 = 256;

/// Engine parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionConfig {
    /// Squared RGB distance a chain step must stay strictly below
    pub tolerance: i32,
    /// Darkening factor for unselected pixels in the preview (200 = half brightness)
    pub darken_factor: u32,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            darken_factor: DEFAULT_DARKEN_FACTOR,
        }
    }
}

impl SelectionConfig {
    /// Config with a custom tolerance and the default preview shading.
    pub fn with_tolerance(tolerance: i32) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }
}

type RepaintListener = Box<dyn FnMut(ArrayView3<u8>)>;

/// Selection session: owns the core and display rasters and the current selection.
pub struct SelectionEngine {
    core: Raster,
    display: Raster,
    mask: Array2<bool>,
    points: Vec<(usize, usize)>,
    config: SelectionConfig,
    seed: (i64, i64),
    selected: bool,
    repaints: u64,
    listener: Option<RepaintListener>,
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(SelectionConfig::default())
    }
}

impl SelectionEngine {
    /// Create an engine holding an empty (0x0 RGBA) image.
    pub fn new(config: SelectionConfig) -> Self {
        Self {
            core: Raster::zeros((0, 0, 4)),
            display: Raster::zeros((0, 0, 4)),
            mask: Array2::from_elem((0, 0), false),
            points: Vec::new(),
            config,
            seed: (0, 0),
            selected: false,
            repaints: 0,
            listener: None,
        }
    }

    /// Register a callback invoked with the display buffer after every mutation.
    pub fn set_repaint_listener<F>(&mut self, listener: F)
    where
        F: FnMut(ArrayView3<u8>) + 'static,
    {
        self.listener = Some(Box::new(listener));
    }

    /// Remove the repaint callback.
    pub fn clear_repaint_listener(&mut self) {
        self.listener = None;
    }

    /// Replace the core image and start over with no selection.
    ///
    /// The mask is reallocated to the new image size.
    pub fn load_image(&mut self, pixels: Raster) {
        let (height, width, channels) = pixels.dim();
        log::debug!("loading {}x{} image with {} channels", width, height, channels);

        self.display = pixels.clone();
        self.core = pixels;
        self.mask = Array2::from_elem((height, width), false);
        self.points = Vec::new();
        self.selected = false;
        self.request_repaint();
    }

    /// Load from a flat, row-major buffer of `width * height * channels` bytes.
    pub fn load_raw(
        &mut self,
        data: Vec<u8>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> Result<(), ShapeError> {
        let pixels = raster_from_raw(data, width, height, channels)?;
        self.load_image(pixels);
        Ok(())
    }

    /// Set the squared-distance tolerance used by the next selection.
    ///
    /// Takes effect on the next [`select_at`](Self::select_at) or
    /// [`refresh`](Self::refresh); the current selection is left as is.
    pub fn set_tolerance(&mut self, tolerance: i32) {
        self.config.tolerance = tolerance;
    }

    /// Select the region chain-connected to `point` and rebuild the preview.
    ///
    /// Points outside the image yield an empty selection with a fully
    /// darkened preview.
    pub fn select_at(&mut self, point: (i64, i64)) {
        log::debug!("select at ({}, {})", point.0, point.1);
        self.seed = point;
        self.selected = true;
        self.recompute();
    }

    /// Recompute the selection from the stored seed, if a selection is active.
    pub fn refresh(&mut self) {
        if self.selected {
            self.recompute();
        }
    }

    /// Swap two color channels of every selected pixel in the preview.
    pub fn apply_channel_swap(&mut self, swap: ChannelSwap) {
        log::debug!("{:?} swap on {} pixels", swap, self.points.len());
        for &(x, y) in &self.points {
            swap.apply(self.display.slice_mut(s![y, x, ..]));
        }
        self.request_repaint();
    }

    /// Write selected preview pixels back into the core image, then reset.
    pub fn commit(&mut self) {
        log::debug!("committing {} pixels", self.points.len());
        for &(x, y) in &self.points {
            let src = self.display.slice(s![y, x, ..]);
            self.core.slice_mut(s![y, x, ..]).assign(&src);
        }
        self.discard();
    }

    /// Drop the selection and any uncommitted recoloring.
    pub fn discard(&mut self) {
        self.display = self.core.clone();
        self.clear_selection();
        self.selected = false;
        self.request_repaint();
    }

    /// Authoritative image.
    pub fn core(&self) -> ArrayView3<u8> {
        self.core.view()
    }

    /// Preview image as it should be drawn.
    pub fn display(&self) -> ArrayView3<u8> {
        self.display.view()
    }

    /// Selection mask of shape (height, width).
    pub fn mask(&self) -> ArrayView2<bool> {
        self.mask.view()
    }

    /// Selected `(x, y)` coordinates in discovery order.
    pub fn selected_points(&self) -> &[(usize, usize)] {
        &self.points
    }

    /// Bounding box `(x, y, width, height)` of the selection, if any pixel is selected.
    pub fn selection_bounds(&self) -> Option<(usize, usize, usize, usize)> {
        points_bounds(&self.points)
    }

    /// Current tolerance.
    pub fn tolerance(&self) -> i32 {
        self.config.tolerance
    }

    /// Current engine parameters.
    pub fn config(&self) -> SelectionConfig {
        self.config
    }

    /// Last seed passed to [`select_at`](Self::select_at).
    pub fn seed(&self) -> (i64, i64) {
        self.seed
    }

    /// Whether a selection is active.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Image size as `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        let (height, width, _) = self.core.dim();
        (width, height)
    }

    /// Number of repaint requests issued so far.
    pub fn repaint_count(&self) -> u64 {
        self.repaints
    }

    fn recompute(&mut self) {
        self.clear_selection();
        chain_fill_into(
            self.core.view(),
            self.seed,
            self.config.tolerance,
            &mut self.mask,
            &mut self.points,
        );
        self.display = darken_unselected_u8(self.core.view(), self.mask.view(), self.config.darken_factor);
        self.request_repaint();
    }

    fn clear_selection(&mut self) {
        self.mask.fill(false);
        self.points.clear();
    }

    fn request_repaint(&mut self) {
        self.repaints += 1;
        if let Some(listener) = self.listener.as_mut() {
            listener(self.display.view());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    fn gray_strip(values: &[u8]) -> Raster {
        let mut image = Array3::<u8>::zeros((1, values.len(), 4));
        for (x, &v) in values.iter().enumerate() {
            for c in 0..3 {
                image[[0, x, c]] = v;
            }
            image[[0, x, 3]] = 255;
        }
        image
    }

    /// 4x4 RGBA: left half (10, 20, 30), right half (200, 100, 50).
    fn two_tone() -> Raster {
        let mut image = Array3::<u8>::zeros((4, 4, 4));
        for y in 0..4 {
            for x in 0..4 {
                let rgb = if x < 2 { [10, 20, 30] } else { [200, 100, 50] };
                for c in 0..3 {
                    image[[y, x, c]] = rgb[c];
                }
                image[[y, x, 3]] = 255;
            }
        }
        image
    }

    fn engine_with(image: Raster, tolerance: i32) -> SelectionEngine {
        let mut engine = SelectionEngine::new(SelectionConfig::with_tolerance(tolerance));
        engine.load_image(image);
        engine
    }

    #[test]
    fn test_load_resets_state() {
        let mut engine = engine_with(two_tone(), 100);
        engine.select_at((0, 0));
        assert!(engine.is_selected());

        engine.load_image(gray_strip(&[1, 2, 3]));

        assert!(!engine.is_selected());
        assert!(engine.selected_points().is_empty());
        assert_eq!(engine.mask().dim(), (1, 3));
        assert!(engine.mask().iter().all(|&v| !v));
        assert_eq!(engine.display(), engine.core());
        assert_eq!(engine.size(), (3, 1));
    }

    #[test]
    fn test_load_raw() {
        let mut engine = SelectionEngine::default();
        engine.load_raw(vec![7u8; 2 * 3 * 4], 2, 3, 4).unwrap();
        assert_eq!(engine.size(), (2, 3));
        assert_eq!(engine.mask().dim(), (3, 2));

        assert!(engine.load_raw(vec![0u8; 5], 2, 3, 4).is_err());
        // Failed load leaves the previous image in place
        assert_eq!(engine.size(), (2, 3));
    }

    #[test]
    fn test_default_tolerance() {
        let engine = SelectionEngine::default();
        assert_eq!(engine.tolerance(), 256);
        assert_eq!(engine.config().darken_factor, 200);
    }

    #[test]
    fn test_select_darkens_unselected_only() {
        let mut engine = engine_with(two_tone(), 100);
        engine.select_at((1, 1));

        assert_eq!(engine.selected_points().len(), 8);
        let core = engine.core();
        let display = engine.display();
        for y in 0..4 {
            for x in 0..4 {
                if x < 2 {
                    assert!(engine.mask()[[y, x]]);
                    for c in 0..4 {
                        assert_eq!(display[[y, x, c]], core[[y, x, c]]);
                    }
                } else {
                    assert!(!engine.mask()[[y, x]]);
                    assert_eq!(display[[y, x, 0]], 100);
                    assert_eq!(display[[y, x, 1]], 50);
                    assert_eq!(display[[y, x, 2]], 25);
                    assert_eq!(display[[y, x, 3]], 255);
                }
            }
        }
    }

    #[test]
    fn test_chain_similarity_strip() {
        let mut engine = engine_with(gray_strip(&[0, 10, 20, 30, 100]), 400);
        engine.select_at((0, 0));

        let selected: HashSet<usize> = engine.selected_points().iter().map(|&(x, _)| x).collect();
        assert_eq!(selected, [0, 1, 2, 3].into_iter().collect());
    }

    #[test]
    fn test_out_of_bounds_seed() {
        let mut engine = engine_with(two_tone(), 100);
        engine.select_at((-3, 10));

        assert!(engine.is_selected());
        assert!(engine.selected_points().is_empty());
        assert_eq!(engine.seed(), (-3, 10));
        // Every pixel darkened
        let core = engine.core();
        let display = engine.display();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(display[[y, x, 0]], core[[y, x, 0]] / 2);
                assert_eq!(display[[y, x, 3]], 255);
            }
        }
    }

    #[test]
    fn test_reselect_replaces_selection() {
        let mut engine = engine_with(two_tone(), 100);
        engine.select_at((0, 0));
        engine.select_at((3, 3));

        assert_eq!(engine.selected_points().len(), 8);
        assert!(engine.selected_points().iter().all(|&(x, _)| x >= 2));
        let unique: HashSet<_> = engine.selected_points().iter().collect();
        assert_eq!(unique.len(), 8);
    }

    #[test]
    fn test_tolerance_change_waits_for_refresh() {
        let mut engine = engine_with(gray_strip(&[0, 10, 20]), 400);
        engine.select_at((0, 0));
        assert_eq!(engine.selected_points().len(), 3);

        engine.set_tolerance(100);
        assert_eq!(engine.selected_points().len(), 3);

        engine.refresh();
        assert_eq!(engine.selected_points().len(), 1);
    }

    #[test]
    fn test_refresh_without_selection_is_noop() {
        let mut engine = engine_with(two_tone(), 100);
        let before = engine.repaint_count();
        engine.refresh();
        assert_eq!(engine.repaint_count(), before);
        assert!(engine.selected_points().is_empty());
    }

    #[test]
    fn test_channel_swaps() {
        let cases = [
            (ChannelSwap::RedBlue, [30, 20, 10]),
            (ChannelSwap::GreenBlue, [10, 30, 20]),
            (ChannelSwap::RedGreen, [20, 10, 30]),
        ];
        for (swap, expected) in cases {
            let mut engine = engine_with(two_tone(), 100);
            engine.select_at((0, 0));
            engine.apply_channel_swap(swap);

            let display = engine.display();
            assert_eq!(
                [display[[2, 1, 0]], display[[2, 1, 1]], display[[2, 1, 2]]],
                expected
            );
            assert_eq!(display[[2, 1, 3]], 255);
            // Core untouched until commit
            assert_eq!(engine.core()[[2, 1, 0]], 10);
            // Unselected pixels stay darkened, not swapped
            assert_eq!(display[[0, 3, 0]], 100);
        }
    }

    #[test]
    fn test_swap_without_selection() {
        let mut engine = engine_with(two_tone(), 100);
        engine.apply_channel_swap(ChannelSwap::RedBlue);
        assert_eq!(engine.display(), engine.core());
    }

    #[test]
    fn test_commit_round_trip() {
        let original = two_tone();
        let mut engine = engine_with(original.clone(), 100);
        engine.select_at((0, 0));
        engine.apply_channel_swap(ChannelSwap::RedBlue);
        engine.commit();

        assert!(!engine.is_selected());
        assert!(engine.selected_points().is_empty());
        assert!(engine.mask().iter().all(|&v| !v));
        assert_eq!(engine.display(), engine.core());

        let saved = engine.core().to_owned();
        engine.load_image(saved);
        let core = engine.core();
        for y in 0..4 {
            for x in 0..4 {
                if x < 2 {
                    assert_eq!(core[[y, x, 0]], 30);
                    assert_eq!(core[[y, x, 1]], 20);
                    assert_eq!(core[[y, x, 2]], 10);
                } else {
                    for c in 0..3 {
                        assert_eq!(core[[y, x, c]], original[[y, x, c]]);
                    }
                }
                assert_eq!(core[[y, x, 3]], 255);
            }
        }
    }

    #[test]
    fn test_commit_empty_selection_keeps_core() {
        let original = two_tone();
        let mut engine = engine_with(original.clone(), 100);
        engine.commit();
        assert_eq!(engine.core(), original.view());

        // Out-of-bounds selection: display fully darkened, still nothing committed
        engine.select_at((100, 100));
        engine.commit();
        assert_eq!(engine.core(), original.view());
    }

    #[test]
    fn test_discard_abandons_recolor() {
        let original = two_tone();
        let mut engine = engine_with(original.clone(), 100);
        engine.select_at((0, 0));
        engine.apply_channel_swap(ChannelSwap::RedGreen);
        engine.discard();

        assert_eq!(engine.core(), original.view());
        assert_eq!(engine.display(), original.view());
        assert!(!engine.is_selected());
        assert!(engine.selected_points().is_empty());
    }

    #[test]
    fn test_discard_idempotent() {
        let mut engine = engine_with(two_tone(), 100);
        engine.select_at((2, 2));
        engine.apply_channel_swap(ChannelSwap::GreenBlue);

        engine.discard();
        let once = engine.display().to_owned();
        engine.discard();

        assert_eq!(engine.display(), once.view());
    }

    #[test]
    fn test_zero_sized_image() {
        let mut engine = SelectionEngine::default();
        engine.load_image(Array3::<u8>::zeros((0, 0, 4)));
        engine.select_at((0, 0));
        engine.apply_channel_swap(ChannelSwap::RedBlue);
        engine.commit();

        assert_eq!(engine.size(), (0, 0));
        assert!(engine.selected_points().is_empty());
    }

    #[test]
    fn test_grayscale_image() {
        let mut image = Array3::<u8>::zeros((1, 3, 1));
        image[[0, 0, 0]] = 50;
        image[[0, 1, 0]] = 52;
        image[[0, 2, 0]] = 200;
        let mut engine = engine_with(image, 100);

        engine.select_at((0, 0));
        engine.apply_channel_swap(ChannelSwap::RedBlue);

        assert_eq!(engine.selected_points(), &[(0, 0), (1, 0)]);
        assert_eq!(engine.display()[[0, 0, 0]], 50);
        assert_eq!(engine.display()[[0, 2, 0]], 100);
    }

    #[test]
    fn test_channelless_raster_never_panics() {
        let mut engine = SelectionEngine::default();
        engine.load_raw(Vec::new(), 2, 2, 0).unwrap();

        engine.select_at((0, 0));
        // Every pixel reads as black, so the whole image chains together
        assert_eq!(engine.selected_points().len(), 4);
        engine.apply_channel_swap(ChannelSwap::RedBlue);
        engine.commit();

        assert_eq!(engine.display().dim(), (2, 2, 0));
        assert!(!engine.is_selected());
    }

    #[test]
    fn test_gray_alpha_raster_keeps_alpha() {
        let mut engine = SelectionEngine::default();
        engine.load_raw(vec![100, 255, 100, 255], 2, 1, 2).unwrap();

        engine.select_at((-1, -1));
        assert_eq!(engine.display().iter().copied().collect::<Vec<_>>(), vec![50, 255, 50, 255]);

        engine.select_at((0, 0));
        engine.apply_channel_swap(ChannelSwap::RedGreen);
        assert_eq!(engine.display(), engine.core());
    }

    #[test]
    fn test_selection_bounds() {
        let mut engine = engine_with(two_tone(), 100);
        assert_eq!(engine.selection_bounds(), None);

        engine.select_at((3, 1));
        assert_eq!(engine.selection_bounds(), Some((2, 0, 2, 4)));

        engine.discard();
        assert_eq!(engine.selection_bounds(), None);
    }

    #[test]
    fn test_repaint_once_per_mutation() {
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&frames);

        let mut engine = SelectionEngine::default();
        engine.set_repaint_listener(move |display| sink.borrow_mut().push(display[[0, 0, 0]]));

        engine.load_image(two_tone()); // 1
        engine.set_tolerance(100); // no repaint
        engine.select_at((3, 0)); // 2
        engine.apply_channel_swap(ChannelSwap::RedBlue); // 3
        engine.commit(); // 4
        engine.discard(); // 5

        assert_eq!(engine.repaint_count(), 5);
        // Listener sees the display at each step: (0, 0) is unselected on select
        assert_eq!(*frames.borrow(), vec![10, 5, 5, 10, 10]);

        engine.clear_repaint_listener();
        engine.discard();
        assert_eq!(engine.repaint_count(), 6);
        assert_eq!(frames.borrow().len(), 5);
    }
}
