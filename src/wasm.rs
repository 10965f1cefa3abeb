//! WebAssembly exports for the selection engine.
//!
//! These are exposed to JavaScript via wasm-bindgen. Images cross the
//! boundary as flat RGBA byte arrays (length = width * height * 4), the
//! layout of canvas `ImageData`.

use wasm_bindgen::prelude::*;

use crate::filters::channel_swap::ChannelSwap;
use crate::selection::engine::{SelectionConfig, SelectionEngine};

/// Selection session handle for JavaScript.
#[wasm_bindgen]
pub struct WasmSelectionEngine {
    inner: SelectionEngine,
}

#[wasm_bindgen]
impl WasmSelectionEngine {
    /// Create an engine with the given squared-distance tolerance.
    #[wasm_bindgen(constructor)]
    pub fn new(tolerance: i32) -> WasmSelectionEngine {
        WasmSelectionEngine {
            inner: SelectionEngine::new(SelectionConfig::with_tolerance(tolerance)),
        }
    }

    /// Load an RGBA image.
    ///
    /// # Arguments
    /// * `data` - Flat array of RGBA bytes (length = width * height * 4)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    #[wasm_bindgen(js_name = loadImage)]
    pub fn load_image(&mut self, data: &[u8], width: usize, height: usize) -> Result<(), JsError> {
        self.inner
            .load_raw(data.to_vec(), width, height, 4)
            .map_err(|e| JsError::new(&format!("Invalid dimensions: {}", e)))
    }

    #[wasm_bindgen(js_name = setTolerance)]
    pub fn set_tolerance(&mut self, tolerance: i32) {
        self.inner.set_tolerance(tolerance);
    }

    /// Select the region around a clicked pixel.
    #[wasm_bindgen(js_name = selectAt)]
    pub fn select_at(&mut self, x: i32, y: i32) {
        self.inner.select_at((x as i64, y as i64));
    }

    #[wasm_bindgen(js_name = swapRedBlue)]
    pub fn swap_red_blue(&mut self) {
        self.inner.apply_channel_swap(ChannelSwap::RedBlue);
    }

    #[wasm_bindgen(js_name = swapGreenBlue)]
    pub fn swap_green_blue(&mut self) {
        self.inner.apply_channel_swap(ChannelSwap::GreenBlue);
    }

    #[wasm_bindgen(js_name = swapRedGreen)]
    pub fn swap_red_green(&mut self) {
        self.inner.apply_channel_swap(ChannelSwap::RedGreen);
    }

    pub fn commit(&mut self) {
        self.inner.commit();
    }

    pub fn discard(&mut self) {
        self.inner.discard();
    }

    /// Current preview as flat RGBA bytes.
    pub fn display(&self) -> Vec<u8> {
        self.inner.display().iter().copied().collect()
    }

    /// Committed image as flat RGBA bytes.
    pub fn core(&self) -> Vec<u8> {
        self.inner.core().iter().copied().collect()
    }

    /// Number of selected pixels.
    #[wasm_bindgen(js_name = selectedCount)]
    pub fn selected_count(&self) -> usize {
        self.inner.selected_points().len()
    }

    /// Selection bounds as `[x, y, width, height]`, empty when nothing is selected.
    #[wasm_bindgen(js_name = selectionBounds)]
    pub fn selection_bounds(&self) -> Vec<u32> {
        match self.inner.selection_bounds() {
            Some((x, y, w, h)) => vec![x as u32, y as u32, w as u32, h as u32],
            None => Vec::new(),
        }
    }

    /// Repaint requests issued so far; poll to detect a changed preview.
    #[wasm_bindgen(js_name = repaintCount)]
    pub fn repaint_count(&self) -> f64 {
        self.inner.repaint_count() as f64
    }
}
