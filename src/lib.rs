//! StagSelect Rust core
//!
//! Chain-similarity region selection with channel-swap recoloring, with
//! optional Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Images are `ndarray::Array3<u8>` of shape (height, width, channels):
//! - **Grayscale**: (height, width, 1) - single channel
//! - **Gray + alpha**: (height, width, 2)
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - 3 color channels + alpha
//!
//! Alpha is carried through every operation but never takes part in color
//! comparisons.
//!
//! ## Selection Workflow
//! A [`SelectionEngine`] owns a committed `core` image and a `display`
//! preview. Selecting a point chain-fills the connected region, darkens the
//! rest of the preview, and lets channel swaps recolor the selection until
//! it is committed back into `core` or discarded.

pub mod filters;
pub mod raster;
pub mod selection;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use filters::channel_swap::ChannelSwap;
pub use raster::Raster;
pub use selection::engine::{SelectionConfig, SelectionEngine};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::filters::channel_swap::{channel_swap_u8, ChannelSwap};
    use crate::selection::chain_fill::chain_fill;
    use crate::selection::engine::{SelectionConfig, SelectionEngine, DEFAULT_TOLERANCE};

    type Bounds = (usize, usize, usize, usize);

    fn parse_swap(channels: &str) -> PyResult<ChannelSwap> {
        match channels.to_ascii_lowercase().as_str() {
            "rb" | "br" => Ok(ChannelSwap::RedBlue),
            "gb" | "bg" => Ok(ChannelSwap::GreenBlue),
            "rg" | "gr" => Ok(ChannelSwap::RedGreen),
            other => Err(PyValueError::new_err(format!(
                "unknown channel pair '{}', expected 'rb', 'gb' or 'rg'",
                other
            ))),
        }
    }

    // ========================================================================
    // Stateless Filters
    // ========================================================================

    /// Chain-fill from pixel (x, y) and return the selection mask and bounds.
    ///
    /// Bounds are (x, y, width, height), or None when nothing was selected.
    #[pyfunction]
    #[pyo3(signature = (image, x, y, tolerance=DEFAULT_TOLERANCE))]
    pub fn chain_fill_mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        x: i64,
        y: i64,
        tolerance: i32,
    ) -> (Bound<'py, PyArray2<bool>>, Option<Bounds>) {
        let result = chain_fill(image.as_array(), (x, y), tolerance);
        (result.mask.into_pyarray(py), result.bounds)
    }

    /// Swap two channels ("rb", "gb" or "rg") across a whole image.
    #[pyfunction]
    pub fn channel_swap<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        channels: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let swap = parse_swap(channels)?;
        Ok(channel_swap_u8(image.as_array(), swap).into_pyarray(py))
    }

    // ========================================================================
    // Selection Engine
    // ========================================================================

    /// Selection session over a (height, width, channels) uint8 image.
    #[pyclass(name = "SelectionEngine", unsendable)]
    pub struct PySelectionEngine {
        inner: SelectionEngine,
    }

    #[pymethods]
    impl PySelectionEngine {
        #[new]
        #[pyo3(signature = (tolerance=DEFAULT_TOLERANCE))]
        fn new(tolerance: i32) -> Self {
            Self {
                inner: SelectionEngine::new(SelectionConfig::with_tolerance(tolerance)),
            }
        }

        /// Replace the image and clear any selection.
        fn load_image(&mut self, image: PyReadonlyArray3<'_, u8>) {
            self.inner.load_image(image.as_array().to_owned());
        }

        fn set_tolerance(&mut self, tolerance: i32) {
            self.inner.set_tolerance(tolerance);
        }

        #[getter]
        fn tolerance(&self) -> i32 {
            self.inner.tolerance()
        }

        /// Select the region chain-connected to pixel (x, y).
        fn select_at(&mut self, x: i64, y: i64) {
            self.inner.select_at((x, y));
        }

        /// Recompute the active selection, e.g. after a tolerance change.
        fn refresh(&mut self) {
            self.inner.refresh();
        }

        /// Swap two channels of the selected pixels.
        ///
        /// # Arguments
        /// * `channels` - One of "rb", "gb", "rg"
        fn swap_channels(&mut self, channels: &str) -> PyResult<()> {
            let swap = parse_swap(channels)?;
            self.inner.apply_channel_swap(swap);
            Ok(())
        }

        fn commit(&mut self) {
            self.inner.commit();
        }

        fn discard(&mut self) {
            self.inner.discard();
        }

        #[getter]
        fn is_selected(&self) -> bool {
            self.inner.is_selected()
        }

        #[getter]
        fn size(&self) -> (usize, usize) {
            self.inner.size()
        }

        #[getter]
        fn selection_bounds(&self) -> Option<Bounds> {
            self.inner.selection_bounds()
        }

        /// Selected (x, y) coordinates in discovery order.
        fn selected_points(&self) -> Vec<(usize, usize)> {
            self.inner.selected_points().to_vec()
        }

        fn display<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<u8>> {
            self.inner.display().to_owned().into_pyarray(py)
        }

        fn core<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray3<u8>> {
            self.inner.core().to_owned().into_pyarray(py)
        }

        fn mask<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<bool>> {
            self.inner.mask().to_owned().into_pyarray(py)
        }
    }

    #[pymodule]
    pub fn stagselect(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PySelectionEngine>()?;
        m.add_function(wrap_pyfunction!(chain_fill_mask, m)?)?;
        m.add_function(wrap_pyfunction!(channel_swap, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::stagselect;
