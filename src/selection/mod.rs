//! Region selection for interactive recoloring.
//!
//! This module provides:
//! - **Chain fill**: 4-connected flood fill where each step is compared to
//!   the pixel that discovered it rather than to the seed
//! - **Selection engine**: the select / recolor / commit / discard session
//!   built on top of the chain fill

pub mod chain_fill;
pub mod engine;

pub use chain_fill::{chain_fill, chain_fill_into, color_distance_sq, ChainFillResult};
pub use engine::{SelectionConfig, SelectionEngine, DEFAULT_TOLERANCE};
