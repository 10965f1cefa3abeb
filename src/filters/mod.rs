//! Pixel filters used by the selection engine.
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! Alpha (if present) is always preserved. Color permutations are no-ops
//! for grayscale.

pub mod channel_swap;
pub mod shade;

pub use channel_swap::{channel_swap_u8, ChannelSwap};
pub use shade::{darken_unselected_u8, darker, DEFAULT_DARKEN_FACTOR};
