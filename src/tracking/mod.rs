//! Per-sprite state machines and their storage.
//!
//! - [`classifier`] – velocity to directional event classification with hysteresis
//! - [`player`] – looping and one-shot frame playback
//! - [`registry`] – O(1) lookup plus insertion-order iteration, compacted lazily

pub mod classifier;
pub mod player;
pub mod registry;
