//! Frame systems.
//!
//! Submodules overview
//! - [`time`] – update frame delta and elapsed time
//! - [`tracking`] – movement classification and animation playback callbacks

pub mod time;
pub mod tracking;
