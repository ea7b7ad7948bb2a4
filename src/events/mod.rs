//! Event types and observers.
//!
//! Submodules:
//! - [`movement`] – directional movement events raised per sprite
//! - [`scene`] – scene push/pop notifications that stack tracking sessions
pub mod movement;
pub mod scene;
