//! ECS components read or written on host sprites.
//!
//! Sprites belong to the host game; these components are the facets this
//! crate looks at. Only [`sprite::Sprite`] is ever written.
//!
//! Submodules overview:
//! - [`destroyed`] – marker polled to drop per-sprite state lazily
//! - [`mapposition`] – world-space position
//! - [`rigidbody`] – velocity consumed by the movement classifier
//! - [`sprite`] – displayed texture key, swapped by animation playback
//! - [`spritekind`] – category used to route events to handlers

pub mod destroyed;
pub mod mapposition;
pub mod rigidbody;
pub mod sprite;
pub mod spritekind;
