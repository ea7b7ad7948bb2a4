//! Sprite Director library.
//!
//! Per-frame directional movement events and frame animation for sprites in
//! a `bevy_ecs` world. This module exposes the components read on host
//! sprites, the per-scene tracking resources, the frame callbacks, and the
//! events raised along the way.

pub mod components;
pub mod events;
pub mod game;
pub mod resources;
pub mod scenario;
pub mod systems;
pub mod tracking;
