//! Destroyed sprite marker component.
//!
//! The host marks a dead sprite by inserting [`Destroyed`] (or by despawning
//! the entity outright). Nothing is notified: trackers poll for the marker on
//! their next tick and drop their per-sprite state then.

use bevy_ecs::prelude::*;

/// Tag component marking a sprite as destroyed.
#[derive(Component, Clone, Debug)]
pub struct Destroyed;

/// True if `sprite` no longer exists or carries [`Destroyed`].
pub fn is_destroyed(world: &World, sprite: Entity) -> bool {
    world
        .get_entity(sprite)
        .map_or(true, |entity| entity.contains::<Destroyed>())
}
