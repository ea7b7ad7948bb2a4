//! Velocity component read by the movement classifier.
//!
//! Velocity is owned by the host: input handling, physics or scripts write
//! it, and this crate only reads it once per tick to classify movement. A
//! sprite without a [`RigidBody`] is treated as stationary.

use bevy_ecs::prelude::Component;
use glam::Vec2;

/// Kinematic body storing the current velocity.
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::new();
/// rb.set_velocity(3.0, 0.0); // heading east
/// ```
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct RigidBody {
    /// Current velocity in world units per tick.
    pub velocity: Vec2,
}

impl RigidBody {
    /// Create a RigidBody at rest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RigidBody with the given velocity.
    pub fn with_velocity(x: f32, y: f32) -> Self {
        Self {
            velocity: Vec2::new(x, y),
        }
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) {
        self.velocity = Vec2::new(x, y);
    }

    /// Stop the body.
    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}
