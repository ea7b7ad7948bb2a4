use bevy_ecs::prelude::Component;

/// Externally assigned sprite category used to select event handlers.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteKind(pub u32);
