use std::sync::Arc;

use bevy_ecs::prelude::Component;

/// Displayed-image slot of a sprite.
///
/// The texture key is opaque here: animation playback swaps it frame by
/// frame and whatever renders the host resolves it to pixels.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Sprite {
    pub tex_key: Arc<str>,
}

impl Sprite {
    pub fn new(tex_key: impl Into<Arc<str>>) -> Self {
        Self {
            tex_key: tex_key.into(),
        }
    }
}
