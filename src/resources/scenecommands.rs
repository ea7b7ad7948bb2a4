//! Scene commands queued while the scene stack is in use.
//!
//! During a tick the [`SceneStack`](crate::resources::scenestack::SceneStack)
//! is taken out of the world so handlers can borrow the `World` mutably.
//! World-level calls made from a handler in that window land here as
//! [`SceneCmd`]s and are applied, in order, once the tick hands the stack back.

use bevy_ecs::prelude::*;
use smallvec::SmallVec;
use std::sync::Arc;

use crate::events::movement::EventKind;
use crate::resources::dispatch::EventHandler;
use crate::tracking::player::StopScope;

/// A deferred operation on the current scene.
pub enum SceneCmd {
    /// Suspend the current session and start a new one
    PushScene,
    /// Resume the previous session
    PopScene,
    RegisterHandler {
        kind: u32,
        event: EventKind,
        handler: EventHandler,
    },
    EnableAutoTracking {
        sprite: Entity,
    },
    PlayLoop {
        sprite: Entity,
        frames: SmallVec<[Arc<str>; 8]>,
        interval_millis: u32,
    },
    PlaySingle {
        sprite: Entity,
        frames: SmallVec<[Arc<str>; 8]>,
        interval_millis: u32,
    },
    StopAnimation {
        sprite: Entity,
        scope: StopScope,
    },
}

/// Pending [`SceneCmd`]s, oldest first.
#[derive(Resource, Default)]
pub struct SceneCommands {
    queue: Vec<SceneCmd>,
}

impl SceneCommands {
    pub fn push(&mut self, cmd: SceneCmd) {
        self.queue.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Remove and return every pending command.
    pub fn take(&mut self) -> Vec<SceneCmd> {
        std::mem::take(&mut self.queue)
    }
}
