//! Scene push/pop events and observers.
//!
//! The host triggers [`ScenePushedEvent`] when a scene is entered on top of
//! the current one and [`ScenePoppedEvent`] when it returns to the previous
//! scene. The observers in this module keep the [`SceneStack`] in step, so
//! every scene gets its own tracking session.
//!
//! # Example
//!
//! ```ignore
//! world.spawn(Observer::new(observe_scene_pushed));
//! world.spawn(Observer::new(observe_scene_popped));
//! world.flush();
//! world.trigger(ScenePushedEvent {});
//! ```
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::resources::scenecommands::{SceneCmd, SceneCommands};
use crate::resources::scenestack::SceneStack;
use crate::resources::trackingconfig::TrackingConfig;

/// A new scene was pushed on top of the current one.
#[derive(Event, Debug, Clone, Copy)]
pub struct ScenePushedEvent {}

/// The current scene was popped, resuming the previous one.
#[derive(Event, Debug, Clone, Copy)]
pub struct ScenePoppedEvent {}

/// Observer that starts a fresh session for the pushed scene.
///
/// The new session is tuned by the world's [`TrackingConfig`]. While a tick
/// holds the stack the push is queued and applied when the tick ends.
pub fn observe_scene_pushed(
    _trigger: On<ScenePushedEvent>,
    scenes: Option<ResMut<SceneStack>>,
    config: Option<Res<TrackingConfig>>,
    commands: Option<ResMut<SceneCommands>>,
) {
    debug!("ScenePushedEvent triggered");
    match (scenes, commands) {
        (Some(mut scenes), _) => {
            let config =
                config.map_or_else(TrackingConfig::default, |c| TrackingConfig::clone(&c));
            scenes.push(config);
        }
        (None, Some(mut commands)) => commands.push(SceneCmd::PushScene),
        (None, None) => warn!("SceneStack resource missing in observe_scene_pushed"),
    }
}

/// Observer that resumes the previous scene's session.
///
/// Panics through [`SceneStack::pop`] if there is no previous session, either
/// right away or when a queued pop is applied.
pub fn observe_scene_popped(
    _trigger: On<ScenePoppedEvent>,
    scenes: Option<ResMut<SceneStack>>,
    commands: Option<ResMut<SceneCommands>>,
) {
    debug!("ScenePoppedEvent triggered");
    match (scenes, commands) {
        (Some(mut scenes), _) => scenes.pop(),
        (None, Some(mut commands)) => commands.push(SceneCmd::PopScene),
        (None, None) => warn!("SceneStack resource missing in observe_scene_popped"),
    }
}
