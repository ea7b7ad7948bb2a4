//! Per-frame tracking callbacks.
//!
//! The host calls these two at different points of its frame:
//!
//! - [`update_movement_events`] at logic priority, after velocities are final
//! - [`update_animations`] at animation priority, before drawing
//!
//! Both read the frame delta from [`WorldTime`] and drive the current
//! session of the [`SceneStack`]. The stack is lifted out of the world for the
//! duration of the call so handlers get full `World` access; world-level calls
//! handlers make meanwhile are queued in [`SceneCommands`] and applied by
//! [`process_scene_commands`] before the callback returns.

use bevy_ecs::prelude::*;
use log::debug;

use crate::resources::dispatch::TrackingError;
use crate::resources::scenecommands::{SceneCmd, SceneCommands};
use crate::resources::scenestack::SceneStack;
use crate::resources::trackingconfig::TrackingConfig;
use crate::resources::worldtime::WorldTime;

/// Classify movement of every auto-tracked sprite and dispatch events.
///
/// A handler error aborts the rest of this tick and is returned to the frame
/// loop. Commands queued before the error are still applied.
pub fn update_movement_events(world: &mut World) -> Result<(), TrackingError> {
    let result = world.resource_scope(|world, mut scenes: Mut<SceneStack>| {
        scenes.current_mut().update(world)
    });
    process_scene_commands(world);
    result
}

/// Advance every animation player of the current scene.
pub fn update_animations(world: &mut World) {
    let dt = world.resource::<WorldTime>().delta;
    world.resource_scope(|world, mut scenes: Mut<SceneStack>| {
        scenes.current_mut().animate(world, dt);
    });
}

/// Apply one command to the scene stack.
///
/// `PopScene` on a stack with nothing suspended panics, as
/// [`SceneStack::pop`] does.
pub fn process_scene_command(scenes: &mut SceneStack, world: &World, cmd: SceneCmd) {
    match cmd {
        SceneCmd::PushScene => {
            let config = world
                .get_resource::<TrackingConfig>()
                .cloned()
                .unwrap_or_default();
            scenes.push(config);
        }
        SceneCmd::PopScene => scenes.pop(),
        SceneCmd::RegisterHandler {
            kind,
            event,
            handler,
        } => {
            scenes
                .current_mut()
                .register_event_handler(kind, event, handler);
        }
        SceneCmd::EnableAutoTracking { sprite } => {
            scenes.current_mut().enable_auto_tracking(world, sprite);
        }
        SceneCmd::PlayLoop {
            sprite,
            frames,
            interval_millis,
        } => {
            scenes
                .current_mut()
                .play_loop(sprite, frames, interval_millis);
        }
        SceneCmd::PlaySingle {
            sprite,
            frames,
            interval_millis,
        } => {
            scenes
                .current_mut()
                .play_single(sprite, frames, interval_millis);
        }
        SceneCmd::StopAnimation { sprite, scope } => {
            scenes.current_mut().stop_animation(sprite, scope);
        }
    }
}

/// Apply every queued [`SceneCmd`] in the order it was raised.
///
/// While the scene stack is itself out of the world the queue is left for
/// the call holding it.
pub fn process_scene_commands(world: &mut World) {
    if !world.contains_resource::<SceneStack>() {
        return;
    }
    let pending = match world.get_resource_mut::<SceneCommands>() {
        Some(mut commands) if !commands.is_empty() => commands.take(),
        _ => return,
    };
    debug!("Applying {} queued scene commands", pending.len());
    world.resource_scope(|world, mut scenes: Mut<SceneStack>| {
        for cmd in pending {
            process_scene_command(&mut scenes, world, cmd);
        }
    });
}
