//! World-level entry points.
//!
//! These wrap the current [`Session`](crate::resources::session::Session) of
//! the [`SceneStack`] so game code can work with a `World` alone:
//!
//! ```ignore
//! let mut world = World::new();
//! setup_world(&mut world, TrackingConfig::new());
//! register_event_handler(&mut world, PLAYER, EventKind::MovingEast, |ctx| {
//!     ctx.play_loop(["hero_e0", "hero_e1"], 120);
//!     Ok(())
//! });
//! enable_auto_tracking(&mut world, hero);
//! loop {
//!     run_frame(&mut world, 16.0)?;
//! }
//! ```
//!
//! All calls act on the scene that is current when they take effect. Called
//! from a handler (through `ctx.world`) the stack is held by the running tick,
//! so mutating calls are queued as [`SceneCmd`]s and applied in order when the
//! tick ends.

use std::sync::Arc;

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use log::{debug, info, warn};

use crate::events::movement::EventKind;
use crate::events::scene::{
    ScenePoppedEvent, ScenePushedEvent, observe_scene_popped, observe_scene_pushed,
};
use crate::resources::dispatch::{Dispatch, EventContext, HandlerResult, TrackingError};
use crate::resources::scenecommands::{SceneCmd, SceneCommands};
use crate::resources::scenestack::SceneStack;
use crate::resources::trackingconfig::TrackingConfig;
use crate::resources::worldtime::WorldTime;
use crate::systems::time::update_world_time;
use crate::systems::tracking::{
    process_scene_command, process_scene_commands, update_animations, update_movement_events,
};
use crate::tracking::player::StopScope;

/// Insert the tracking resources and scene observers into `world`.
///
/// `config` tunes the root session and, through the inserted
/// [`TrackingConfig`] resource, every session pushed later.
pub fn setup_world(world: &mut World, config: TrackingConfig) {
    info!("Setting up sprite tracking");
    world.insert_resource(WorldTime::default());
    world.insert_resource(SceneStack::new(config.clone()));
    world.insert_resource(SceneCommands::default());
    world.insert_resource(config);
    world.spawn(Observer::new(observe_scene_pushed));
    world.spawn(Observer::new(observe_scene_popped));
    // Observers must be registered before the first scene event.
    world.flush();
}

/// Run one host frame: time, then movement events, then animation.
pub fn run_frame(world: &mut World, dt_millis: f32) -> Result<(), TrackingError> {
    update_world_time(world, dt_millis);
    update_movement_events(world)?;
    update_animations(world);
    Ok(())
}

/// Apply `cmd` to the current scene now, or queue it while a tick holds the stack.
fn submit(world: &mut World, cmd: SceneCmd) {
    if world.contains_resource::<SceneStack>() {
        world.resource_scope(|world, mut scenes: Mut<SceneStack>| {
            process_scene_command(&mut scenes, world, cmd);
        });
    } else if let Some(mut commands) = world.get_resource_mut::<SceneCommands>() {
        debug!("Scene stack in use, command queued");
        commands.push(cmd);
    } else {
        warn!("SceneStack resource missing, scene command dropped");
    }
}

pub fn push_scene(world: &mut World) {
    world.trigger(ScenePushedEvent {});
}

/// Return to the previous scene. Panics if there is none.
pub fn pop_scene(world: &mut World) {
    world.trigger(ScenePoppedEvent {});
}

pub fn register_event_handler<F>(world: &mut World, kind: u32, event: EventKind, handler: F)
where
    F: Fn(&mut EventContext<'_>) -> HandlerResult + Send + Sync + 'static,
{
    submit(
        world,
        SceneCmd::RegisterHandler {
            kind,
            event,
            handler: Box::new(handler),
        },
    );
}

/// Raise `event` on `sprite` as if its classifier had.
///
/// A missing handler is logged and reported as a [`Dispatch`] value. Inside a
/// handler use [`EventContext::trigger`]; from here the call fails with
/// [`TrackingError::SceneBusy`] while a tick holds the scene stack.
pub fn trigger_event(
    world: &mut World,
    sprite: Entity,
    event: EventKind,
) -> Result<Dispatch, TrackingError> {
    if !world.contains_resource::<SceneStack>() {
        warn!("trigger_event({}, {:?}) while the scene stack is in use", event, sprite);
        return Err(TrackingError::SceneBusy { sprite, event });
    }
    let result = world.resource_scope(|world, mut scenes: Mut<SceneStack>| {
        scenes.current_mut().trigger_event(world, sprite, event)
    });
    process_scene_commands(world);
    result
}

pub fn enable_auto_tracking(world: &mut World, sprite: Entity) {
    submit(world, SceneCmd::EnableAutoTracking { sprite });
}

/// Last event recorded for `sprite` in the current scene.
///
/// `None` while a tick holds the scene stack.
pub fn latest_event(world: &World, sprite: Entity) -> Option<EventKind> {
    world
        .get_resource::<SceneStack>()
        .and_then(|scenes| scenes.current().latest_event(sprite))
}

pub fn play_loop<I, S>(world: &mut World, sprite: Entity, frames: I, interval_millis: u32)
where
    I: IntoIterator<Item = S>,
    S: Into<Arc<str>>,
{
    let frames = frames.into_iter().map(Into::into).collect();
    submit(
        world,
        SceneCmd::PlayLoop {
            sprite,
            frames,
            interval_millis,
        },
    );
}

pub fn play_single<I, S>(world: &mut World, sprite: Entity, frames: I, interval_millis: u32)
where
    I: IntoIterator<Item = S>,
    S: Into<Arc<str>>,
{
    let frames = frames.into_iter().map(Into::into).collect();
    submit(
        world,
        SceneCmd::PlaySingle {
            sprite,
            frames,
            interval_millis,
        },
    );
}

pub fn stop_animation(world: &mut World, sprite: Entity, scope: StopScope) {
    submit(world, SceneCmd::StopAnimation { sprite, scope });
}
