//! Event dispatch table.
//!
//! Handlers are registered per ([`EventKind`], [`SpriteKind`]) pair and run
//! synchronously when an event is raised for a sprite of that kind. A missing
//! registration is a diagnostic, not an error. A failing handler is not
//! caught: its error is returned to whoever raised the event.
//!
//! # Handler Signature
//!
//! ```ignore
//! table.register(PLAYER, EventKind::MovingEast, |ctx: &mut EventContext| {
//!     ctx.play_loop(["walk_e0", "walk_e1"], 120);
//!     Ok(())
//! });
//! ```

use std::error::Error;
use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::components::spritekind::SpriteKind;
use crate::events::movement::EventKind;
use crate::tracking::player::{AnimationPlayer, FrameSequence, StopScope};
use crate::tracking::registry::Registry;

/// Boxed error a handler may fail with.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// What a handler returns.
pub type HandlerResult = Result<(), BoxError>;

/// Stored handler callback.
pub type EventHandler = Box<dyn Fn(&mut EventContext<'_>) -> HandlerResult + Send + Sync>;

#[derive(Debug, Error)]
pub enum TrackingError {
    /// A registered handler returned an error.
    #[error("handler for {event} on sprite {sprite:?} failed: {source}")]
    Handler {
        sprite: Entity,
        event: EventKind,
        #[source]
        source: BoxError,
    },
    /// An event was raised through the world while a tick holds the scene
    /// stack. Handlers raise events with [`EventContext::trigger`] instead.
    #[error("cannot raise {event} on sprite {sprite:?} while the scene stack is in use")]
    SceneBusy { sprite: Entity, event: EventKind },
}

/// Outcome of a dispatch that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    /// No handler registered for the event at all.
    NoHandlerForEvent,
    /// Handlers exist for the event, but not for the sprite's kind.
    NoHandlerForKind,
}

/// Everything a handler can reach while it runs.
///
/// The scene stack is not reachable from here. Calls to the world-level
/// functions in [`crate::game`] made through `world` are queued and applied
/// when the tick ends.
pub struct EventContext<'a> {
    pub world: &'a mut World,
    pub sprite: Entity,
    pub event: EventKind,
    animations: &'a mut Registry<AnimationPlayer>,
    handlers: &'a EventDispatchTable,
    min_frame_interval: f32,
}

impl EventContext<'_> {
    fn player(&mut self) -> &mut AnimationPlayer {
        let sprite = self.sprite;
        let min = self.min_frame_interval;
        self.animations
            .get_or_create(sprite, || AnimationPlayer::new(sprite).with_min_interval(min))
    }

    /// Start a looping animation on the event's sprite.
    pub fn play_loop<I, S>(&mut self, frames: I, interval_millis: u32)
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let sequence = FrameSequence::new(frames, interval_millis as f32);
        self.player().set_loop(sequence);
    }

    /// Start a one-shot animation on the event's sprite.
    pub fn play_single<I, S>(&mut self, frames: I, interval_millis: u32)
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let sequence = FrameSequence::new(frames, interval_millis as f32);
        self.player().set_single(sequence);
    }

    pub fn stop_animation(&mut self, scope: StopScope) {
        self.player().stop(scope);
    }

    /// Raise another event from inside a handler.
    pub fn trigger(&mut self, sprite: Entity, event: EventKind) -> Result<Dispatch, TrackingError> {
        self.handlers.dispatch(
            self.world,
            self.animations,
            self.min_frame_interval,
            sprite,
            event,
        )
    }
}

/// Map of event kind, then sprite kind, to a single handler.
#[derive(Default)]
pub struct EventDispatchTable {
    handlers: FxHashMap<EventKind, FxHashMap<u32, EventHandler>>,
    warn_missing: bool,
}

impl EventDispatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log missing handlers at `warn` rather than `debug`.
    pub fn with_missing_warnings(mut self, warn_missing: bool) -> Self {
        self.warn_missing = warn_missing;
        self
    }

    /// Register `handler` for sprites of `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: u32, event: EventKind, handler: F)
    where
        F: Fn(&mut EventContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        let replaced = self
            .handlers
            .entry(event)
            .or_default()
            .insert(kind, Box::new(handler))
            .is_some();
        debug!(
            "Registered handler for {} on kind {} (replaced: {})",
            event, kind, replaced
        );
    }

    pub fn contains(&self, kind: u32, event: EventKind) -> bool {
        self.handlers
            .get(&event)
            .is_some_and(|by_kind| by_kind.contains_key(&kind))
    }

    fn report_missing(&self, message: &str, sprite: Entity, event: EventKind) {
        if self.warn_missing {
            warn!("{} ({} on {:?})", message, event, sprite);
        } else {
            debug!("{} ({} on {:?})", message, event, sprite);
        }
    }

    /// Run the handler for `event` on `sprite`, looked up by the sprite's kind.
    ///
    /// The handler runs before this returns. Its error, if any, is wrapped in
    /// [`TrackingError::Handler`].
    pub fn dispatch(
        &self,
        world: &mut World,
        animations: &mut Registry<AnimationPlayer>,
        min_frame_interval: f32,
        sprite: Entity,
        event: EventKind,
    ) -> Result<Dispatch, TrackingError> {
        let Some(by_kind) = self.handlers.get(&event) else {
            self.report_missing("No event handler registered for event", sprite, event);
            return Ok(Dispatch::NoHandlerForEvent);
        };
        let handler = world
            .get::<SpriteKind>(sprite)
            .and_then(|kind| by_kind.get(&kind.0));
        let Some(handler) = handler else {
            self.report_missing("No event handler registered for kind", sprite, event);
            return Ok(Dispatch::NoHandlerForKind);
        };

        let mut ctx = EventContext {
            world,
            sprite,
            event,
            animations,
            handlers: self,
            min_frame_interval,
        };
        handler(&mut ctx).map_err(|source| TrackingError::Handler {
            sprite,
            event,
            source,
        })?;
        Ok(Dispatch::Handled)
    }
}
