//! Scene-scoped tracking session.
//!
//! A [`Session`] owns everything tracked for one scene: the movement
//! classifiers, the animation players and the event dispatch table. The host
//! drives it twice per frame, [`Session::update`] at logic priority and
//! [`Session::animate`] at animation priority.
//!
//! # Tick Flow
//!
//! 1. Walk the registry in insertion order, skipping sprites that are
//!    destroyed (despawned or tagged [`Destroyed`](crate::components::destroyed::Destroyed)).
//! 2. Classifiers dispatch their event inline, before the next sprite runs.
//!    Animation players write their new frame into the sprite's [`Sprite`].
//! 3. If any destroyed sprite was seen, compact the registry once.

use std::sync::Arc;

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::destroyed::is_destroyed;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::events::movement::EventKind;
use crate::resources::dispatch::{
    Dispatch, EventContext, EventDispatchTable, HandlerResult, TrackingError,
};
use crate::resources::trackingconfig::TrackingConfig;
use crate::tracking::classifier::MovementClassifier;
use crate::tracking::player::{AnimationPlayer, FrameSequence, StopScope};
use crate::tracking::registry::{Registry, Tracked};

pub struct Session {
    classifiers: Registry<MovementClassifier>,
    animations: Registry<AnimationPlayer>,
    handlers: EventDispatchTable,
    config: TrackingConfig,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(TrackingConfig::default())
    }
}

impl Session {
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            classifiers: Registry::new(),
            animations: Registry::new(),
            handlers: EventDispatchTable::new().with_missing_warnings(config.warn_missing_handlers),
            config,
        }
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn classifiers(&self) -> &Registry<MovementClassifier> {
        &self.classifiers
    }

    pub fn animations(&self) -> &Registry<AnimationPlayer> {
        &self.animations
    }

    pub fn register_event_handler<F>(&mut self, kind: u32, event: EventKind, handler: F)
    where
        F: Fn(&mut EventContext<'_>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.register(kind, event, handler);
    }

    /// Raise `event` for `sprite` through the dispatch table.
    pub fn trigger_event(
        &mut self,
        world: &mut World,
        sprite: Entity,
        event: EventKind,
    ) -> Result<Dispatch, TrackingError> {
        self.handlers.dispatch(
            world,
            &mut self.animations,
            self.config.min_frame_interval,
            sprite,
            event,
        )
    }

    /// Start classifying `sprite`'s movement. Idempotent.
    pub fn enable_auto_tracking(&mut self, world: &World, sprite: Entity) {
        let config = &self.config;
        self.classifiers.get_or_create(sprite, || {
            debug!("Auto events enabled for {:?}", sprite);
            let position = world.get::<MapPosition>(sprite).map(|p| p.pos);
            MovementClassifier::new(sprite, position)
                .with_band(config.hysteresis_band)
                .with_dead_reckoning(config.dead_reckoning)
        });
    }

    /// Last event recorded for `sprite`, or `None` if untracked or silent.
    pub fn latest_event(&self, sprite: Entity) -> Option<EventKind> {
        self.classifiers.get(sprite).and_then(|c| c.last_event())
    }

    fn player(&mut self, sprite: Entity) -> &mut AnimationPlayer {
        let min = self.config.min_frame_interval;
        self.animations
            .get_or_create(sprite, || AnimationPlayer::new(sprite).with_min_interval(min))
    }

    pub fn play_loop<I, S>(&mut self, sprite: Entity, frames: I, interval_millis: u32)
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let sequence = FrameSequence::new(frames, interval_millis as f32);
        self.player(sprite).set_loop(sequence);
    }

    pub fn play_single<I, S>(&mut self, sprite: Entity, frames: I, interval_millis: u32)
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let sequence = FrameSequence::new(frames, interval_millis as f32);
        self.player(sprite).set_single(sequence);
    }

    pub fn stop_animation(&mut self, sprite: Entity, scope: StopScope) {
        self.player(sprite).stop(scope);
    }

    /// Classify every tracked sprite and dispatch the resulting events.
    ///
    /// Classification looks at the current velocity only, so no frame delta
    /// is taken. Stops at the first handler error and returns it; destroyed
    /// entries are then compacted on the next call.
    pub fn update(&mut self, world: &mut World) -> Result<(), TrackingError> {
        let mut saw_destroyed = false;
        for classifier in self.classifiers.iter_mut() {
            let sprite = classifier.sprite();
            if is_destroyed(world, sprite) {
                saw_destroyed = true;
                continue;
            }
            let velocity = world
                .get::<RigidBody>(sprite)
                .map_or(Vec2::ZERO, |rb| rb.velocity);
            let position = world.get::<MapPosition>(sprite).map(|p| p.pos);
            if let Some(event) = classifier.update(velocity, position) {
                debug!("{:?} raised {}", sprite, event);
                self.handlers.dispatch(
                    world,
                    &mut self.animations,
                    self.config.min_frame_interval,
                    sprite,
                    event,
                )?;
            }
        }
        if saw_destroyed {
            let world: &World = world;
            self.classifiers.compact(|sprite| is_destroyed(world, sprite));
        }
        Ok(())
    }

    /// Advance every animation player by `dt` milliseconds.
    pub fn animate(&mut self, world: &mut World, dt: f32) {
        let mut saw_destroyed = false;
        for player in self.animations.iter_mut() {
            let sprite = player.sprite();
            if is_destroyed(world, sprite) {
                saw_destroyed = true;
                continue;
            }
            if let Some(tex_key) = player.advance(dt) {
                apply_frame(world, sprite, tex_key);
            }
        }
        if saw_destroyed {
            let world: &World = world;
            self.animations.compact(|sprite| is_destroyed(world, sprite));
        }
    }
}

/// Write `tex_key` into the sprite's image slot, adding the slot if missing.
fn apply_frame(world: &mut World, sprite: Entity, tex_key: Arc<str>) {
    if let Some(mut slot) = world.get_mut::<Sprite>(sprite) {
        slot.tex_key = tex_key;
    } else {
        world.entity_mut(sprite).insert(Sprite::new(tex_key));
    }
}
