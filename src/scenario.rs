//! Scripted sprite scenarios for the headless driver.
//!
//! A [`Scenario`] describes sprites, the velocities they take over time, and
//! which animation clip each (sprite kind, event) pair plays. Running it
//! drives a `World` frame by frame exactly as a host game loop would.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "frame_ms": 16.0,
//!   "frames": 240,
//!   "animations": {
//!     "walk_east": { "frames": ["hero_e0", "hero_e1"], "interval": 120 },
//!     "wave":      { "frames": ["wave0", "wave1", "wave2"], "interval": 80, "once": true }
//!   },
//!   "bindings": [
//!     { "kind": 1, "event": "MovingEast", "play": "walk_east" },
//!     { "kind": 1, "event": "StandingEast", "play": "wave" }
//!   ],
//!   "sprites": [
//!     {
//!       "name": "hero",
//!       "kind": 1,
//!       "position": [0.0, 0.0],
//!       "image": "hero_idle",
//!       "velocity": [ { "frame": 0, "velocity": [3.0, 0.0] }, { "frame": 60, "velocity": [0.0, 0.0] } ],
//!       "destroy_at": 200
//!     }
//!   ]
//! }
//! ```

use std::sync::Arc;

use bevy_ecs::prelude::*;
use log::{info, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::components::destroyed::Destroyed;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::components::sprite::Sprite;
use crate::components::spritekind::SpriteKind;
use crate::events::movement::{EventKind, Heading};
use crate::game::{enable_auto_tracking, latest_event, register_event_handler, run_frame};
use crate::resources::dispatch::TrackingError;

fn default_frame_ms() -> f32 {
    16.0
}

fn default_frames() -> u32 {
    240
}

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Scenario {
    #[serde(default = "default_frame_ms")]
    pub frame_ms: f32,
    #[serde(default = "default_frames")]
    pub frames: u32,
    #[serde(default)]
    pub animations: FxHashMap<String, AnimationClip>,
    #[serde(default)]
    pub bindings: Vec<Binding>,
    pub sprites: Vec<SpriteScript>,
}

/// Frames played in response to an event; `once` selects a one-shot.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnimationClip {
    pub frames: Vec<String>,
    pub interval: u32,
    #[serde(default)]
    pub once: bool,
}

/// Play the clip named `play` when `event` fires on a sprite of `kind`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Binding {
    pub kind: u32,
    pub event: EventKind,
    pub play: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpriteScript {
    pub name: String,
    pub kind: u32,
    #[serde(default)]
    pub position: [f32; 2],
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub auto_events: bool,
    /// Velocity changes, applied at the start of the given frame.
    #[serde(default)]
    pub velocity: Vec<VelocityKey>,
    #[serde(default)]
    pub destroy_at: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct VelocityKey {
    pub frame: u32,
    pub velocity: [f32; 2],
}

/// Final state of one scripted sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteReport {
    pub name: String,
    pub entity: Entity,
    pub destroyed: bool,
    pub latest_event: Option<EventKind>,
    pub image: Option<String>,
}

fn heading_suffix(heading: Heading) -> &'static str {
    match heading {
        Heading::North => "north",
        Heading::East => "east",
        Heading::South => "south",
        Heading::West => "west",
    }
}

impl Scenario {
    /// Loads a scenario from a JSON file at the specified path.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let file_content = std::fs::read_to_string(path)?;
        let scenario: Scenario = serde_json::from_str(&file_content)?;
        Ok(scenario)
    }

    /// Generate `walkers` sprites that change velocity at random every half second.
    pub fn random_walk(walkers: u32, seed: u64, frames: u32, frame_ms: f32) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut animations = FxHashMap::default();
        let mut bindings = Vec::new();
        for heading in [Heading::North, Heading::East, Heading::South, Heading::West] {
            let suffix = heading_suffix(heading);
            let walk = format!("walk_{}", suffix);
            let idle = format!("idle_{}", suffix);
            animations.insert(
                walk.clone(),
                AnimationClip {
                    frames: (0..4).map(|i| format!("{}{}", walk, i)).collect(),
                    interval: 120,
                    once: false,
                },
            );
            animations.insert(
                idle.clone(),
                AnimationClip {
                    frames: (0..3).map(|i| format!("{}{}", idle, i)).collect(),
                    interval: 200,
                    once: true,
                },
            );
            bindings.push(Binding {
                kind: 1,
                event: EventKind::moving(heading),
                play: walk,
            });
            bindings.push(Binding {
                kind: 1,
                event: EventKind::standing(heading),
                play: idle,
            });
        }

        let step = ((500.0 / frame_ms.max(1.0)) as u32).max(1);
        let sprites = (0..walkers)
            .map(|i| SpriteScript {
                name: format!("walker{}", i),
                kind: 1,
                position: [rng.f32() * 320.0, rng.f32() * 180.0],
                image: None,
                auto_events: true,
                velocity: (0..frames)
                    .step_by(step as usize)
                    .map(|frame| {
                        let velocity = if rng.u8(0..4) == 0 {
                            [0.0, 0.0]
                        } else {
                            [rng.i32(-3..=3) as f32, rng.i32(-3..=3) as f32]
                        };
                        VelocityKey { frame, velocity }
                    })
                    .collect(),
                destroy_at: None,
            })
            .collect();

        Scenario {
            frame_ms,
            frames,
            animations,
            bindings,
            sprites,
        }
    }

    /// Register one handler per binding in the current scene.
    fn install_bindings(&self, world: &mut World) {
        for binding in &self.bindings {
            let Some(clip) = self.animations.get(&binding.play) else {
                warn!(
                    "Binding for {} on kind {} names unknown clip '{}'",
                    binding.event, binding.kind, binding.play
                );
                continue;
            };
            let frames: Vec<Arc<str>> = clip.frames.iter().map(|f| Arc::from(f.as_str())).collect();
            let interval = clip.interval;
            let once = clip.once;
            let clip_name = binding.play.clone();
            register_event_handler(world, binding.kind, binding.event, move |ctx| {
                info!("{:?}: {} -> {}", ctx.sprite, ctx.event, clip_name);
                if once {
                    ctx.play_single(frames.iter().cloned(), interval);
                } else {
                    ctx.play_loop(frames.iter().cloned(), interval);
                }
                Ok(())
            });
        }
    }

    fn spawn_sprites(&self, world: &mut World) -> Vec<Entity> {
        self.sprites
            .iter()
            .map(|script| {
                let mut entity = world.spawn((
                    SpriteKind(script.kind),
                    MapPosition::new(script.position[0], script.position[1]),
                    RigidBody::new(),
                ));
                if let Some(image) = &script.image {
                    entity.insert(Sprite::new(image.as_str()));
                }
                let id = entity.id();
                if script.auto_events {
                    enable_auto_tracking(world, id);
                }
                id
            })
            .collect()
    }

    /// Apply velocity keys and destruction scheduled for `frame`.
    fn apply_script(&self, world: &mut World, entities: &[Entity], frame: u32) {
        for (script, &entity) in self.sprites.iter().zip(entities) {
            if script.destroy_at == Some(frame) {
                info!("Destroying {}", script.name);
                if let Ok(mut e) = world.get_entity_mut(entity) {
                    e.insert(Destroyed);
                }
                continue;
            }
            if let Some(key) = script.velocity.iter().rev().find(|k| k.frame == frame) {
                if let Some(mut rb) = world.get_mut::<RigidBody>(entity) {
                    rb.set_velocity(key.velocity[0], key.velocity[1]);
                }
            }
        }
    }

    /// Integrate positions the way a host physics step would.
    fn integrate(world: &mut World) {
        let mut query = world.query::<(&mut MapPosition, &RigidBody)>();
        for (mut position, rigidbody) in query.iter_mut(world) {
            position.pos += rigidbody.velocity;
        }
    }

    /// Set up sprites and bindings in `world`, then run every frame.
    ///
    /// `world` must already have been prepared with
    /// [`setup_world`](crate::game::setup_world).
    pub fn run(&self, world: &mut World) -> Result<Vec<SpriteReport>, TrackingError> {
        self.install_bindings(world);
        let entities = self.spawn_sprites(world);
        info!(
            "Running {} sprites for {} frames of {}ms",
            entities.len(),
            self.frames,
            self.frame_ms
        );

        for frame in 0..self.frames {
            self.apply_script(world, &entities, frame);
            Self::integrate(world);
            run_frame(world, self.frame_ms)?;
        }

        Ok(self
            .sprites
            .iter()
            .zip(&entities)
            .map(|(script, &entity)| SpriteReport {
                name: script.name.clone(),
                entity,
                destroyed: world.get::<Destroyed>(entity).is_some(),
                latest_event: latest_event(world, entity),
                image: world.get::<Sprite>(entity).map(|s| s.tex_key.to_string()),
            })
            .collect())
    }
}
