//! Velocity to directional event classifier.
//!
//! A [`MovementClassifier`] turns a sprite's velocity into at most one
//! [`EventKind`] per tick. It remembers the last dominant heading so that a
//! stationary sprite can report which way it was facing, and so that
//! near-ties between the axes keep the previous heading instead of flickering.
//!
//! # Classification
//!
//! 1. Zero velocity: standing, facing the last heading (nothing if the sprite
//!    never moved).
//! 2. One axis exceeds the other by more than the hysteresis band: that axis
//!    and its sign pick the heading.
//! 3. Otherwise the first rule of [`TIE_BREAK_RULES`] that holds wins.
//!
//! Events are edge-triggered: [`MovementClassifier::update`] only returns an
//! event when it differs from the previously computed one.

use bevy_ecs::prelude::Entity;
use glam::Vec2;

use crate::events::movement::{EventKind, Heading};
use crate::tracking::registry::Tracked;

/// Default width of the tie band, in velocity units.
pub const DEFAULT_HYSTERESIS_BAND: f32 = 1.0;

/// One entry of the tie-break chain.
#[derive(Clone, Copy)]
pub struct TieRule {
    /// Returns true when this rule applies to `velocity` given the previous heading.
    pub holds: fn(Vec2, Option<Heading>) -> bool,
    pub heading: Heading,
}

/// Ordered rules evaluated top to bottom while the axes are nearly tied.
///
/// The first four keep the previous heading while its axis still points the
/// same way. The last four are the fixed fallback order East, West, South, North.
pub const TIE_BREAK_RULES: [TieRule; 8] = [
    TieRule {
        holds: |v, last| v.x > 0.0 && last == Some(Heading::East),
        heading: Heading::East,
    },
    TieRule {
        holds: |v, last| v.x < 0.0 && last == Some(Heading::West),
        heading: Heading::West,
    },
    TieRule {
        holds: |v, last| v.y > 0.0 && last == Some(Heading::South),
        heading: Heading::South,
    },
    TieRule {
        holds: |v, last| v.y < 0.0 && last == Some(Heading::North),
        heading: Heading::North,
    },
    TieRule {
        holds: |v, _| v.x > 0.0,
        heading: Heading::East,
    },
    TieRule {
        holds: |v, _| v.x < 0.0,
        heading: Heading::West,
    },
    TieRule {
        holds: |v, _| v.y > 0.0,
        heading: Heading::South,
    },
    TieRule {
        holds: |v, _| v.y < 0.0,
        heading: Heading::North,
    },
];

/// Pick the heading for a tied velocity, or `None` if no rule holds.
pub fn break_tie(velocity: Vec2, last: Option<Heading>) -> Option<Heading> {
    TIE_BREAK_RULES
        .iter()
        .find(|rule| (rule.holds)(velocity, last))
        .map(|rule| rule.heading)
}

/// Heading of the strictly dominant axis.
fn dominant_heading(velocity: Vec2) -> Heading {
    if velocity.x.abs() > velocity.y.abs() {
        if velocity.x > 0.0 {
            Heading::East
        } else {
            Heading::West
        }
    } else if velocity.y > 0.0 {
        Heading::South
    } else {
        Heading::North
    }
}

/// Per-sprite movement state machine.
#[derive(Debug, Clone)]
pub struct MovementClassifier {
    sprite: Entity,
    last_position: Option<Vec2>,
    last_heading: Option<Heading>,
    last_event: Option<EventKind>,
    band: f32,
    dead_reckoning: bool,
}

impl MovementClassifier {
    pub fn new(sprite: Entity, position: Option<Vec2>) -> Self {
        Self {
            sprite,
            last_position: position,
            last_heading: None,
            last_event: None,
            band: DEFAULT_HYSTERESIS_BAND,
            dead_reckoning: false,
        }
    }

    /// Override the hysteresis band width.
    pub fn with_band(mut self, band: f32) -> Self {
        self.band = band.abs();
        self
    }

    /// Classify the per-tick position delta when the velocity is zero.
    pub fn with_dead_reckoning(mut self, enabled: bool) -> Self {
        self.dead_reckoning = enabled;
        self
    }

    pub fn last_event(&self) -> Option<EventKind> {
        self.last_event
    }

    pub fn last_heading(&self) -> Option<Heading> {
        self.last_heading
    }

    pub fn last_position(&self) -> Option<Vec2> {
        self.last_position
    }

    /// Advance one tick.
    ///
    /// Returns the event to raise, if the computed event changed since the
    /// previous tick. A change to "no event" is recorded but not returned.
    pub fn update(&mut self, velocity: Vec2, position: Option<Vec2>) -> Option<EventKind> {
        let mut velocity = velocity;
        if self.dead_reckoning && velocity == Vec2::ZERO {
            if let (Some(prev), Some(cur)) = (self.last_position, position) {
                velocity = cur - prev;
            }
        }

        let event = self.pick(velocity);
        if position.is_some() {
            self.last_position = position;
        }
        if event == self.last_event {
            return None;
        }
        self.last_event = event;
        event
    }

    fn pick(&mut self, velocity: Vec2) -> Option<EventKind> {
        if velocity.x == 0.0 && velocity.y == 0.0 {
            return self.last_heading.map(EventKind::standing);
        }
        if !velocity.is_finite() {
            return None;
        }

        let delta = velocity.x.abs() - velocity.y.abs();
        let heading = if delta < -self.band || delta > self.band {
            Some(dominant_heading(velocity))
        } else {
            break_tie(velocity, self.last_heading)
        };
        if heading.is_some() {
            self.last_heading = heading;
        }
        heading.map(EventKind::moving)
    }
}

impl Tracked for MovementClassifier {
    fn sprite(&self) -> Entity {
        self.sprite
    }
}
