//! Directional movement events.
//!
//! [`EventKind`] is the closed set of events the movement classifier raises
//! and that handlers are registered against. Ordinals are fixed so they can be
//! stored or compared across the whole process.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four compass headings a sprite can face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

/// Discrete movement event raised for a tracked sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    MovingNorth = 0,
    MovingEast = 1,
    MovingSouth = 2,
    MovingWest = 3,
    StandingNorth = 4,
    StandingEast = 5,
    StandingSouth = 6,
    StandingWest = 7,
}

impl EventKind {
    /// Every event, in ordinal order.
    pub const ALL: [EventKind; 8] = [
        EventKind::MovingNorth,
        EventKind::MovingEast,
        EventKind::MovingSouth,
        EventKind::MovingWest,
        EventKind::StandingNorth,
        EventKind::StandingEast,
        EventKind::StandingSouth,
        EventKind::StandingWest,
    ];

    pub fn moving(heading: Heading) -> Self {
        match heading {
            Heading::North => EventKind::MovingNorth,
            Heading::East => EventKind::MovingEast,
            Heading::South => EventKind::MovingSouth,
            Heading::West => EventKind::MovingWest,
        }
    }

    pub fn standing(heading: Heading) -> Self {
        match heading {
            Heading::North => EventKind::StandingNorth,
            Heading::East => EventKind::StandingEast,
            Heading::South => EventKind::StandingSouth,
            Heading::West => EventKind::StandingWest,
        }
    }

    /// Stable numeric value of this event.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Inverse of [`EventKind::ordinal`].
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn heading(self) -> Heading {
        match self {
            EventKind::MovingNorth | EventKind::StandingNorth => Heading::North,
            EventKind::MovingEast | EventKind::StandingEast => Heading::East,
            EventKind::MovingSouth | EventKind::StandingSouth => Heading::South,
            EventKind::MovingWest | EventKind::StandingWest => Heading::West,
        }
    }

    pub fn is_moving(self) -> bool {
        self.ordinal() < 4
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
