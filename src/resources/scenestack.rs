//! Stack of per-scene tracking sessions.
//!
//! The host's scene stack drives this one: entering a scene suspends the
//! current [`Session`] and starts a fresh one, leaving a scene drops the
//! current session and resumes the suspended one. Sessions never share state.
//!
//! # Related
//!
//! - [`crate::events::scene`] – push/pop events and the observers that apply them
//! - [`crate::resources::session::Session`] – what each scene owns

use bevy_ecs::prelude::Resource;
use log::info;

use crate::resources::session::Session;
use crate::resources::trackingconfig::TrackingConfig;

#[derive(Resource)]
pub struct SceneStack {
    current: Session,
    suspended: Vec<Session>,
}

impl Default for SceneStack {
    fn default() -> Self {
        Self::new(TrackingConfig::default())
    }
}

impl SceneStack {
    /// Create a stack holding one fresh session.
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            current: Session::new(config),
            suspended: Vec::new(),
        }
    }

    pub fn current(&self) -> &Session {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut Session {
        &mut self.current
    }

    /// Number of suspended sessions below the current one.
    pub fn depth(&self) -> usize {
        self.suspended.len()
    }

    /// Suspend the current session and start a new one tuned by `config`.
    pub fn push(&mut self, config: TrackingConfig) {
        let fresh = Session::new(config);
        let previous = std::mem::replace(&mut self.current, fresh);
        self.suspended.push(previous);
        info!("Scene pushed, session depth {}", self.depth());
    }

    /// Drop the current session and resume the previous one.
    ///
    /// # Panics
    ///
    /// Popping with no suspended session is a programming error and panics.
    pub fn pop(&mut self) {
        let Some(previous) = self.suspended.pop() else {
            panic!("SceneStack::pop called with no suspended session");
        };
        self.current = previous;
        info!("Scene popped, session depth {}", self.depth());
    }
}
