//! Frame-based animation playback.
//!
//! An [`AnimationPlayer`] holds up to two [`FrameSequence`]s for one sprite: a
//! looping sequence and a one-shot ("single") sequence. Elapsed time is
//! accumulated and consumed in whole frame intervals, so every intermediate
//! frame is stepped through even when one call covers several intervals.
//!
//! # Priority
//!
//! While a single sequence is set it advances exclusively; the loop is left
//! untouched. When the single finishes the player returns to idle for that
//! call and the loop, if any, restarts from frame 0 on the next call.

use std::sync::Arc;

use bevy_ecs::prelude::Entity;
use log::debug;
use smallvec::SmallVec;

use crate::tracking::registry::Tracked;

/// Smallest frame interval accepted, in milliseconds.
pub const DEFAULT_MIN_FRAME_INTERVAL: f32 = 1.0;

/// Which sequences [`AnimationPlayer::stop`] clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopScope {
    All,
    LoopOnly,
}

/// Ordered frames (texture keys) shown `interval` milliseconds apart.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    pub frames: SmallVec<[Arc<str>; 8]>,
    pub interval: f32,
}

impl FrameSequence {
    pub fn new<I, S>(frames: I, interval: f32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            frames: frames.into_iter().map(Into::into).collect(),
            interval,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Per-sprite animation state.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    sprite: Entity,
    looped: Option<FrameSequence>,
    single: Option<FrameSequence>,
    /// `None` until the active sequence starts, and again once a single ends.
    frame: Option<usize>,
    /// Accumulated time not yet consumed by frame advances.
    timer: f32,
    min_interval: f32,
}

impl AnimationPlayer {
    pub fn new(sprite: Entity) -> Self {
        Self {
            sprite,
            looped: None,
            single: None,
            frame: None,
            timer: 0.0,
            min_interval: DEFAULT_MIN_FRAME_INTERVAL,
        }
    }

    pub fn with_min_interval(mut self, min_interval: f32) -> Self {
        self.min_interval = min_interval.max(f32::MIN_POSITIVE);
        self
    }

    pub fn frame(&self) -> Option<usize> {
        self.frame
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn loop_sequence(&self) -> Option<&FrameSequence> {
        self.looped.as_ref()
    }

    pub fn single_sequence(&self) -> Option<&FrameSequence> {
        self.single.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.looped.is_none() && self.single.is_none()
    }

    fn clamp(&self, mut sequence: FrameSequence) -> FrameSequence {
        if !(sequence.interval >= self.min_interval) {
            debug!(
                "Frame interval {} for {:?} clamped to {}",
                sequence.interval, self.sprite, self.min_interval
            );
            sequence.interval = self.min_interval;
        }
        sequence
    }

    /// Install a looping sequence.
    ///
    /// A running single is not interrupted; the loop waits for it to finish.
    /// An empty sequence clears the loop.
    pub fn set_loop(&mut self, sequence: FrameSequence) {
        if sequence.is_empty() {
            debug!("Empty loop for {:?}, clearing loop", self.sprite);
            self.looped = None;
            return;
        }
        self.looped = Some(self.clamp(sequence));
        if self.single.is_none() {
            self.frame = None;
            self.timer = 0.0;
        }
    }

    /// Install a one-shot sequence, always restarting playback.
    pub fn set_single(&mut self, sequence: FrameSequence) {
        self.single = Some(self.clamp(sequence));
        self.frame = None;
        self.timer = 0.0;
    }

    /// Clear both sequences. Frame and timer are reset on the next `set_*`.
    pub fn stop_all(&mut self) {
        self.looped = None;
        self.single = None;
    }

    /// Clear the loop only; an active single keeps playing.
    pub fn stop_loop(&mut self) {
        self.looped = None;
    }

    pub fn stop(&mut self, scope: StopScope) {
        match scope {
            StopScope::All => self.stop_all(),
            StopScope::LoopOnly => self.stop_loop(),
        }
    }

    /// Accumulate `dt` milliseconds and advance frames.
    ///
    /// Returns the texture key to display when the shown frame changed.
    pub fn advance(&mut self, dt: f32) -> Option<Arc<str>> {
        self.timer += dt;

        if let Some(single) = &self.single {
            let started = self.frame;
            let mut frame = started.unwrap_or(0);
            while self.timer >= single.interval {
                self.timer -= single.interval;
                frame += 1;
            }
            if frame >= single.len() {
                debug!("Single animation finished for {:?}", self.sprite);
                self.single = None;
                self.timer = 0.0;
                self.frame = None;
                return None;
            }
            self.frame = Some(frame);
            if started == Some(frame) {
                return None;
            }
            return Some(single.frames[frame].clone());
        }

        let looped = self.looped.as_ref()?;
        let started = self.frame;
        let mut frame = started.unwrap_or(0);
        while self.timer >= looped.interval {
            self.timer -= looped.interval;
            frame = (frame + 1) % looped.len();
        }
        self.frame = Some(frame);
        if started == Some(frame) {
            None
        } else {
            Some(looped.frames[frame].clone())
        }
    }
}

impl Tracked for AnimationPlayer {
    fn sprite(&self) -> Entity {
        self.sprite
    }
}
