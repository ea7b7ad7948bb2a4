//! Per-sprite instance registry.
//!
//! [`Registry`] keeps one instance per sprite with O(1) keyed lookup and
//! stable insertion-order iteration. Instances live in a compact `Vec`; an
//! `FxHashMap` maps each sprite to its slot. Both always hold the same set of
//! sprites.
//!
//! Entries of destroyed sprites are not removed when the sprite dies. The
//! owner polls liveness while iterating and calls [`Registry::compact`] once
//! per tick when at least one dead entry was seen.

use bevy_ecs::prelude::Entity;
use log::debug;
use rustc_hash::FxHashMap;

/// Something owned on behalf of a single sprite.
pub trait Tracked {
    fn sprite(&self) -> Entity;
}

#[derive(Debug, Clone)]
pub struct Registry<T> {
    slots: FxHashMap<Entity, usize>,
    entries: Vec<T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            slots: FxHashMap::default(),
            entries: Vec::new(),
        }
    }
}

impl<T: Tracked> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, sprite: Entity) -> bool {
        self.slots.contains_key(&sprite)
    }

    pub fn get(&self, sprite: Entity) -> Option<&T> {
        self.slots.get(&sprite).map(|&slot| &self.entries[slot])
    }

    pub fn get_mut(&mut self, sprite: Entity) -> Option<&mut T> {
        self.slots.get(&sprite).map(|&slot| &mut self.entries[slot])
    }

    /// Look up the instance for `sprite`, creating it with `make` if absent.
    pub fn get_or_create(&mut self, sprite: Entity, make: impl FnOnce() -> T) -> &mut T {
        let slot = match self.slots.get(&sprite) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.entries.push(make());
                self.slots.insert(sprite, slot);
                slot
            }
        };
        &mut self.entries[slot]
    }

    /// Instances in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut()
    }

    /// Drop every entry whose sprite satisfies `is_gone`, in a single pass.
    ///
    /// Survivors keep their relative order. Returns the number removed.
    pub fn compact(&mut self, mut is_gone: impl FnMut(Entity) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            let gone = is_gone(entry.sprite());
            if gone {
                debug!("Dropping tracked state for {:?}", entry.sprite());
            }
            !gone
        });
        self.slots.clear();
        for (slot, entry) in self.entries.iter().enumerate() {
            self.slots.insert(entry.sprite(), slot);
        }
        before - self.entries.len()
    }
}
