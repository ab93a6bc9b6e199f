// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Contact notifications
//!
//! Each world owns exactly one [`ContactReceiver`]. The physics engine
//! calls it from inside a step with raw collider handles; the world manager
//! drains it after the step, resolves both colliders to their bodies and
//! tags, and hands the resulting [`ContactEvent`]s to a [`ContactListener`].
//!
//! The default listener, [`ContactLogger`], performs no game logic.

use crate::world::body::BodyId;
use crate::world::tag::CollisionTag;
use rapier2d::prelude::{
    ColliderHandle, ColliderSet, CollisionEvent, ContactPair, EventHandler, Real, RigidBodySet,
};
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// Whether two bodies started or stopped touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    /// The bodies started touching during the last step
    Began,
    /// The bodies stopped touching during the last step
    Ended,
}

/// A contact between two tagged bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    /// First body of the pair
    pub first: BodyId,
    /// Second body of the pair
    pub second: BodyId,
    /// Tag of the first body
    pub first_tag: CollisionTag,
    /// Tag of the second body
    pub second_tag: CollisionTag,
    /// Began or ended
    pub phase: ContactPhase,
}

impl ContactEvent {
    /// Check whether the pair consists of exactly these two tags, in any order
    pub fn involves(&self, a: CollisionTag, b: CollisionTag) -> bool {
        (self.first_tag == a && self.second_tag == b) || (self.first_tag == b && self.second_tag == a)
    }
}

/// Hook for game logic that reacts to contacts
///
/// Called once per resolved event, after the step that produced it.
pub trait ContactListener {
    /// Handle a contact that began or ended
    fn on_contact(&mut self, event: &ContactEvent);

    /// Get the name of this listener for debugging
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Listener that only traces contacts
#[derive(Debug, Default)]
pub struct ContactLogger;

impl ContactListener for ContactLogger {
    fn on_contact(&mut self, event: &ContactEvent) {
        trace!(
            first = %event.first,
            second = %event.second,
            first_tag = %event.first_tag,
            second_tag = %event.second_tag,
            phase = ?event.phase,
            "contact"
        );
    }

    fn name(&self) -> &str {
        "ContactLogger"
    }
}

/// Running contact counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContactStats {
    /// Total contacts that began
    pub began: u64,
    /// Total contacts that ended
    pub ended: u64,
    /// Total contacts that began between a dynamic and a static body
    pub landed: u64,
}

impl ContactStats {
    /// Pairs currently touching
    pub fn active(&self) -> u64 {
        self.began.saturating_sub(self.ended)
    }

    pub(crate) fn record(&mut self, event: &ContactEvent) {
        match event.phase {
            ContactPhase::Began => {
                self.began += 1;
                if event.involves(CollisionTag::Dynamic, CollisionTag::Static) {
                    self.landed += 1;
                }
            }
            ContactPhase::Ended => self.ended += 1,
        }
    }
}

/// Raw collision notification from the physics engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RawContact {
    pub(crate) first: ColliderHandle,
    pub(crate) second: ColliderHandle,
    pub(crate) phase: ContactPhase,
}

/// The collision-notification receiver installed in the physics pipeline
///
/// The pipeline requires `Send + Sync`. Steps run on the event-loop thread,
/// so the lock is never contended.
#[derive(Debug, Default)]
pub struct ContactReceiver {
    pending: Mutex<Vec<RawContact>>,
}

impl ContactReceiver {
    /// Create an empty receiver
    pub fn new() -> Self {
        ContactReceiver::default()
    }

    /// Take every event recorded since the last drain
    pub(crate) fn drain(&self) -> Vec<RawContact> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner))
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl EventHandler for ContactReceiver {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        let raw = match event {
            CollisionEvent::Started(first, second, _) => RawContact {
                first,
                second,
                phase: ContactPhase::Began,
            },
            CollisionEvent::Stopped(first, second, _) => RawContact {
                first,
                second,
                phase: ContactPhase::Ended,
            },
        };
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(raw);
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
