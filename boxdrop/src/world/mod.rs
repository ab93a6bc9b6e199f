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
//! World management
//!
//! The [`WorldManager`] owns the rapier simulation: the body and collider
//! stores, the pipeline, and the single contact receiver. It creates
//! rectangular bodies, advances time by a fixed step, and reads bodies back
//! as snapshots for rendering.
//!
//! Bodies are never removed one by one. Dynamic bodies accumulate for as
//! long as the world lives and are all released by [`WorldManager::teardown`].

mod body;
mod contact;
mod tag;

pub use body::{BodyId, BodySnapshot};
pub use contact::{
    ContactEvent, ContactListener, ContactLogger, ContactPhase, ContactReceiver, ContactStats,
};
pub use tag::{BodyKind, CollisionTag};

use crate::config::WorldConfig;
use crate::coords::WorldPoint;
use body::BodyRecord;
use rapier2d::prelude::*;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tracing::{debug, info};

/// The simulation container and everything needed to step it
pub struct WorldManager {
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    receiver: ContactReceiver,
    listener: Box<dyn ContactListener>,
    records: Vec<BodyRecord>,
    by_collider: HashMap<ColliderHandle, usize>,
    density: f32,
    contacts: ContactStats,
    steps: u64,
}

impl WorldManager {
    /// Create the world and its static platform
    ///
    /// Installs a [`ContactLogger`] as the contact listener.
    pub fn initialize(config: &WorldConfig) -> Self {
        Self::with_listener(config, Box::new(ContactLogger))
    }

    /// Create the world and its static platform with a custom contact listener
    pub fn with_listener(config: &WorldConfig, listener: Box<dyn ContactListener>) -> Self {
        let mut integration_parameters = IntegrationParameters {
            dt: config.timestep,
            ..IntegrationParameters::default()
        };
        integration_parameters.num_solver_iterations =
            NonZeroUsize::new(config.velocity_iterations).unwrap_or(NonZeroUsize::MIN);
        integration_parameters.num_internal_pgs_iterations = config.position_iterations.max(1);

        let mut world = WorldManager {
            gravity: vector![config.gravity[0], config.gravity[1]],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            receiver: ContactReceiver::new(),
            listener,
            records: Vec::new(),
            by_collider: HashMap::new(),
            density: config.density,
            contacts: ContactStats::default(),
            steps: 0,
        };

        let platform = world.spawn_rectangle(
            config.platform_center.x,
            config.platform_center.y,
            config.platform_size[0],
            config.platform_size[1],
            BodyKind::Static,
        );
        info!(
            platform = %platform,
            center = %config.platform_center,
            listener = world.listener.name(),
            "world initialized"
        );

        world
    }

    /// Create a rectangle centered at `(x, y)` with the given full width and height
    ///
    /// Sizes are not validated and there is no limit on the number of bodies.
    pub fn spawn_rectangle(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        kind: BodyKind,
    ) -> BodyId {
        let builder = match kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let handle = self.bodies.insert(builder.translation(vector![x, y]).build());

        let collider = ColliderBuilder::cuboid(width / 2.0, height / 2.0)
            .density(self.density)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, handle, &mut self.bodies);

        let id = BodyId::new(handle);
        let tag = CollisionTag::from(kind);
        self.by_collider.insert(collider, self.records.len());
        self.records.push(BodyRecord { id, collider, tag });

        debug!(body = %id, %tag, x, y, width, height, "spawned rectangle");
        id
    }

    /// Advance the simulation by one fixed timestep
    ///
    /// Contacts produced by the step are resolved to tagged pairs, counted,
    /// and passed to the listener before this returns.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.receiver,
        );
        self.steps += 1;

        for raw in self.receiver.drain() {
            let (Some(first), Some(second)) = (
                self.record_for(raw.first),
                self.record_for(raw.second),
            ) else {
                continue;
            };
            let event = ContactEvent {
                first: first.id,
                second: second.id,
                first_tag: first.tag,
                second_tag: second.tag,
                phase: raw.phase,
            };
            self.contacts.record(&event);
            self.listener.on_contact(&event);
        }
    }

    /// Fixed timestep in seconds
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Number of steps taken so far
    pub fn elapsed_steps(&self) -> u64 {
        self.steps
    }

    /// Number of live bodies
    pub fn body_count(&self) -> usize {
        self.records.len()
    }

    /// Number of live bodies carrying `tag`
    pub fn count_tagged(&self, tag: CollisionTag) -> usize {
        self.records.iter().filter(|r| r.tag == tag).count()
    }

    /// Contact counters accumulated since initialization
    pub fn contacts(&self) -> ContactStats {
        self.contacts
    }

    /// Snapshot a single body
    pub fn body(&self, id: BodyId) -> Option<BodySnapshot> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .and_then(|r| self.snapshot(r))
    }

    /// Snapshot every live body, in creation order
    pub fn bodies(&self) -> impl Iterator<Item = BodySnapshot> + '_ {
        self.records.iter().filter_map(|r| self.snapshot(r))
    }

    /// Release every body and collider
    ///
    /// Returns the number of bodies released. The world stays usable and
    /// empty afterwards.
    pub fn teardown(&mut self) -> usize {
        let released = self.records.len();
        for record in self.records.drain(..) {
            self.bodies.remove(
                record.id.handle(),
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
        self.by_collider.clear();
        info!(released, steps = self.steps, "world torn down");
        released
    }

    fn record_for(&self, collider: ColliderHandle) -> Option<BodyRecord> {
        self.by_collider
            .get(&collider)
            .and_then(|&index| self.records.get(index))
            .copied()
    }

    fn snapshot(&self, record: &BodyRecord) -> Option<BodySnapshot> {
        let body = self.bodies.get(record.id.handle())?;
        let position = body.position();
        let velocity = body.linvel();
        let half_extents = self
            .colliders
            .get(record.collider)
            .and_then(|c| c.shape().as_cuboid())
            .map(|cuboid| [cuboid.half_extents.x, cuboid.half_extents.y]);

        Some(BodySnapshot {
            id: record.id,
            tag: record.tag,
            center: WorldPoint::new(position.translation.vector.x, position.translation.vector.y),
            angle: position.rotation.angle(),
            velocity: [velocity.x, velocity.y],
            half_extents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<ContactEvent>>>);

    impl ContactListener for Recorder {
        fn on_contact(&mut self, event: &ContactEvent) {
            self.0.borrow_mut().push(*event);
        }
    }

    #[test]
    fn test_initialize_creates_static_platform() {
        let world = WorldManager::initialize(&WorldConfig::default());
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.count_tagged(CollisionTag::Static), 1);

        let platform = world.bodies().next().unwrap();
        assert_eq!(platform.tag, CollisionTag::Static);
        assert_eq!(platform.center, WorldPoint::new(16.0, 1.25));
        assert_eq!(platform.half_extents, Some([16.0, 0.375]));
    }

    #[test]
    fn test_spawn_dynamic_rectangle() {
        let mut world = WorldManager::initialize(&WorldConfig::default());
        let id = world.spawn_rectangle(4.0, 10.0, 0.5, 0.5, BodyKind::Dynamic);

        let body = world.body(id).unwrap();
        assert_eq!(body.tag, CollisionTag::Dynamic);
        assert_eq!(body.center, WorldPoint::new(4.0, 10.0));
        assert_eq!(body.half_extents, Some([0.25, 0.25]));
        assert_eq!(world.count_tagged(CollisionTag::Dynamic), 1);
    }

    #[test]
    fn test_static_body_does_not_move() {
        let mut world = WorldManager::initialize(&WorldConfig::default());
        for _ in 0..30 {
            world.step();
        }
        let platform = world.bodies().next().unwrap();
        assert_eq!(platform.center, WorldPoint::new(16.0, 1.25));
        assert_eq!(world.elapsed_steps(), 30);
    }

    #[test]
    fn test_landing_reports_contact() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut world = WorldManager::with_listener(
            &WorldConfig::default(),
            Box::new(Recorder(events.clone())),
        );
        world.spawn_rectangle(16.0, 3.0, 0.5, 0.5, BodyKind::Dynamic);

        for _ in 0..120 {
            world.step();
        }

        assert!(world.contacts().landed >= 1);
        let events = events.borrow();
        assert!(events
            .iter()
            .any(|e| e.phase == ContactPhase::Began
                && e.involves(CollisionTag::Dynamic, CollisionTag::Static)));
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut world = WorldManager::initialize(&WorldConfig::default());
        world.spawn_rectangle(4.0, 10.0, 0.5, 0.5, BodyKind::Dynamic);
        world.spawn_rectangle(6.0, 10.0, 0.5, 0.5, BodyKind::Dynamic);

        assert_eq!(world.teardown(), 3);
        assert_eq!(world.body_count(), 0);
        assert_eq!(world.bodies().count(), 0);
    }
}
