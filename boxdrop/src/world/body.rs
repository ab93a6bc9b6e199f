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
//! Body handles and snapshots
//!
//! Bodies live inside the physics engine's store. The world manager hands
//! out [`BodyId`] handles and reads each body back as a [`BodySnapshot`]
//! for rendering and inspection.

use crate::coords::WorldPoint;
use crate::world::tag::CollisionTag;
use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};
use std::fmt;

/// Handle to a body, with generational index support for safe references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyId(RigidBodyHandle);

impl BodyId {
    pub(crate) fn new(handle: RigidBodyHandle) -> Self {
        BodyId(handle)
    }

    pub(crate) fn handle(&self) -> RigidBodyHandle {
        self.0
    }

    /// Get the slot index
    pub fn index(&self) -> u32 {
        self.0.into_raw_parts().0
    }

    /// Get the generation number
    pub fn generation(&self) -> u32 {
        self.0.into_raw_parts().1
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Body({}, gen: {})", self.index(), self.generation())
    }
}

/// What the world manager keeps per body
#[derive(Debug, Clone, Copy)]
pub(crate) struct BodyRecord {
    pub(crate) id: BodyId,
    pub(crate) collider: ColliderHandle,
    pub(crate) tag: CollisionTag,
}

/// Point-in-time view of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodySnapshot {
    /// Handle of the body
    pub id: BodyId,
    /// Classification set at creation
    pub tag: CollisionTag,
    /// World-space center
    pub center: WorldPoint,
    /// Rotation in radians, counter-clockwise
    pub angle: f32,
    /// Linear velocity in m/s
    pub velocity: [f32; 2],
    /// Rectangle half-width and half-height, `None` if the collider is not a rectangle
    pub half_extents: Option<[f32; 2]>,
}

impl BodySnapshot {
    /// The four rectangle corners in world space
    ///
    /// Corners are counter-clockwise starting at the bottom-left corner of
    /// the unrotated rectangle. Returns `None` for non-rectangle bodies.
    pub fn corners(&self) -> Option<[WorldPoint; 4]> {
        let [hx, hy] = self.half_extents?;
        let (sin, cos) = self.angle.sin_cos();
        let local = [[-hx, -hy], [hx, -hy], [hx, hy], [-hx, hy]];
        Some(local.map(|[x, y]| {
            WorldPoint::new(
                self.center.x + cos * x - sin * y,
                self.center.y + sin * x + cos * y,
            )
        }))
    }

    /// Height of the bottom-most point of the body
    pub fn bottom(&self) -> Option<f32> {
        self.corners()
            .map(|corners| corners.iter().map(|c| c.y).fold(f32::INFINITY, f32::min))
    }

    /// Height of the top-most point of the body
    pub fn top(&self) -> Option<f32> {
        self.corners()
            .map(|corners| corners.iter().map(|c| c.y).fold(f32::NEG_INFINITY, f32::max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(angle: f32, half_extents: Option<[f32; 2]>) -> BodySnapshot {
        BodySnapshot {
            id: BodyId::new(RigidBodyHandle::from_raw_parts(3, 1)),
            tag: CollisionTag::Dynamic,
            center: WorldPoint::new(2.0, 5.0),
            angle,
            velocity: [0.0, 0.0],
            half_extents,
        }
    }

    #[test]
    fn test_body_id_parts() {
        let id = BodyId::new(RigidBodyHandle::from_raw_parts(42, 7));
        assert_eq!(id.index(), 42);
        assert_eq!(id.generation(), 7);
        assert_eq!(id.to_string(), "Body(42, gen: 7)");
    }

    #[test]
    fn test_axis_aligned_corners() {
        let corners = snapshot(0.0, Some([1.0, 0.5])).corners().unwrap();
        assert_eq!(corners[0], WorldPoint::new(1.0, 4.5));
        assert_eq!(corners[2], WorldPoint::new(3.0, 5.5));
    }

    #[test]
    fn test_rotated_corners() {
        let corners = snapshot(std::f32::consts::FRAC_PI_2, Some([1.0, 0.5]))
            .corners()
            .unwrap();
        // bottom-left local corner (-1, -0.5) rotates to (0.5, -1)
        assert!((corners[0].x - 2.5).abs() < 1e-5);
        assert!((corners[0].y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_non_rectangle_has_no_corners() {
        let body = snapshot(0.0, None);
        assert!(body.corners().is_none());
        assert!(body.bottom().is_none());
    }

    #[test]
    fn test_bottom_and_top() {
        let body = snapshot(0.0, Some([1.0, 0.5]));
        assert_eq!(body.bottom(), Some(4.5));
        assert_eq!(body.top(), Some(5.5));
    }
}
