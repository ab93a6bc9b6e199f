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
//! Body kinds and collision tags

use std::fmt;

/// How the physics engine treats a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Immovable terrain
    Static,
    /// Affected by gravity and collisions
    Dynamic,
}

/// Classification consulted by contact handling
///
/// Set once when a body is created and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionTag {
    /// The platform boxes land on
    Static,
    /// A box spawned by the player
    Dynamic,
}

impl From<BodyKind> for CollisionTag {
    fn from(kind: BodyKind) -> Self {
        match kind {
            BodyKind::Static => CollisionTag::Static,
            BodyKind::Dynamic => CollisionTag::Dynamic,
        }
    }
}

impl fmt::Display for CollisionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionTag::Static => f.write_str("static"),
            CollisionTag::Dynamic => f.write_str("dynamic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_follows_kind() {
        assert_eq!(CollisionTag::from(BodyKind::Static), CollisionTag::Static);
        assert_eq!(CollisionTag::from(BodyKind::Dynamic), CollisionTag::Dynamic);
    }
}
