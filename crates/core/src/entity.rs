//! Entity trait: identity + continuity across state changes.

use serde::{Deserialize, Serialize};

/// Which collection an entity lives in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Robot,
    Task,
    Item,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Robot => "robot",
            EntityKind::Task => "task",
            EntityKind::Item => "item",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Collection this entity belongs to.
    const KIND: EntityKind;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
