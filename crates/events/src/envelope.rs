use serde::{Deserialize, Serialize};
use uuid::Uuid;

use robodepot_core::EntityKind;

/// Envelope for an event, containing ordering + entity metadata.
///
/// Notes:
/// - `sequence_number` is monotonically increasing per store, starting at 1.
/// - `entity_id` is the rendered id of the record the event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,

    entity: EntityKind,
    entity_id: String,

    /// Monotonically increasing position in the store's change stream.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        entity: EntityKind,
        entity_id: impl Into<String>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            entity,
            entity_id: entity_id.into(),
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }
}
