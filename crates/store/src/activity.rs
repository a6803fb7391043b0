//! Activity feed: the dashboard's "recent events" panel as a projection.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use robodepot_core::EntityKind;
use robodepot_events::{Event, EventEnvelope, Projection};

use crate::event::StoreEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub sequence: u64,
    pub occurred_at: DateTime<Utc>,
    pub entity: EntityKind,
    pub entity_id: String,
    pub event_type: &'static str,
    pub message: String,
}

/// Bounded log of recent changes, newest last.
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    capacity: usize,
    entries: VecDeque<ActivityEntry>,
}

impl ActivityFeed {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &ActivityEntry> {
        self.entries.iter()
    }

    /// Up to `n` entries, newest first.
    pub fn latest(&self, n: usize) -> Vec<&ActivityEntry> {
        self.entries.iter().rev().take(n).collect()
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Projection for ActivityFeed {
    type Ev = StoreEvent;

    fn apply(&mut self, envelope: &EventEnvelope<StoreEvent>) {
        if self.capacity == 0 {
            return;
        }

        let event = envelope.payload();
        self.entries.push_back(ActivityEntry {
            sequence: envelope.sequence_number(),
            occurred_at: event.occurred_at(),
            entity: envelope.entity(),
            entity_id: envelope.entity_id().to_string(),
            event_type: event.event_type(),
            message: event.describe(),
        });

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::Seed;
    use crate::store::DomainStore;
    use robodepot_core::{ItemId, RobotId};
    use robodepot_events::ProjectionRunner;
    use robodepot_fleet::RobotStatus;
    use robodepot_inventory::ItemPatch;

    #[test]
    fn feed_follows_store_writes() {
        let mut store = DomainStore::new(Seed::builtin().unwrap()).unwrap();
        let sub = store.subscribe();
        let mut runner = ProjectionRunner::new(ActivityFeed::default());

        store
            .update_robot_status(&RobotId::new("R1").unwrap(), RobotStatus::Idle)
            .unwrap();
        store
            .update_inventory_item(&ItemId::new("I1").unwrap(), ItemPatch::quantity(2))
            .unwrap();

        for env in sub.drain() {
            runner.apply(&env).unwrap();
        }

        let feed = runner.projection();
        assert_eq!(feed.len(), 2);
        let latest = feed.latest(1);
        assert_eq!(latest[0].entity, EntityKind::Item);
        assert_eq!(latest[0].event_type, "inventory.item.updated");
        assert_eq!(latest[0].message, "Item I1 updated (quantity); low stock at 2");

        let first = feed.entries().next().unwrap();
        assert_eq!(first.message, "Robot R1 is now idle (40%, Zone A)");
    }

    #[test]
    fn oldest_entries_are_evicted_past_capacity() {
        let mut store = DomainStore::new(Seed::builtin().unwrap()).unwrap();
        let sub = store.subscribe();
        let mut feed = ActivityFeed::new(2);
        let item = ItemId::new("I2").unwrap();

        for qty in 1..=5 {
            store.update_inventory_item(&item, ItemPatch::quantity(qty)).unwrap();
        }
        for env in sub.drain() {
            feed.apply(&env);
        }

        let seqs: Vec<u64> = feed.entries().map(|e| e.sequence).collect();
        assert_eq!(seqs, vec![4, 5]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut store = DomainStore::new(Seed::builtin().unwrap()).unwrap();
        let sub = store.subscribe();
        let mut feed = ActivityFeed::new(0);

        store
            .update_robot_status(&RobotId::new("R2").unwrap(), RobotStatus::Busy)
            .unwrap();
        for env in sub.drain() {
            feed.apply(&env);
        }
        assert!(feed.is_empty());
    }
}
