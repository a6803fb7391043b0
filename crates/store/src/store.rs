//! The domain store: one owned state object for robots, tasks and inventory.
//!
//! ## Mutation pipeline
//!
//! ```text
//! call → locate record (NotFound) → validate input (Validation / InvalidTransition)
//!      → apply to the single record → publish one envelope → return
//! ```
//!
//! Nothing is touched until every check has passed, so a rejected call leaves
//! the store exactly as it was. A write that changes nothing publishes nothing.
//!
//! Mutations take `&mut self`; the store is created once at startup, handed to
//! the view layer by reference and dropped at exit. Dropping it closes every
//! subscription.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use robodepot_core::{DomainError, DomainResult, Entity, EntityKind, ItemId, RobotId, TaskId};
use robodepot_events::{EventBus, EventEnvelope, InMemoryEventBus, Subscription};
use robodepot_fleet::{Robot, RobotPatch, RobotStatus};
use robodepot_inventory::{InventoryItem, ItemPatch};
use robodepot_tasks::{NewTask, Task, TaskStatus};

use crate::event::{
    InventoryItemUpdated, RobotUpdated, StoreEnvelope, StoreEvent, TaskAdded, TaskAssigned,
    TaskStatusChanged,
};
use crate::query::{ItemQuery, RobotQuery, TaskQuery};
use crate::seed::Seed;
use crate::summary::DashboardSummary;

/// In-memory source of truth for the dashboard.
///
/// Generic over the bus so the notification transport can be swapped without
/// changing any mutation signature.
#[derive(Debug)]
pub struct DomainStore<B = InMemoryEventBus<StoreEnvelope>> {
    robots: Vec<Robot>,
    tasks: Vec<Task>,
    inventory: Vec<InventoryItem>,
    /// `None` once every task id has been handed out.
    next_task_id: Option<TaskId>,
    sequence: u64,
    bus: B,
}

impl DomainStore {
    /// Store with the in-memory bus.
    pub fn new(seed: Seed) -> DomainResult<Self> {
        Self::from_seed(seed, InMemoryEventBus::new())
    }
}

impl<B> DomainStore<B>
where
    B: EventBus<StoreEnvelope>,
{
    /// Build the store from seed data.
    ///
    /// Rejects duplicate identifiers within a collection. Task references to
    /// robots are not checked.
    pub fn from_seed(seed: Seed, bus: B) -> DomainResult<Self> {
        ensure_unique(&seed.robots)?;
        ensure_unique(&seed.tasks)?;
        ensure_unique(&seed.inventory)?;

        let next_task_id = seed
            .tasks
            .iter()
            .map(|t| *t.id())
            .max()
            .map_or(Some(TaskId::from_raw(1)), |id| id.next());

        tracing::info!(
            robots = seed.robots.len(),
            tasks = seed.tasks.len(),
            items = seed.inventory.len(),
            "domain store seeded"
        );

        Ok(Self {
            robots: seed.robots,
            tasks: seed.tasks,
            inventory: seed.inventory,
            next_task_id,
            sequence: 0,
            bus,
        })
    }

    /// Register an observer. It receives one envelope per effective mutation
    /// made after this call.
    pub fn subscribe(&self) -> Subscription<StoreEnvelope> {
        self.bus.subscribe()
    }

    /// Sequence number of the last published envelope (0 before any write).
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn robot(&self, id: &RobotId) -> Option<&Robot> {
        self.robots.iter().find(|r| r.id() == id)
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn item(&self, id: &ItemId) -> Option<&InventoryItem> {
        self.inventory.iter().find(|i| i.id() == id)
    }

    /// Robot a task points at, if it still resolves. A dangling reference
    /// yields `Ok(None)`, same as an unassigned task.
    pub fn assignee(&self, task_id: &TaskId) -> DomainResult<Option<&Robot>> {
        let task = self
            .task(task_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Task, task_id))?;
        Ok(task.assigned_robot().and_then(|robot_id| self.robot(robot_id)))
    }

    // ---- mutations ----

    pub fn update_robot_status(&mut self, robot_id: &RobotId, status: RobotStatus) -> DomainResult<&Robot> {
        self.update_robot(robot_id, RobotPatch::status(status))
    }

    /// Merge a typed patch into one robot.
    pub fn update_robot(&mut self, robot_id: &RobotId, patch: RobotPatch) -> DomainResult<&Robot> {
        let idx = position(&self.robots, robot_id).inspect_err(|err| rejected("update_robot", err))?;
        let changes = patch.validate().inspect_err(|err| rejected("update_robot", err))?;

        let robot = &mut self.robots[idx];
        let previous_status = robot.status();
        if !robot.apply(&changes) {
            tracing::debug!(robot_id = %robot_id, "robot update changed nothing");
            return Ok(&self.robots[idx]);
        }

        let event = StoreEvent::RobotUpdated(RobotUpdated {
            robot_id: robot_id.clone(),
            previous_status,
            status: robot.status(),
            battery: robot.battery(),
            location: robot.location().to_string(),
            occurred_at: Utc::now(),
        });
        tracing::info!(
            robot_id = %robot_id,
            from = %previous_status,
            to = %robot.status(),
            "robot updated"
        );

        self.publish(EntityKind::Robot, robot_id.to_string(), event);
        Ok(&self.robots[idx])
    }

    /// Append a task; the store assigns its id.
    pub fn add_task(&mut self, new_task: NewTask) -> DomainResult<TaskId> {
        let id = self
            .next_task_id
            .ok_or_else(|| DomainError::conflict("task id space exhausted"))
            .inspect_err(|err| rejected("add_task", err))?;
        let task = new_task.into_task(id).inspect_err(|err| rejected("add_task", err))?;
        self.next_task_id = id.next();

        let event = StoreEvent::TaskAdded(TaskAdded {
            task_id: id,
            priority: task.priority(),
            source: task.source().to_string(),
            destination: task.destination().to_string(),
            occurred_at: Utc::now(),
        });
        tracing::info!(task_id = %id, priority = %task.priority(), "task added");

        self.tasks.push(task);
        self.publish(EntityKind::Task, id.to_string(), event);
        Ok(id)
    }

    /// Move a task along `pending → in-progress → completed`.
    pub fn update_task_status(&mut self, task_id: &TaskId, status: TaskStatus) -> DomainResult<&Task> {
        let idx = position(&self.tasks, task_id).inspect_err(|err| rejected("update_task_status", err))?;

        let task = &mut self.tasks[idx];
        let from = task.status();
        if !task
            .transition(status)
            .inspect_err(|err| rejected("update_task_status", err))?
        {
            tracing::debug!(task_id = %task_id, status = %status, "task already in requested status");
            return Ok(&self.tasks[idx]);
        }

        tracing::info!(task_id = %task_id, from = %from, to = %status, "task status changed");
        let event = StoreEvent::TaskStatusChanged(TaskStatusChanged {
            task_id: *task_id,
            from,
            to: status,
            occurred_at: Utc::now(),
        });

        self.publish(EntityKind::Task, task_id.to_string(), event);
        Ok(&self.tasks[idx])
    }

    /// Set or clear a task's robot reference. The robot is not looked up.
    pub fn assign_task(&mut self, task_id: &TaskId, robot_id: Option<RobotId>) -> DomainResult<&Task> {
        let idx = position(&self.tasks, task_id).inspect_err(|err| rejected("assign_task", err))?;

        if !self.tasks[idx].assign(robot_id.clone()) {
            tracing::debug!(task_id = %task_id, "task assignment unchanged");
            return Ok(&self.tasks[idx]);
        }

        if let Some(robot) = &robot_id {
            if self.robot(robot).is_none() {
                tracing::warn!(task_id = %task_id, robot_id = %robot, "task assigned to unknown robot");
            }
        }
        tracing::info!(task_id = %task_id, robot_id = ?robot_id.as_ref().map(|r| r.as_str()), "task assignment changed");

        let event = StoreEvent::TaskAssigned(TaskAssigned {
            task_id: *task_id,
            robot_id,
            occurred_at: Utc::now(),
        });
        self.publish(EntityKind::Task, task_id.to_string(), event);
        Ok(&self.tasks[idx])
    }

    /// Merge a typed patch into one inventory item.
    pub fn update_inventory_item(&mut self, item_id: &ItemId, patch: ItemPatch) -> DomainResult<&InventoryItem> {
        let idx = position(&self.inventory, item_id).inspect_err(|err| rejected("update_inventory_item", err))?;
        let changes = patch
            .validate()
            .inspect_err(|err| rejected("update_inventory_item", err))?;

        let item = &mut self.inventory[idx];
        if !item.apply(&changes) {
            tracing::debug!(item_id = %item_id, "inventory update changed nothing");
            return Ok(&self.inventory[idx]);
        }

        let event = StoreEvent::InventoryItemUpdated(InventoryItemUpdated {
            item_id: item_id.clone(),
            fields: changes.fields().into_iter().map(str::to_string).collect(),
            quantity: item.quantity(),
            low_stock: item.is_low_stock(),
            occurred_at: Utc::now(),
        });
        tracing::info!(
            item_id = %item_id,
            quantity = item.quantity(),
            low_stock = item.is_low_stock(),
            "inventory item updated"
        );

        self.publish(EntityKind::Item, item_id.to_string(), event);
        Ok(&self.inventory[idx])
    }

    // ---- derived reads (recomputed on every call) ----

    /// Idle robots, in collection order.
    pub fn available_robots(&self) -> Vec<&Robot> {
        self.robots.iter().filter(|r| r.is_available()).collect()
    }

    /// Items below their reorder threshold, in collection order.
    pub fn low_stock_items(&self) -> Vec<&InventoryItem> {
        self.inventory.iter().filter(|i| i.is_low_stock()).collect()
    }

    pub fn find_robots(&self, query: &RobotQuery) -> Vec<&Robot> {
        self.robots.iter().filter(|r| query.matches(r)).collect()
    }

    pub fn find_tasks(&self, query: &TaskQuery) -> Vec<&Task> {
        self.tasks.iter().filter(|t| query.matches(t)).collect()
    }

    pub fn find_items(&self, query: &ItemQuery) -> Vec<&InventoryItem> {
        self.inventory.iter().filter(|i| query.matches(i)).collect()
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::compute(&self.robots, &self.tasks, &self.inventory)
    }

    /// Copy of the current collections, loadable as a seed.
    pub fn snapshot(&self) -> Seed {
        Seed {
            robots: self.robots.clone(),
            tasks: self.tasks.clone(),
            inventory: self.inventory.clone(),
        }
    }

    /// Tear the store down, handing back its final state and bus.
    pub fn into_parts(self) -> (Seed, B) {
        tracing::info!(sequence = self.sequence, "domain store shut down");
        let seed = Seed {
            robots: self.robots,
            tasks: self.tasks,
            inventory: self.inventory,
        };
        (seed, self.bus)
    }

    fn publish(&mut self, entity: EntityKind, entity_id: String, event: StoreEvent) {
        self.sequence += 1;
        let envelope = EventEnvelope::new(Uuid::now_v7(), entity, entity_id, self.sequence, event);

        // The write is already complete; a failed notification must not undo it.
        if let Err(err) = self.bus.publish(envelope) {
            tracing::warn!(sequence = self.sequence, error = %err, "failed to notify observers");
        }
    }
}

fn position<E: Entity>(records: &[E], id: &E::Id) -> DomainResult<usize> {
    records
        .iter()
        .position(|r| r.id() == id)
        .ok_or_else(|| DomainError::not_found(E::KIND, id))
}

fn ensure_unique<E: Entity>(records: &[E]) -> DomainResult<()> {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id()) {
            return Err(DomainError::conflict(format!(
                "duplicate {} id in seed: {}",
                E::KIND,
                record.id()
            )));
        }
    }
    Ok(())
}

fn rejected(operation: &'static str, err: &DomainError) {
    tracing::warn!(operation, error = %err, "store operation rejected");
}
