use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use robodepot_core::{ItemId, RobotId, TaskId};
use robodepot_events::{Event, EventEnvelope};
use robodepot_fleet::{BatteryLevel, RobotStatus};
use robodepot_tasks::{Priority, TaskStatus};

/// What observers receive.
pub type StoreEnvelope = EventEnvelope<StoreEvent>;

/// Event: RobotUpdated (carries the values after the write).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotUpdated {
    pub robot_id: RobotId,
    pub previous_status: RobotStatus,
    pub status: RobotStatus,
    pub battery: BatteryLevel,
    pub location: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TaskAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAdded {
    pub task_id: TaskId,
    pub priority: Priority,
    pub source: String,
    pub destination: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TaskStatusChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusChanged {
    pub task_id: TaskId,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Event: TaskAssigned (`robot_id: None` means unassigned).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAssigned {
    pub task_id: TaskId,
    pub robot_id: Option<RobotId>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: InventoryItemUpdated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItemUpdated {
    pub item_id: ItemId,
    pub fields: Vec<String>,
    pub quantity: u32,
    pub low_stock: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    RobotUpdated(RobotUpdated),
    TaskAdded(TaskAdded),
    TaskStatusChanged(TaskStatusChanged),
    TaskAssigned(TaskAssigned),
    InventoryItemUpdated(InventoryItemUpdated),
}

impl StoreEvent {
    /// One-line human readable summary for activity panels.
    pub fn describe(&self) -> String {
        match self {
            StoreEvent::RobotUpdated(e) if e.previous_status != e.status => format!(
                "Robot {} is now {} ({}, {})",
                e.robot_id, e.status, e.battery, e.location
            ),
            StoreEvent::RobotUpdated(e) => {
                format!("Robot {} updated ({}, {})", e.robot_id, e.battery, e.location)
            }
            StoreEvent::TaskAdded(e) => format!(
                "Task {} created: {} → {} [{}]",
                e.task_id, e.source, e.destination, e.priority
            ),
            StoreEvent::TaskStatusChanged(e) => {
                format!("Task {} moved from {} to {}", e.task_id, e.from, e.to)
            }
            StoreEvent::TaskAssigned(TaskAssigned {
                task_id,
                robot_id: Some(robot),
                ..
            }) => format!("Task {task_id} assigned to {robot}"),
            StoreEvent::TaskAssigned(e) => format!("Task {} unassigned", e.task_id),
            StoreEvent::InventoryItemUpdated(e) if e.low_stock => format!(
                "Item {} updated ({}); low stock at {}",
                e.item_id,
                e.fields.join(", "),
                e.quantity
            ),
            StoreEvent::InventoryItemUpdated(e) => {
                format!("Item {} updated ({})", e.item_id, e.fields.join(", "))
            }
        }
    }
}

impl Event for StoreEvent {
    fn event_type(&self) -> &'static str {
        match self {
            StoreEvent::RobotUpdated(_) => "fleet.robot.updated",
            StoreEvent::TaskAdded(_) => "tasks.task.added",
            StoreEvent::TaskStatusChanged(_) => "tasks.task.status_changed",
            StoreEvent::TaskAssigned(_) => "tasks.task.assigned",
            StoreEvent::InventoryItemUpdated(_) => "inventory.item.updated",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            StoreEvent::RobotUpdated(e) => e.occurred_at,
            StoreEvent::TaskAdded(e) => e.occurred_at,
            StoreEvent::TaskStatusChanged(e) => e.occurred_at,
            StoreEvent::TaskAssigned(e) => e.occurred_at,
            StoreEvent::InventoryItemUpdated(e) => e.occurred_at,
        }
    }
}
