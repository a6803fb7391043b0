//! `robodepot-store`: the in-memory domain store behind the dashboard.
//!
//! **Responsibility:** single source of truth for robots, tasks and inventory.
//!
//! This crate provides:
//! - `DomainStore`: typed mutations + derived reads over three ordered collections
//! - change notification through `robodepot-events` (one envelope per effective write)
//! - seed loading, list queries with pagination, summary statistics
//! - an activity feed projection for the dashboard

pub mod activity;
pub mod event;
pub mod query;
pub mod seed;
pub mod store;
pub mod summary;

pub use activity::{ActivityEntry, ActivityFeed};
pub use event::{
    InventoryItemUpdated, RobotUpdated, StoreEnvelope, StoreEvent, TaskAdded, TaskAssigned,
    TaskStatusChanged,
};
pub use query::{ItemQuery, Page, PageRequest, RobotQuery, TaskQuery};
pub use seed::{Seed, SeedError};
pub use store::DomainStore;
pub use summary::{CategoryBreakdown, DashboardSummary, InventoryStats, RobotStats, TaskStats};
