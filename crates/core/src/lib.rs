//! `robodepot-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives shared by the fleet, task and
//! inventory modules (no IO, no storage).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, EntityKind};
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, RobotId, TaskId};
