//! Fleet domain module: warehouse robots.
//!
//! Pure domain logic (no IO, no storage). The store owns the collection.

pub mod robot;

pub use robot::{BatteryLevel, Robot, RobotChanges, RobotPatch, RobotStatus};
