//! Task domain module: pick/move jobs and their lifecycle.

pub mod task;

pub use task::{NewTask, Priority, Task, TaskStatus};
