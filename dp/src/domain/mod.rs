//! Domain types for the planner
//!
//! Core types: Task, TaskId, PriorityLabel.
//! A task lives either in the Agenda (it has a scheduled start) or in the
//! Backlog (it does not); the planner enforces that split.

mod id;
mod priority;
mod task;

pub use id::TaskId;
pub use priority::{Badge, PriorityLabel};
pub use task::{NewTask, Schedule, Task, DEADLINE_FORMAT};
