//! Domain module for task tracking.
//!
//! This module contains the task model and its value objects.

pub mod task;

pub use task::{Task, TaskId, TaskPatch, Timestamp};
