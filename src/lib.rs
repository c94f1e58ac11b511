//! # task-tracker
//!
//! A personal task tracker built around a small CRUD contract.
//!
//! ## Overview
//!
//! - **Domain**: the `Task` record and its partial update
//! - **Infrastructure**: the task store (in-memory or `PostgreSQL` JSONB
//!   documents), the factory that selects one at startup, and server
//!   configuration
//! - **API**: axum handlers, DTOs, validation, and the task service
//! - **Client**: the HTTP client adapter with cookie-backed credentials
//! - **View**: headless task list state that refetches after every mutation
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use task_tracker::api::{AppState, create_router};
//! use task_tracker::infrastructure::InMemoryTaskRepository;
//!
//! let router = create_router(AppState::new(Arc::new(InMemoryTaskRepository::new())));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod client;
pub mod domain;
pub mod infrastructure;
pub mod view;
