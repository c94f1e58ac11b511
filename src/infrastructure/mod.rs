//! Infrastructure module for external services.
//!
//! This module contains the task store backends, the factory that selects
//! one at startup, and environment-driven server configuration.

pub mod config;
pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod repository;

pub use config::{ServerConfig, ServerConfigError, WorkerThreads};
pub use factory::{
    ConfigurationError, FactoryError, RepositoryConfig, RepositoryConfigBuilder, RepositoryFactory,
    StorageMode,
};
pub use in_memory::InMemoryTaskRepository;
pub use postgres::{PostgresTaskRepository, ensure_schema};
pub use repository::{RepositoryError, RepositoryResult, TaskRepository};
