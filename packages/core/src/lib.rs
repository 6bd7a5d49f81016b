//! DataDesk Core Business Logic Layer
//!
//! This crate provides the data model and service layer for the DataDesk
//! administrative console: a chat-style front-end over data sources, file
//! directories, knowledge bases, and build tasks.
//!
//! # Architecture
//!
//! - **One generic forest**: file directories, knowledge-base trees, and
//!   connector source directories are three instances of the same
//!   [`services::TreeStore`]
//! - **Weak task references**: [`services::TaskRegistry`] snapshots leaf ids
//!   at task creation and never owns or cleans up nodes
//! - **Pure projections**: [`services::projection`] derives display trees and
//!   breadcrumbs from a store snapshot on every read
//! - **Synchronous core**: every operation completes before returning; callers
//!   needing shared mutation across threads wrap a store in their own lock
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, Task, and their attribute enums)
//! - [`services`] - Business services (TreeStore, TaskRegistry, projections)

pub mod models;
pub mod services;

// Re-export commonly used types
pub use models::*;
pub use services::*;
