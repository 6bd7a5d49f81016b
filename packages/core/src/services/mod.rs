//! Business Services
//!
//! This module contains the core business logic services:
//!
//! - `TreeStore` - forest ownership and structural operations over nodes
//! - `TaskRegistry` - build/sync task creation and status lifecycle
//! - `projection` - pure presentation-ready views over a store snapshot
//!
//! Services are plain values owned by the caller. The presentation layer
//! composes one store per tree (file directories, knowledge bases, connector
//! sources) alongside a registry, and re-renders from projections after each
//! mutation.

pub mod error;
pub mod projection;
pub mod task_registry;
pub mod tree_store;

pub use error::{RegistryError, TreeError};
pub use projection::{DisplayNode, FileGroup, FileRef, NodeIcon, PATH_SEPARATOR};
pub use task_registry::{CreateBuildTaskParams, CreateSyncTaskParams, TaskRegistry};
pub use tree_store::{CreateLeafParams, TreeStore};
