//! Data Models
//!
//! This module contains the core data structures used throughout DataDesk:
//!
//! - `Node` - one entity in a forest, container (directory / knowledge base)
//!   or leaf (file)
//! - `Task` - build / sync task record referencing leaves by id
//!
//! All attribute sets that the console renders as free-form strings are
//! modeled here as closed enums; unrecognized values are rejected when parsed.

mod node;
mod task;

pub use node::{
    ContainerAttrs, ContainerStatus, LeafAttrs, Node, NodePayload, SourceKind, ValidationError,
    MAX_CONTAINER_DEPTH, ROOT_NAME,
};
pub use task::{ProcessingMode, SyncOrigin, Task, TaskKind, TaskOutcome, TaskStatus};
