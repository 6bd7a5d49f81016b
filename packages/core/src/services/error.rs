//! Service Layer Error Types
//!
//! Every store and registry operation returns a result value; nothing in this
//! crate panics or retries. The presentation layer decides whether a rejection
//! becomes a toast, a blocked action, or a silent skip.

use crate::models::{TaskStatus, ValidationError, MAX_CONTAINER_DEPTH};
use thiserror::Error;

/// Tree Store operation errors
#[derive(Error, Debug)]
pub enum TreeError {
    /// Referenced id does not exist in the store
    #[error("Node not found: {id}")]
    NotFound { id: String },

    /// Insertion aimed at an id that does not exist
    #[error("Parent node not found: {parent_id}")]
    ParentNotFound { parent_id: String },

    /// Insertion aimed at a leaf
    #[error("Parent node is a leaf: {parent_id}")]
    ParentIsLeaf { parent_id: String },

    /// Inserting a container here would exceed the nesting cap
    #[error("Container depth limit {limit} exceeded under parent {parent_id}")]
    DepthExceeded { parent_id: String, limit: u8 },

    /// User-supplied name is blank after trimming
    #[error("Name is empty after trimming")]
    EmptyName,

    /// The implicit root sentinel cannot be removed or renamed
    #[error("Root node cannot be {operation}")]
    RootImmutable { operation: &'static str },

    /// Container-only mutation aimed at a leaf
    #[error("Node is not a container: {id}")]
    NotAContainer { id: String },

    /// Cycle or inconsistency detected during traversal. Should not occur
    /// under correct usage; exists as a safety net.
    #[error("Tree structure is inconsistent: {context}")]
    InvalidTree { context: String },

    /// Node failed structural validation
    #[error("Node validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

impl TreeError {
    /// Create a node not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a parent not found error
    pub fn parent_not_found(parent_id: impl Into<String>) -> Self {
        Self::ParentNotFound {
            parent_id: parent_id.into(),
        }
    }

    /// Create a parent-is-leaf error
    pub fn parent_is_leaf(parent_id: impl Into<String>) -> Self {
        Self::ParentIsLeaf {
            parent_id: parent_id.into(),
        }
    }

    /// Create a depth exceeded error against the fixed container cap
    pub fn depth_exceeded(parent_id: impl Into<String>) -> Self {
        Self::DepthExceeded {
            parent_id: parent_id.into(),
            limit: MAX_CONTAINER_DEPTH,
        }
    }

    /// Create a not-a-container error
    pub fn not_a_container(id: impl Into<String>) -> Self {
        Self::NotAContainer { id: id.into() }
    }

    /// Create an invalid tree error
    pub fn invalid_tree(context: impl Into<String>) -> Self {
        Self::InvalidTree {
            context: context.into(),
        }
    }
}

/// Task Registry operation errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Referenced task id does not exist in the registry
    #[error("Task not found: {id}")]
    NotFound { id: String },

    /// User-supplied task name is blank after trimming
    #[error("Task name is empty after trimming")]
    EmptyName,

    /// Task creation with zero selected files
    #[error("Task requires at least one source file")]
    EmptySourceSet,

    /// Transition attempted from a status that does not allow it
    #[error("Invalid state transition for task {id} in status {status}")]
    InvalidState { id: String, status: TaskStatus },
}

impl RegistryError {
    /// Create a task not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an invalid state error
    pub fn invalid_state(id: impl Into<String>, status: TaskStatus) -> Self {
        Self::InvalidState {
            id: id.into(),
            status,
        }
    }
}
