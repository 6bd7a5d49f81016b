//! Node Data Structures
//!
//! This module defines the core `Node` struct shared by every tree the console
//! manages: file directories, knowledge-base trees, and connector source
//! directories are all forests of the same node type.
//!
//! # Architecture
//!
//! - **One node type**: containers (directories / knowledge bases) and leaves
//!   (files) are a closed tagged payload on a single struct
//! - **Shallow forests**: container nesting is capped at depth 3; leaves hang
//!   off a container and may therefore sit at depth 4
//! - **Typed attributes**: statuses and file sources are enums that reject
//!   unrecognized strings at the boundary
//!
//! # Examples
//!
//! ```rust
//! use datadesk_core::models::{LeafAttrs, Node, SourceKind};
//!
//! let root = Node::root();
//! let finance = Node::container("Finance".to_string(), root.id.clone(), 1);
//! let report = Node::leaf(
//!     "report.pdf".to_string(),
//!     finance.id.clone(),
//!     2,
//!     LeafAttrs::new("pdf".to_string(), 2_048_000, SourceKind::Uploaded),
//! );
//!
//! assert!(finance.is_container());
//! assert!(report.is_leaf());
//! assert!(report.validate().is_ok());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Maximum nesting depth for containers.
///
/// The root sentinel sits at depth 0, so a forest holds at most three levels
/// of user-visible containers. Leaves attach to any container and may sit one
/// level deeper.
pub const MAX_CONTAINER_DEPTH: u8 = 3;

/// Fixed display name of the implicit root sentinel.
pub const ROOT_NAME: &str = "root";

/// Validation errors for Node structure
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),

    #[error("Invalid depth: {0}")]
    InvalidDepth(String),

    #[error("Leaf node cannot have children: {0}")]
    LeafWithChildren(String),
}

/// Build status of a container, shown next to knowledge bases in the console.
///
/// Cosmetic only; never consulted for authorization or structural decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    Available,
    Building,
    Failed,
}

impl FromStr for ContainerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "building" => Ok(Self::Building),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Invalid container status: {}", s)),
        }
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Building => write!(f, "building"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Where a leaf (file) came from.
///
/// The connector id is part of the `Synced` variant, so "origin connector is
/// present iff the file was synced" holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SourceKind {
    /// Manually uploaded through the console
    Uploaded,
    /// Pulled from a connector (document store, object storage, database, ...)
    #[serde(rename_all = "camelCase")]
    Synced { connector_id: String },
}

impl SourceKind {
    /// Connector id for synced files, `None` for uploads
    pub fn connector_id(&self) -> Option<&str> {
        match self {
            Self::Uploaded => None,
            Self::Synced { connector_id } => Some(connector_id),
        }
    }
}

/// Container-only attributes (knowledge bases and directories)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerAttrs {
    /// Optional build status shown in the tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContainerStatus>,

    /// Explicit file count. When present, projections prefer it over the
    /// recursively derived descendant count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,

    /// Ids of database connections associated with this container.
    /// Carried as opaque references; resolution happens elsewhere.
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub database_connections: Vec<String>,
}

/// Leaf-only attributes (files)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafAttrs {
    /// Extension tag, e.g. "pdf", "docx", "xlsx"
    pub file_type: String,

    /// File size in bytes
    pub size_bytes: u64,

    /// Upload vs connector sync
    pub source: SourceKind,

    /// When the file entered the platform
    pub uploaded_at: DateTime<Utc>,
}

impl LeafAttrs {
    /// Create leaf attributes stamped with the current time
    pub fn new(file_type: String, size_bytes: u64, source: SourceKind) -> Self {
        Self {
            file_type,
            size_bytes,
            source,
            uploaded_at: Utc::now(),
        }
    }
}

/// Closed payload discriminating containers from leaves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodePayload {
    Container(ContainerAttrs),
    Leaf(LeafAttrs),
}

/// A single entity in a forest: a container (knowledge base / directory) or a
/// leaf (file).
///
/// # Fields
///
/// - `id`: unique identifier within one store (UUID string)
/// - `name`: display label, mutable via rename
/// - `parent_id`: owning container, `None` only for the implicit root
/// - `depth`: 0 for the root, +1 per nesting level
/// - `children`: ordered child ids; insertion order is meaningful for display
/// - `payload`: container or leaf attributes
///
/// # Examples
///
/// ```rust
/// # use datadesk_core::models::Node;
/// let root = Node::root();
/// assert_eq!(root.depth, 0);
/// assert_eq!(root.name, "root");
/// assert!(root.parent_id.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier within the owning store
    pub id: String,

    /// Display label
    pub name: String,

    /// Owning container, `None` only for the implicit root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// 0 for the root, 1 for top-level containers, and so on
    pub depth: u8,

    /// Ordered child ids (containers only; always empty for leaves)
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,

    /// Container or leaf attributes
    pub payload: NodePayload,
}

impl Node {
    /// Create the implicit root sentinel of a forest
    pub fn root() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: ROOT_NAME.to_string(),
            parent_id: None,
            depth: 0,
            children: Vec::new(),
            created_at: now,
            modified_at: now,
            payload: NodePayload::Container(ContainerAttrs::default()),
        }
    }

    /// Create a container with auto-generated UUID
    pub fn container(name: String, parent_id: String, depth: u8) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            parent_id: Some(parent_id),
            depth,
            children: Vec::new(),
            created_at: now,
            modified_at: now,
            payload: NodePayload::Container(ContainerAttrs::default()),
        }
    }

    /// Create a leaf with auto-generated UUID
    pub fn leaf(name: String, parent_id: String, depth: u8, attrs: LeafAttrs) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            parent_id: Some(parent_id),
            depth,
            children: Vec::new(),
            created_at: now,
            modified_at: now,
            payload: NodePayload::Leaf(attrs),
        }
    }

    /// `true` for containers (the root included)
    pub fn is_container(&self) -> bool {
        matches!(self.payload, NodePayload::Container(_))
    }

    /// `true` for leaves
    pub fn is_leaf(&self) -> bool {
        matches!(self.payload, NodePayload::Leaf(_))
    }

    /// `true` for the implicit root sentinel
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Container attributes, `None` for leaves
    pub fn container_attrs(&self) -> Option<&ContainerAttrs> {
        match &self.payload {
            NodePayload::Container(attrs) => Some(attrs),
            NodePayload::Leaf(_) => None,
        }
    }

    /// Leaf attributes, `None` for containers
    pub fn leaf_attrs(&self) -> Option<&LeafAttrs> {
        match &self.payload {
            NodePayload::Container(_) => None,
            NodePayload::Leaf(attrs) => Some(attrs),
        }
    }

    /// Validate node structure and required fields
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if:
    /// - `id` or `name` is empty
    /// - the node references itself as parent
    /// - a non-root node has no parent, or the root claims a depth
    /// - the depth exceeds the container cap (leaves get one extra level)
    /// - a leaf carries children
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::MissingField("id".to_string()));
        }

        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }

        if self.parent_id.as_deref() == Some(self.id.as_str()) {
            return Err(ValidationError::InvalidParent(format!(
                "node {} is its own parent",
                self.id
            )));
        }

        match (&self.parent_id, self.depth) {
            (None, 0) => {}
            (None, d) => {
                return Err(ValidationError::InvalidDepth(format!(
                    "root node {} has depth {}",
                    self.id, d
                )));
            }
            (Some(_), 0) => {
                return Err(ValidationError::InvalidDepth(format!(
                    "non-root node {} has depth 0",
                    self.id
                )));
            }
            (Some(_), _) => {}
        }

        let max_depth = if self.is_leaf() {
            MAX_CONTAINER_DEPTH + 1
        } else {
            MAX_CONTAINER_DEPTH
        };
        if self.depth > max_depth {
            return Err(ValidationError::InvalidDepth(format!(
                "node {} at depth {} exceeds limit {}",
                self.id, self.depth, max_depth
            )));
        }

        if self.is_leaf() && !self.children.is_empty() {
            return Err(ValidationError::LeafWithChildren(self.id.clone()));
        }

        Ok(())
    }
}
