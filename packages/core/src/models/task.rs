//! Build and Sync Task Records
//!
//! Tasks reference Tree Store leaves by id only (weak references): deleting a
//! file never blocks on, and is never cleaned up by, the tasks that captured
//! it. The id list is a snapshot taken when the task is created.
//!
//! Two kinds share one record:
//!
//! - **Build tasks** turn selected files into knowledge-base content and can
//!   be paused and resumed while running
//! - **Sync tasks** pull files in from an upload or a connector, carry a
//!   progress percentage, and cannot be paused
//!
//! # Examples
//!
//! ```rust
//! use datadesk_core::models::{ProcessingMode, Task, TaskKind, TaskStatus};
//!
//! let task = Task::build(
//!     "Finance policy build".to_string(),
//!     vec!["file-1".to_string()],
//!     "kb-dir-1".to_string(),
//!     ProcessingMode::Unstructured,
//! );
//!
//! assert_eq!(task.status, TaskStatus::Running);
//! assert!(task.kind.supports_pause());
//! assert!(task.completed_at.is_none());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Task lifecycle status.
///
/// Build tasks use all four variants; sync tasks never enter `Paused`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Running,
    Paused,
    Succeeded,
    Failed,
}

impl TaskStatus {
    /// Terminal statuses are never replayed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "paused" => Ok(Self::Paused),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            // Legacy spelling used by the first console release
            "success" => Ok(Self::Succeeded),
            _ => Err(format!("Invalid task status: {}", s)),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome passed to a terminal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Succeeded,
    Failed,
}

impl From<TaskOutcome> for TaskStatus {
    fn from(outcome: TaskOutcome) -> Self {
        match outcome {
            TaskOutcome::Succeeded => TaskStatus::Succeeded,
            TaskOutcome::Failed => TaskStatus::Failed,
        }
    }
}

/// How a build task processes its source files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Structured,
    Unstructured,
    Both,
}

impl FromStr for ProcessingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structured" => Ok(Self::Structured),
            "unstructured" => Ok(Self::Unstructured),
            "both" => Ok(Self::Both),
            _ => Err(format!("Invalid processing mode: {}", s)),
        }
    }
}

impl std::fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structured => write!(f, "structured"),
            Self::Unstructured => write!(f, "unstructured"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Where a sync task pulls its files from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SyncOrigin {
    /// Files uploaded directly through the console
    LocalUpload,
    /// Files pulled from a configured connector
    #[serde(rename_all = "camelCase")]
    Connector { connector_id: String },
}

/// Kind-specific task attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TaskKind {
    /// Knowledge build over selected files
    #[serde(rename_all = "camelCase")]
    Build { processing_mode: ProcessingMode },
    /// Data sync from an upload or connector
    #[serde(rename_all = "camelCase")]
    Sync {
        origin: SyncOrigin,
        /// Percent complete, 0..=100
        progress: u8,
    },
}

impl TaskKind {
    /// Only build tasks can toggle between running and paused
    pub fn supports_pause(&self) -> bool {
        matches!(self, Self::Build { .. })
    }

    pub fn is_sync(&self) -> bool {
        matches!(self, Self::Sync { .. })
    }
}

/// A build or sync task record.
///
/// `source_leaf_ids` is an ordered, de-duplicated snapshot of the leaf ids the
/// user selected at creation time. The referenced leaves may be deleted later;
/// the list is never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier within the owning registry
    pub id: String,

    /// User-supplied display name, non-blank
    pub name: String,

    /// Build vs sync attributes
    pub kind: TaskKind,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Set exactly once, on the terminal transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Snapshot of selected leaf ids, insertion order preserved
    pub source_leaf_ids: Vec<String>,

    /// Container the task deposits results into
    pub target_container_id: String,
}

impl Task {
    /// Create a build task in `Running` state.
    ///
    /// Input validation (non-blank name, non-empty sources) lives in the
    /// registry; this constructor only assembles the record.
    pub fn build(
        name: String,
        source_leaf_ids: Vec<String>,
        target_container_id: String,
        processing_mode: ProcessingMode,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            kind: TaskKind::Build { processing_mode },
            status: TaskStatus::Running,
            created_at: Utc::now(),
            completed_at: None,
            source_leaf_ids,
            target_container_id,
        }
    }

    /// Create a sync task in `Running` state with zero progress
    pub fn sync(
        name: String,
        source_leaf_ids: Vec<String>,
        target_container_id: String,
        origin: SyncOrigin,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            kind: TaskKind::Sync {
                origin,
                progress: 0,
            },
            status: TaskStatus::Running,
            created_at: Utc::now(),
            completed_at: None,
            source_leaf_ids,
            target_container_id,
        }
    }

    /// `true` once the task reached `Succeeded` or `Failed`
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Sync progress percent, `None` for build tasks
    pub fn progress(&self) -> Option<u8> {
        match &self.kind {
            TaskKind::Sync { progress, .. } => Some(*progress),
            TaskKind::Build { .. } => None,
        }
    }

    /// Processing mode, `None` for sync tasks
    pub fn processing_mode(&self) -> Option<ProcessingMode> {
        match &self.kind {
            TaskKind::Build { processing_mode } => Some(*processing_mode),
            TaskKind::Sync { .. } => None,
        }
    }

    /// Whether this task captured the given leaf id at creation
    pub fn references_leaf(&self, leaf_id: &str) -> bool {
        self.source_leaf_ids.iter().any(|id| id == leaf_id)
    }
}
