//! Task Registry - Build and Sync Task Lifecycle
//!
//! Creates and transitions [`Task`] records. Read-only with respect to any
//! Tree Store: source files are referenced by id only, captured as a snapshot
//! at creation time. A file deleted later stays listed on the task, and
//! looking it up in its store simply returns `NotFound`.
//!
//! No transition is retried or applied automatically; every rejection is a
//! synchronous validation outcome returned to the caller.
//!
//! # Examples
//!
//! ```rust
//! use datadesk_core::models::{ProcessingMode, TaskStatus};
//! use datadesk_core::services::{CreateBuildTaskParams, TaskRegistry};
//!
//! let mut registry = TaskRegistry::new();
//! let task = registry.create_build(CreateBuildTaskParams {
//!     name: "Finance policy build".to_string(),
//!     source_leaf_ids: vec!["file-1".to_string()],
//!     target_container_id: "kb-dir-1".to_string(),
//!     processing_mode: ProcessingMode::Unstructured,
//! })?;
//!
//! assert_eq!(registry.toggle(&task.id)?, TaskStatus::Paused);
//! assert_eq!(registry.toggle(&task.id)?, TaskStatus::Running);
//! # Ok::<(), datadesk_core::services::RegistryError>(())
//! ```

use crate::models::{ProcessingMode, SyncOrigin, Task, TaskOutcome, TaskStatus};
use crate::services::error::RegistryError;
use chrono::Utc;

/// Parameters for creating a knowledge build task
#[derive(Debug, Clone)]
pub struct CreateBuildTaskParams {
    /// User-supplied name, non-blank after trimming
    pub name: String,
    /// Selected file ids; must be non-empty, order preserved
    pub source_leaf_ids: Vec<String>,
    /// Knowledge-base directory the build deposits into
    pub target_container_id: String,
    /// Structured / unstructured / both
    pub processing_mode: ProcessingMode,
}

/// Parameters for creating a data sync task
#[derive(Debug, Clone)]
pub struct CreateSyncTaskParams {
    /// User-supplied name, non-blank after trimming
    pub name: String,
    /// File ids covered by the sync; must be non-empty
    pub source_leaf_ids: Vec<String>,
    /// Directory the sync deposits into
    pub target_container_id: String,
    /// Local upload vs connector pull
    pub origin: SyncOrigin,
}

/// Owns a collection of build/sync tasks in creation order.
///
/// Like [`TreeStore`](crate::services::TreeStore), a registry is an explicit
/// value owned by the caller; tests compose isolated instances.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    /// Creation-ordered task list; registries stay small enough that linear
    /// id scans are the simplest consistent lookup
    tasks: Vec<Task>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks, regardless of status
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Iterate tasks in creation order
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Look up a task by id
    pub fn find(&self, id: &str) -> Result<&Task, RegistryError> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or_else(|| RegistryError::not_found(id))
    }

    /// Create a build task in `Running` state.
    ///
    /// Mirrors the console's pre-submit validation: the name must survive
    /// trimming and at least one file must be selected. Duplicate ids in the
    /// selection are dropped, keeping the first occurrence.
    pub fn create_build(&mut self, params: CreateBuildTaskParams) -> Result<Task, RegistryError> {
        let name = Self::validated_name(&params.name)?;
        let sources = Self::validated_sources(params.source_leaf_ids)?;

        let task = Task::build(
            name,
            sources,
            params.target_container_id,
            params.processing_mode,
        );
        tracing::info!("Created build task {} '{}'", task.id, task.name);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Create a sync task in `Running` state with zero progress
    pub fn create_sync(&mut self, params: CreateSyncTaskParams) -> Result<Task, RegistryError> {
        let name = Self::validated_name(&params.name)?;
        let sources = Self::validated_sources(params.source_leaf_ids)?;

        let task = Task::sync(name, sources, params.target_container_id, params.origin);
        tracing::info!("Created sync task {} '{}'", task.id, task.name);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flip a build task between `Running` and `Paused`.
    ///
    /// # Errors
    ///
    /// `InvalidState` when the task is terminal or is a sync task; syncs run
    /// to completion and cannot pause.
    pub fn toggle(&mut self, id: &str) -> Result<TaskStatus, RegistryError> {
        let task = self.find_mut(id)?;
        if task.is_terminal() || !task.kind.supports_pause() {
            return Err(RegistryError::invalid_state(id, task.status));
        }

        task.status = match task.status {
            TaskStatus::Running => TaskStatus::Paused,
            TaskStatus::Paused => TaskStatus::Running,
            // Terminal variants rejected above
            status => return Err(RegistryError::invalid_state(id, status)),
        };
        tracing::debug!("Task {} toggled to {}", id, task.status);
        Ok(task.status)
    }

    /// Move a task to its terminal status and stamp `completed_at`.
    ///
    /// Terminal states are never replayed: finishing an already-finished task
    /// is rejected. A successful sync lands at 100% progress.
    pub fn finish(&mut self, id: &str, outcome: TaskOutcome) -> Result<(), RegistryError> {
        let task = self.find_mut(id)?;
        if task.is_terminal() {
            return Err(RegistryError::invalid_state(id, task.status));
        }

        task.status = outcome.into();
        task.completed_at = Some(Utc::now());
        if outcome == TaskOutcome::Succeeded {
            if let crate::models::TaskKind::Sync { progress, .. } = &mut task.kind {
                *progress = 100;
            }
        }
        tracing::info!("Task {} finished as {}", id, task.status);
        Ok(())
    }

    /// Update the progress percent of a running sync task.
    ///
    /// Values above 100 are clamped. Build tasks and terminal tasks reject
    /// with `InvalidState`.
    pub fn set_progress(&mut self, id: &str, percent: u8) -> Result<(), RegistryError> {
        let task = self.find_mut(id)?;
        if task.is_terminal() {
            return Err(RegistryError::invalid_state(id, task.status));
        }
        match &mut task.kind {
            crate::models::TaskKind::Sync { progress, .. } => {
                *progress = percent.min(100);
                Ok(())
            }
            crate::models::TaskKind::Build { .. } => {
                Err(RegistryError::invalid_state(id, task.status))
            }
        }
    }

    /// Delete a task record.
    ///
    /// Never cascades to the referenced files; the Tree Store owns those.
    pub fn remove(&mut self, id: &str) -> Result<(), RegistryError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| RegistryError::not_found(id))?;
        self.tasks.remove(index);
        tracing::debug!("Removed task {}", id);
        Ok(())
    }

    /// Tasks whose creation snapshot captured the given leaf id.
    ///
    /// Advisory: callers use this to warn before deleting a referenced file.
    /// Deletion itself is never blocked here.
    pub fn list_by_source_leaf(&self, leaf_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.references_leaf(leaf_id))
            .collect()
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Task, RegistryError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| RegistryError::not_found(id))
    }

    fn validated_name(name: &str) -> Result<String, RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        Ok(name.to_string())
    }

    fn validated_sources(source_leaf_ids: Vec<String>) -> Result<Vec<String>, RegistryError> {
        if source_leaf_ids.is_empty() {
            return Err(RegistryError::EmptySourceSet);
        }
        let mut seen = std::collections::HashSet::new();
        Ok(source_leaf_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect())
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "task_registry_test.rs"]
mod task_registry_test;
