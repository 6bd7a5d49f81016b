//! Tests for task creation validation and the status lifecycle

use crate::models::{ProcessingMode, SyncOrigin, TaskOutcome, TaskStatus};
use crate::services::error::RegistryError;
use crate::services::task_registry::{CreateBuildTaskParams, CreateSyncTaskParams, TaskRegistry};

fn build_params(name: &str, sources: &[&str]) -> CreateBuildTaskParams {
    CreateBuildTaskParams {
        name: name.to_string(),
        source_leaf_ids: sources.iter().map(|s| s.to_string()).collect(),
        target_container_id: "kb-dir-1".to_string(),
        processing_mode: ProcessingMode::Unstructured,
    }
}

fn sync_params(name: &str, sources: &[&str]) -> CreateSyncTaskParams {
    CreateSyncTaskParams {
        name: name.to_string(),
        source_leaf_ids: sources.iter().map(|s| s.to_string()).collect(),
        target_container_id: "dir-1".to_string(),
        origin: SyncOrigin::Connector {
            connector_id: "ds1".to_string(),
        },
    }
}

#[test]
fn create_build_task_starts_running() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_build(build_params("Build1", &["leaf-a"]))
        .unwrap();

    assert_eq!(task.status, TaskStatus::Running);
    assert_eq!(task.source_leaf_ids, vec!["leaf-a"]);
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.find(&task.id).unwrap().name, "Build1");
}

#[test]
fn empty_name_never_creates_a_task() {
    let mut registry = TaskRegistry::new();
    assert!(matches!(
        registry.create_build(build_params("", &["leaf-a"])),
        Err(RegistryError::EmptyName)
    ));
    assert!(matches!(
        registry.create_build(build_params("   ", &["leaf-a"])),
        Err(RegistryError::EmptyName)
    ));
    assert!(matches!(
        registry.create_sync(sync_params("  ", &["leaf-a"])),
        Err(RegistryError::EmptyName)
    ));
    assert!(registry.is_empty());
}

#[test]
fn empty_source_set_never_creates_a_task() {
    let mut registry = TaskRegistry::new();
    assert!(matches!(
        registry.create_build(build_params("Build1", &[])),
        Err(RegistryError::EmptySourceSet)
    ));
    assert!(matches!(
        registry.create_sync(sync_params("Sync1", &[])),
        Err(RegistryError::EmptySourceSet)
    ));
    assert!(registry.is_empty());
}

#[test]
fn task_name_is_trimmed() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_build(build_params("  Build1  ", &["leaf-a"]))
        .unwrap();
    assert_eq!(task.name, "Build1");
}

#[test]
fn duplicate_source_ids_keep_first_occurrence() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_build(build_params("Build1", &["a", "b", "a", "c", "b"]))
        .unwrap();
    assert_eq!(task.source_leaf_ids, vec!["a", "b", "c"]);
}

#[test]
fn toggle_flips_running_and_paused() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_build(build_params("Build1", &["leaf-a"]))
        .unwrap();

    assert_eq!(registry.toggle(&task.id).unwrap(), TaskStatus::Paused);
    assert_eq!(registry.toggle(&task.id).unwrap(), TaskStatus::Running);
}

#[test]
fn toggle_rejects_terminal_tasks() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_build(build_params("Build1", &["leaf-a"]))
        .unwrap();
    registry.finish(&task.id, TaskOutcome::Succeeded).unwrap();

    assert!(matches!(
        registry.toggle(&task.id),
        Err(RegistryError::InvalidState {
            status: TaskStatus::Succeeded,
            ..
        })
    ));
}

#[test]
fn toggle_rejects_sync_tasks() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_sync(sync_params("Sync1", &["leaf-a"]))
        .unwrap();

    assert!(matches!(
        registry.toggle(&task.id),
        Err(RegistryError::InvalidState { .. })
    ));
}

#[test]
fn finish_stamps_completion_and_is_not_replayable() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_build(build_params("Build1", &["leaf-a"]))
        .unwrap();

    registry.finish(&task.id, TaskOutcome::Failed).unwrap();
    let finished = registry.find(&task.id).unwrap();
    assert_eq!(finished.status, TaskStatus::Failed);
    assert!(finished.completed_at.is_some());

    assert!(matches!(
        registry.finish(&task.id, TaskOutcome::Succeeded),
        Err(RegistryError::InvalidState { .. })
    ));
}

#[test]
fn finish_from_paused_is_allowed() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_build(build_params("Build1", &["leaf-a"]))
        .unwrap();
    registry.toggle(&task.id).unwrap();

    registry.finish(&task.id, TaskOutcome::Succeeded).unwrap();
    assert_eq!(
        registry.find(&task.id).unwrap().status,
        TaskStatus::Succeeded
    );
}

#[test]
fn successful_sync_lands_at_full_progress() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_sync(sync_params("Sync1", &["leaf-a"]))
        .unwrap();

    registry.set_progress(&task.id, 65).unwrap();
    assert_eq!(registry.find(&task.id).unwrap().progress(), Some(65));

    registry.finish(&task.id, TaskOutcome::Succeeded).unwrap();
    assert_eq!(registry.find(&task.id).unwrap().progress(), Some(100));
}

#[test]
fn set_progress_clamps_and_rejects_build_tasks() {
    let mut registry = TaskRegistry::new();
    let sync = registry
        .create_sync(sync_params("Sync1", &["leaf-a"]))
        .unwrap();
    let build = registry
        .create_build(build_params("Build1", &["leaf-a"]))
        .unwrap();

    registry.set_progress(&sync.id, 250).unwrap();
    assert_eq!(registry.find(&sync.id).unwrap().progress(), Some(100));

    assert!(matches!(
        registry.set_progress(&build.id, 10),
        Err(RegistryError::InvalidState { .. })
    ));
}

#[test]
fn remove_deletes_the_record_only() {
    let mut registry = TaskRegistry::new();
    let task = registry
        .create_build(build_params("Build1", &["leaf-a"]))
        .unwrap();

    registry.remove(&task.id).unwrap();
    assert!(registry.is_empty());
    assert!(matches!(
        registry.remove(&task.id),
        Err(RegistryError::NotFound { .. })
    ));
}

#[test]
fn list_by_source_leaf_matches_snapshots() {
    let mut registry = TaskRegistry::new();
    let t1 = registry
        .create_build(build_params("Build1", &["leaf-a", "leaf-b"]))
        .unwrap();
    registry
        .create_build(build_params("Build2", &["leaf-c"]))
        .unwrap();
    let t3 = registry
        .create_sync(sync_params("Sync1", &["leaf-a"]))
        .unwrap();

    let referencing: Vec<&str> = registry
        .list_by_source_leaf("leaf-a")
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(referencing, vec![t1.id.as_str(), t3.id.as_str()]);
    assert!(registry.list_by_source_leaf("leaf-z").is_empty());
}

#[test]
fn tasks_iterate_in_creation_order() {
    let mut registry = TaskRegistry::new();
    registry
        .create_build(build_params("first", &["a"]))
        .unwrap();
    registry
        .create_sync(sync_params("second", &["b"]))
        .unwrap();
    registry
        .create_build(build_params("third", &["c"]))
        .unwrap();

    let names: Vec<&str> = registry.tasks().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}
