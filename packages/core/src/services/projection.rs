//! View Projection - Presentation-Ready Snapshots
//!
//! Pure, side-effect-free functions over a [`TreeStore`] snapshot. Projections
//! are re-derived on every read; nothing here caches, so there is no
//! invalidation to manage.

use crate::models::{ContainerStatus, NodePayload, Task, MAX_CONTAINER_DEPTH};
use crate::services::error::TreeError;
use crate::services::tree_store::TreeStore;
use serde::Serialize;

/// Separator used when joining path segments for display
pub const PATH_SEPARATOR: &str = "/";

/// Icon tag the presentation layer maps to its own glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeIcon {
    Folder,
    File,
}

/// One node of the presentation-ready nested structure
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayNode {
    pub id: String,
    pub label: String,
    pub icon: NodeIcon,

    /// Container build status, if one is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ContainerStatus>,

    /// Containers only: explicit override when present, else the recursively
    /// summed descendant leaf count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,

    pub children: Vec<DisplayNode>,
}

/// Files of one directory referenced by a task, used by the file-usage viewer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileGroup {
    /// Full display path of the owning directory
    pub directory_path: String,
    pub files: Vec<FileRef>,
}

/// Lightweight file reference inside a [`FileGroup`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub id: String,
    pub name: String,
    pub file_type: String,
}

/// Project the whole forest into a nested display structure rooted at the
/// store's root sentinel.
///
/// # Examples
///
/// ```rust
/// use datadesk_core::services::{projection, TreeStore};
///
/// let mut store = TreeStore::new();
/// let root_id = store.root_id().to_string();
/// store.add_container(&root_id, "Finance")?;
///
/// let tree = projection::to_display_tree(&store)?;
/// assert_eq!(tree.label, "root");
/// assert_eq!(tree.children[0].label, "Finance");
/// # Ok::<(), datadesk_core::services::TreeError>(())
/// ```
pub fn to_display_tree(store: &TreeStore) -> Result<DisplayNode, TreeError> {
    project_node(store, store.root_id(), 0)
}

/// Breadcrumb string for a node, `root/...` joined with [`PATH_SEPARATOR`]
pub fn breadcrumb(store: &TreeStore, id: &str) -> Result<String, TreeError> {
    Ok(store.path_of(id)?.join(PATH_SEPARATOR))
}

/// Group a task's surviving source files by owning directory.
///
/// Dangling leaf ids (files deleted after the task snapshot was taken) are
/// skipped, never an error. Group order follows the first appearance of each
/// directory in the snapshot.
pub fn task_file_groups(store: &TreeStore, task: &Task) -> Result<Vec<FileGroup>, TreeError> {
    let mut groups: Vec<(String, FileGroup)> = Vec::new();

    for leaf_id in &task.source_leaf_ids {
        let node = match store.find(leaf_id) {
            Ok(node) => node,
            Err(TreeError::NotFound { .. }) => continue,
            Err(err) => return Err(err),
        };
        let attrs = match node.leaf_attrs() {
            Some(attrs) => attrs,
            // A container id in a source snapshot has no file row to show
            None => continue,
        };
        let parent_id = match node.parent_id.as_deref() {
            Some(parent_id) => parent_id,
            None => continue,
        };

        let file = FileRef {
            id: node.id.clone(),
            name: node.name.clone(),
            file_type: attrs.file_type.clone(),
        };
        match groups.iter_mut().find(|(dir, _)| dir == parent_id) {
            Some((_, group)) => group.files.push(file),
            None => {
                let directory_path = breadcrumb(store, parent_id)?;
                groups.push((
                    parent_id.to_string(),
                    FileGroup {
                        directory_path,
                        files: vec![file],
                    },
                ));
            }
        }
    }

    Ok(groups.into_iter().map(|(_, group)| group).collect())
}

fn project_node(store: &TreeStore, id: &str, hops: usize) -> Result<DisplayNode, TreeError> {
    if hops > MAX_CONTAINER_DEPTH as usize + 1 {
        return Err(TreeError::invalid_tree(format!(
            "display projection descended past {} levels at {}",
            hops, id
        )));
    }

    let node = store.find(id)?;
    match &node.payload {
        NodePayload::Container(attrs) => {
            let mut children = Vec::with_capacity(node.children.len());
            for child in store.children_of(id)? {
                children.push(project_node(store, &child.id, hops + 1)?);
            }
            let file_count = match attrs.file_count {
                Some(explicit) => explicit,
                None => derived_leaf_count(&children),
            };
            Ok(DisplayNode {
                id: node.id.clone(),
                label: node.name.clone(),
                icon: NodeIcon::Folder,
                status: attrs.status,
                file_count: Some(file_count),
                children,
            })
        }
        NodePayload::Leaf(_) => Ok(DisplayNode {
            id: node.id.clone(),
            label: node.name.clone(),
            icon: NodeIcon::File,
            status: None,
            file_count: None,
            children: Vec::new(),
        }),
    }
}

/// Leaves directly or transitively under already-projected children
fn derived_leaf_count(children: &[DisplayNode]) -> usize {
    children
        .iter()
        .map(|child| match child.icon {
            NodeIcon::File => 1,
            // Child containers have their own count resolved already,
            // explicit overrides included
            NodeIcon::Folder => child.file_count.unwrap_or(0),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;
    use crate::services::task_registry::{CreateBuildTaskParams, TaskRegistry};
    use crate::services::tree_store::CreateLeafParams;
    use crate::models::ProcessingMode;

    fn pdf_params(name: &str) -> CreateLeafParams {
        CreateLeafParams {
            name: name.to_string(),
            file_type: "pdf".to_string(),
            size_bytes: 1000,
            source: SourceKind::Uploaded,
        }
    }

    #[test]
    fn display_tree_mirrors_structure_and_counts() {
        let mut store = TreeStore::new();
        let root_id = store.root_id().to_string();
        let finance = store.add_container(&root_id, "Finance").unwrap();
        let policies = store.add_container(&finance.id, "Policies").unwrap();
        store.add_leaf(&finance.id, pdf_params("a.pdf")).unwrap();
        store.add_leaf(&policies.id, pdf_params("b.pdf")).unwrap();

        let tree = to_display_tree(&store).unwrap();
        assert_eq!(tree.label, "root");
        assert_eq!(tree.icon, NodeIcon::Folder);
        assert_eq!(tree.file_count, Some(2));

        let finance_node = &tree.children[0];
        assert_eq!(finance_node.label, "Finance");
        assert_eq!(finance_node.file_count, Some(2));

        let policies_node = &finance_node.children[0];
        assert_eq!(policies_node.file_count, Some(1));

        let leaf = &finance_node.children[1];
        assert_eq!(leaf.icon, NodeIcon::File);
        assert_eq!(leaf.file_count, None);
    }

    #[test]
    fn explicit_file_count_wins_over_derived() {
        let mut store = TreeStore::new();
        let root_id = store.root_id().to_string();
        let kb = store.add_container(&root_id, "Finance KB").unwrap();
        store.add_leaf(&kb.id, pdf_params("a.pdf")).unwrap();
        store
            .update_container(&kb.id, |attrs| attrs.file_count = Some(7))
            .unwrap();

        let tree = to_display_tree(&store).unwrap();
        assert_eq!(tree.children[0].file_count, Some(7));
        // The parent rolls up the override, not the raw leaf count
        assert_eq!(tree.file_count, Some(7));
    }

    #[test]
    fn status_is_projected_for_containers() {
        let mut store = TreeStore::new();
        let root_id = store.root_id().to_string();
        let kb = store.add_container(&root_id, "Test KB").unwrap();
        store
            .update_container(&kb.id, |attrs| {
                attrs.status = Some(ContainerStatus::Building)
            })
            .unwrap();

        let tree = to_display_tree(&store).unwrap();
        assert_eq!(tree.children[0].status, Some(ContainerStatus::Building));
    }

    #[test]
    fn breadcrumb_joins_path_segments() {
        let mut store = TreeStore::new();
        let root_id = store.root_id().to_string();
        let finance = store.add_container(&root_id, "Finance").unwrap();
        let policies = store.add_container(&finance.id, "Policies").unwrap();

        assert_eq!(
            breadcrumb(&store, &policies.id).unwrap(),
            "root/Finance/Policies"
        );
        assert_eq!(breadcrumb(&store, &root_id).unwrap(), "root");
    }

    #[test]
    fn projection_is_deterministic_for_an_unmodified_store() {
        let mut store = TreeStore::new();
        let root_id = store.root_id().to_string();
        let dir = store.add_container(&root_id, "Docs").unwrap();
        store.add_leaf(&dir.id, pdf_params("a.pdf")).unwrap();

        assert_eq!(to_display_tree(&store).unwrap(), to_display_tree(&store).unwrap());
        assert_eq!(
            breadcrumb(&store, &dir.id).unwrap(),
            breadcrumb(&store, &dir.id).unwrap()
        );
    }

    #[test]
    fn task_file_groups_skip_dangling_ids() {
        let mut store = TreeStore::new();
        let root_id = store.root_id().to_string();
        let dir_a = store.add_container(&root_id, "Finance").unwrap();
        let dir_b = store.add_container(&root_id, "Product").unwrap();
        let f1 = store.add_leaf(&dir_a.id, pdf_params("a.pdf")).unwrap();
        let f2 = store.add_leaf(&dir_b.id, pdf_params("b.pdf")).unwrap();
        let f3 = store.add_leaf(&dir_a.id, pdf_params("c.pdf")).unwrap();

        let mut registry = TaskRegistry::new();
        let task = registry
            .create_build(CreateBuildTaskParams {
                name: "Build1".to_string(),
                source_leaf_ids: vec![f1.id.clone(), f2.id.clone(), f3.id.clone()],
                target_container_id: dir_a.id.clone(),
                processing_mode: ProcessingMode::Both,
            })
            .unwrap();

        // Delete one referenced file; the task snapshot is untouched
        store.remove(&f2.id).unwrap();

        let groups = task_file_groups(&store, &task).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].directory_path, "root/Finance");
        let names: Vec<&str> = groups[0].files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "c.pdf"]);
    }
}
