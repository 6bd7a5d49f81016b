//! Tree Store - Forest Ownership and Structural Operations
//!
//! One `TreeStore` owns one forest of [`Node`]s rooted at an implicit root
//! sentinel. The console instantiates three of them with identical semantics:
//! file directories, knowledge-base trees, and connector source directories.
//!
//! The store exclusively owns node lifecycle (create, rename, delete). Task
//! records hold leaf ids only; nothing here knows about tasks, and removing a
//! leaf never reaches into a registry.
//!
//! # Traversal safety
//!
//! The id graph is acyclic by construction, but recursive walks still bound
//! themselves by the depth cap and a visited set. A corrupted structure
//! surfaces as [`TreeError::InvalidTree`] instead of a hang.
//!
//! # Examples
//!
//! ```rust
//! use datadesk_core::services::TreeStore;
//!
//! let mut store = TreeStore::new();
//! let root_id = store.root_id().to_string();
//!
//! let finance = store.add_container(&root_id, "Finance")?;
//! let policies = store.add_container(&finance.id, "Policies")?;
//!
//! assert_eq!(store.path_of(&policies.id)?, vec!["root", "Finance", "Policies"]);
//! # Ok::<(), datadesk_core::services::TreeError>(())
//! ```

use crate::models::{LeafAttrs, Node, SourceKind, MAX_CONTAINER_DEPTH};
use crate::services::error::TreeError;
use std::collections::{HashMap, HashSet};

/// Parameters for creating a leaf (file) node
///
/// # Examples
///
/// ```rust
/// use datadesk_core::models::SourceKind;
/// use datadesk_core::services::CreateLeafParams;
///
/// let params = CreateLeafParams {
///     name: "report.pdf".to_string(),
///     file_type: "pdf".to_string(),
///     size_bytes: 2_048_000,
///     source: SourceKind::Uploaded,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct CreateLeafParams {
    /// Display name, non-blank after trimming
    pub name: String,
    /// Extension tag, e.g. "pdf"
    pub file_type: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Upload vs connector sync
    pub source: SourceKind,
}

/// Upper bound on parent hops during upward traversal.
///
/// A leaf at the deepest legal position is `MAX_CONTAINER_DEPTH + 1` hops from
/// the root; anything past that means the structure is corrupt.
const MAX_PARENT_HOPS: usize = MAX_CONTAINER_DEPTH as usize + 1;

/// Owns one forest of nodes and exposes structural operations.
///
/// Explicitly constructed and owned by the caller, never a process-wide
/// singleton, so tests and screens compose isolated instances.
#[derive(Debug, Clone)]
pub struct TreeStore {
    /// Id index; the single source of truth for lookup
    nodes: HashMap<String, Node>,
    /// Id of the implicit root sentinel
    root_id: String,
}

impl TreeStore {
    /// Create an empty forest holding only the root sentinel
    pub fn new() -> Self {
        let root = Node::root();
        let root_id = root.id.clone();
        let mut nodes = HashMap::new();
        nodes.insert(root_id.clone(), root);
        Self { nodes, root_id }
    }

    /// Id of the implicit root sentinel
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// The root sentinel node
    pub fn root(&self) -> &Node {
        // The root is inserted in new() and remove() refuses to touch it
        &self.nodes[&self.root_id]
    }

    /// Number of nodes in the forest, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when only the root sentinel exists
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Whether the id exists in this store
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Iterate over all nodes in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Look up a node by id.
    ///
    /// The id index guarantees a single consistent result; duplicate ids
    /// cannot exist within one store.
    pub fn find(&self, id: &str) -> Result<&Node, TreeError> {
        self.nodes.get(id).ok_or_else(|| TreeError::not_found(id))
    }

    /// Ordered children of a container.
    ///
    /// Unknown ids are `NotFound`; a leaf yields an empty list, which is a
    /// distinct outcome, not an error.
    pub fn children_of(&self, id: &str) -> Result<Vec<&Node>, TreeError> {
        let node = self.find(id)?;
        node.children
            .iter()
            .map(|child_id| {
                self.nodes.get(child_id).ok_or_else(|| {
                    TreeError::invalid_tree(format!(
                        "child {} of {} missing from the id index",
                        child_id, id
                    ))
                })
            })
            .collect()
    }

    /// Names from the root to the given node, root segment first.
    ///
    /// Deterministic for an unmodified store. Bounded by the depth cap plus a
    /// visited set, so a corrupted parent chain returns `InvalidTree` rather
    /// than looping.
    pub fn path_of(&self, id: &str) -> Result<Vec<String>, TreeError> {
        let mut node = self.find(id)?;
        let mut names = vec![node.name.clone()];
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(node.id.as_str());

        while let Some(parent_id) = node.parent_id.as_deref() {
            if names.len() > MAX_PARENT_HOPS {
                return Err(TreeError::invalid_tree(format!(
                    "parent chain of {} exceeds {} hops",
                    id, MAX_PARENT_HOPS
                )));
            }
            let parent = self.nodes.get(parent_id).ok_or_else(|| {
                TreeError::invalid_tree(format!(
                    "parent {} of {} missing from the id index",
                    parent_id, node.id
                ))
            })?;
            if !visited.insert(parent.id.as_str()) {
                return Err(TreeError::invalid_tree(format!(
                    "cycle through {} while resolving path of {}",
                    parent.id, id
                )));
            }
            names.push(parent.name.clone());
            node = parent;
        }

        names.reverse();
        Ok(names)
    }

    /// Whether a container child may be inserted under `parent_id`.
    ///
    /// True iff the parent exists, is a container, and sits above the nesting
    /// cap boundary (strict `<`, so a depth-3 container can still take leaves
    /// but no further containers).
    pub fn can_add_child_container(&self, parent_id: &str) -> bool {
        match self.nodes.get(parent_id) {
            Some(parent) => parent.is_container() && parent.depth < MAX_CONTAINER_DEPTH,
            None => false,
        }
    }

    /// Insert a container under `parent_id`.
    ///
    /// # Errors
    ///
    /// - `EmptyName` when the trimmed name is blank
    /// - `ParentNotFound` / `ParentIsLeaf` on structural precondition failure
    /// - `DepthExceeded` when the parent already sits at the nesting cap
    pub fn add_container(&mut self, parent_id: &str, name: &str) -> Result<Node, TreeError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TreeError::EmptyName);
        }

        let parent = self
            .nodes
            .get(parent_id)
            .ok_or_else(|| TreeError::parent_not_found(parent_id))?;
        if parent.is_leaf() {
            return Err(TreeError::parent_is_leaf(parent_id));
        }
        if parent.depth >= MAX_CONTAINER_DEPTH {
            return Err(TreeError::depth_exceeded(parent_id));
        }

        let node = Node::container(name.to_string(), parent_id.to_string(), parent.depth + 1);
        node.validate()?;
        self.attach(node)
    }

    /// Insert a leaf (file) under `parent_id`.
    ///
    /// Leaves are not depth-limited beyond their parent's own cap: a depth-3
    /// container still accepts files.
    pub fn add_leaf(&mut self, parent_id: &str, params: CreateLeafParams) -> Result<Node, TreeError> {
        let name = params.name.trim();
        if name.is_empty() {
            return Err(TreeError::EmptyName);
        }

        let parent = self
            .nodes
            .get(parent_id)
            .ok_or_else(|| TreeError::parent_not_found(parent_id))?;
        if parent.is_leaf() {
            return Err(TreeError::parent_is_leaf(parent_id));
        }

        let attrs = LeafAttrs::new(params.file_type, params.size_bytes, params.source);
        let node = Node::leaf(name.to_string(), parent_id.to_string(), parent.depth + 1, attrs);
        node.validate()?;
        self.attach(node)
    }

    /// Rename a node.
    ///
    /// Sibling name collisions are allowed; callers disambiguate with the full
    /// path. The root sentinel keeps its fixed name.
    pub fn rename(&mut self, id: &str, new_name: &str) -> Result<(), TreeError> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(TreeError::EmptyName);
        }
        if id == self.root_id {
            return Err(TreeError::RootImmutable {
                operation: "renamed",
            });
        }

        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::not_found(id))?;
        node.name = new_name.to_string();
        node.modified_at = chrono::Utc::now();
        tracing::debug!("Renamed node {} to '{}'", id, new_name);
        Ok(())
    }

    /// Remove a node and, for containers, its entire subtree.
    ///
    /// Siblings are untouched, and task registries holding ids into this
    /// subtree are deliberately left alone; their snapshots simply go stale.
    pub fn remove(&mut self, id: &str) -> Result<(), TreeError> {
        if id == self.root_id {
            return Err(TreeError::RootImmutable {
                operation: "removed",
            });
        }
        if !self.nodes.contains_key(id) {
            return Err(TreeError::not_found(id));
        }

        // Collect the subtree first so a partial walk never leaves the map
        // half-mutated.
        let mut doomed = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children.iter().cloned());
            }
            doomed.push(current);
        }

        let parent_id = self.nodes[id].parent_id.clone();
        for doomed_id in &doomed {
            self.nodes.remove(doomed_id);
        }
        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.children.retain(|child| child != id);
                parent.modified_at = chrono::Utc::now();
            }
        }

        tracing::debug!("Removed node {} and {} descendant(s)", id, doomed.len() - 1);
        Ok(())
    }

    /// Apply an update closure to a container's attributes.
    ///
    /// Used for status changes, explicit file-count overrides, and database
    /// connection links.
    pub fn update_container<F>(&mut self, id: &str, update: F) -> Result<(), TreeError>
    where
        F: FnOnce(&mut crate::models::ContainerAttrs),
    {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::not_found(id))?;
        match &mut node.payload {
            crate::models::NodePayload::Container(attrs) => {
                update(attrs);
                node.modified_at = chrono::Utc::now();
                Ok(())
            }
            crate::models::NodePayload::Leaf(_) => Err(TreeError::not_a_container(id)),
        }
    }

    /// Insert a validated node and link it into its parent's child list
    fn attach(&mut self, node: Node) -> Result<Node, TreeError> {
        let id = node.id.clone();
        let parent_id = node
            .parent_id
            .clone()
            .ok_or_else(|| TreeError::invalid_tree("attach called with a parentless node"))?;

        self.nodes.insert(id.clone(), node);
        let parent = self.nodes.get_mut(&parent_id).ok_or_else(|| {
            TreeError::invalid_tree(format!("parent {} vanished during attach", parent_id))
        })?;
        parent.children.push(id.clone());
        parent.modified_at = chrono::Utc::now();

        tracing::debug!("Attached node {} under {}", id, parent_id);
        Ok(self.nodes[&id].clone())
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new()
    }
}

// Comprehensive tests in separate module
#[cfg(test)]
#[path = "tree_store_test.rs"]
mod tree_store_test;
