//! Builder for creating and modifying hierarchy snapshots
//!
//! The `SchemaTreeBuilder` owns a private copy of the arena. It is used to create
//! the root after the initial load and to splice fetched children into a node, then
//! frozen into an immutable `SchemaTree` via `build()`.

use super::graph::{SchemaTree, SchemaTreeInner, to_id, to_index};
use super::node::{ChildEdge, SpliceOutcome, TreeNode};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use schemascope_api::{BrowserError, BrowserResult, NodeId, SchemaNode};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);

/// Mutable tree builder
pub struct SchemaTreeBuilder {
    inner: SchemaTreeInner,
}

impl SchemaTreeBuilder {
    fn empty(root: TreeNode) -> Self {
        let mut topology = StableDiGraph::new();
        let name = root.name.clone();
        let root_idx = topology.add_node(root);
        let mut name_index = HashMap::new();
        name_index.insert(name, vec![root_idx]);

        Self {
            inner: SchemaTreeInner {
                session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
                version: 1,
                root: root_idx,
                topology,
                name_index,
            },
        }
    }

    /// Root after the initial load: fetched, expandable iff anything came back.
    pub fn with_root(name: &str, children: Vec<SchemaNode>) -> Self {
        let mut root = TreeNode::new(name, !children.is_empty());
        root.is_fetched = true;

        let mut builder = Self::empty(root);
        let root_idx = builder.inner.root;
        builder.attach_all(root_idx, &children);
        builder
    }

    /// Import a nested hierarchy as-is (flags and children included).
    pub fn from_schema_node(root: &SchemaNode) -> Self {
        let mut node = TreeNode::new(root.name.as_str(), root.has_children);
        node.is_fetched = root.is_fetched;

        let mut builder = Self::empty(node);
        let root_idx = builder.inner.root;
        builder.attach_all(root_idx, &root.children);
        builder
    }

    /// Create builder from existing tree (deep copy)
    pub fn from_tree(tree: &SchemaTree) -> Self {
        tree.to_builder()
    }

    pub(crate) fn from_inner(inner: SchemaTreeInner) -> Self {
        Self { inner }
    }

    // ---- Mutation methods ----

    fn add_node(&mut self, node: TreeNode) -> NodeIndex {
        let name = node.name.clone();
        let idx = self.inner.topology.add_node(node);
        self.inner.name_index.entry(name).or_default().push(idx);
        idx
    }

    fn next_position(&self, parent: NodeIndex) -> u32 {
        self.inner
            .topology
            .edges_directed(parent, Direction::Outgoing)
            .count() as u32
    }

    /// Attach `child` (and anything nested in it) as the last child of `parent`.
    fn attach(&mut self, parent: NodeIndex, child: &SchemaNode) -> NodeIndex {
        let mut node = TreeNode::new(child.name.as_str(), child.has_children);
        node.is_fetched = child.is_fetched;

        let position = self.next_position(parent);
        let idx = self.add_node(node);
        self.inner
            .topology
            .add_edge(parent, idx, ChildEdge { position });
        self.attach_all(idx, &child.children);
        idx
    }

    fn attach_all(&mut self, parent: NodeIndex, children: &[SchemaNode]) {
        for child in children {
            self.attach(parent, child);
        }
    }

    /// Give `id` its fetched children and mark it fetched.
    ///
    /// Only the target changes. A leaf or an already fetched node is left as it is,
    /// which keeps `is_fetched` monotonic and children unique per fetch.
    pub fn splice_children(
        &mut self,
        id: NodeId,
        children: Vec<SchemaNode>,
    ) -> BrowserResult<SpliceOutcome> {
        let idx = to_index(id);
        let node = self
            .inner
            .topology
            .node_weight_mut(idx)
            .ok_or(BrowserError::NodeNotFound(id))?;

        if !node.has_children {
            return Ok(SpliceOutcome::Leaf);
        }
        if node.is_fetched {
            return Ok(SpliceOutcome::AlreadyFetched);
        }
        node.is_fetched = true;

        let added = children.len();
        self.attach_all(idx, &children);
        self.inner.version += 1;
        Ok(SpliceOutcome::Spliced { added })
    }

    pub fn root(&self) -> NodeId {
        to_id(self.inner.root)
    }

    /// Build the immutable tree
    pub fn build(self) -> SchemaTree {
        SchemaTree::from_inner(self.inner)
    }
}
