//! Arc-wrapped immutable hierarchy
//!
//! A `SchemaTree` is one version of the browsed hierarchy. Cloning it only bumps a
//! reference count; every change goes through `SchemaTreeBuilder` and yields a new
//! version, so readers holding an older snapshot never observe a half-applied splice.

use super::builder::SchemaTreeBuilder;
use super::node::{ChildEdge, SpliceOutcome, TreeNode};
use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use schemascope_api::{BrowserError, BrowserResult, NodeId, NodeView, SchemaNode};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable hierarchy snapshot (cheap to clone via Arc)
#[derive(Clone)]
pub struct SchemaTree {
    inner: Arc<SchemaTreeInner>,
}

/// Internal data structure (shared via Arc)
#[derive(Clone)]
pub struct SchemaTreeInner {
    /// Identifies the load this tree descends from; a reload starts a new session
    pub session: u64,
    /// Bumped on every splice that changed the tree
    pub version: u64,
    pub root: NodeIndex,
    pub topology: StableDiGraph<TreeNode, ChildEdge>,

    /// Name -> every node carrying it (a class reachable via two parents appears twice)
    pub name_index: HashMap<Arc<str>, Vec<NodeIndex>>,
}

pub(crate) fn to_index(id: NodeId) -> NodeIndex {
    NodeIndex::new(id.index())
}

pub(crate) fn to_id(idx: NodeIndex) -> NodeId {
    NodeId(idx.index() as u32)
}

impl SchemaTree {
    pub(crate) fn from_inner(inner: SchemaTreeInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Import a nested hierarchy, keeping every flag as given.
    pub fn from_schema_node(root: &SchemaNode) -> Self {
        SchemaTreeBuilder::from_schema_node(root).build()
    }

    /// Create a builder for modifying this tree
    ///
    /// Note: This performs a deep copy of the arena.
    pub fn to_builder(&self) -> SchemaTreeBuilder {
        SchemaTreeBuilder::from_inner((*self.inner).clone())
    }

    // ---- Read-only accessors ----

    pub fn session(&self) -> u64 {
        self.inner.session
    }

    pub fn version(&self) -> u64 {
        self.inner.version
    }

    /// True when both handles point at the very same version.
    pub fn same_snapshot(&self, other: &SchemaTree) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn root(&self) -> NodeId {
        to_id(self.inner.root)
    }

    pub fn topology(&self) -> &StableDiGraph<TreeNode, ChildEdge> {
        &self.inner.topology
    }

    pub fn node_count(&self) -> usize {
        self.inner.topology.node_count()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.inner.topology.contains_node(to_index(id))
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.inner.topology.node_weight(to_index(id))
    }

    pub(crate) fn require(&self, id: NodeId) -> BrowserResult<&TreeNode> {
        self.node(id).ok_or(BrowserError::NodeNotFound(id))
    }

    /// Children in the order the lookup service reported them.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let idx = to_index(id);
        if !self.inner.topology.contains_node(idx) {
            return Vec::new();
        }
        let mut edges: Vec<(u32, NodeIndex)> = self
            .inner
            .topology
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| (e.weight().position, e.target()))
            .collect();
        edges.sort_by_key(|(position, _)| *position);
        edges.into_iter().map(|(_, child)| to_id(child)).collect()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let idx = to_index(id);
        if !self.inner.topology.contains_node(idx) {
            return None;
        }
        self.inner
            .topology
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .map(to_id)
    }

    /// Ancestors from the direct parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = self.parent(id);
        while let Some(p) = cursor {
            chain.push(p);
            cursor = self.parent(p);
        }
        chain
    }

    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Names from the root down to `id`, joined by `/` (e.g. `/Thing/Person/Athlete`).
    pub fn path(&self, id: NodeId) -> Option<String> {
        let node = self.node(id)?;
        let mut segments: Vec<&str> = self
            .ancestors(id)
            .into_iter()
            .rev()
            .filter_map(|a| self.node(a).map(TreeNode::name))
            .collect();
        segments.push(node.name());
        Some(format!("/{}", segments.join("/")))
    }

    /// Every node carrying `name`, in insertion order.
    pub fn find_by_name(&self, name: &str) -> Vec<NodeId> {
        self.inner
            .name_index
            .get(name)
            .map(|ids| ids.iter().copied().map(to_id).collect())
            .unwrap_or_default()
    }

    /// First child of `parent` named `name`.
    pub fn child_named(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .into_iter()
            .find(|c| self.node(*c).is_some_and(|n| n.name() == name))
    }

    pub fn view(&self, id: NodeId) -> Option<NodeView> {
        let node = self.node(id)?;
        Some(NodeView {
            id,
            name: node.name().to_string(),
            depth: self.depth(id),
            has_children: node.has_children,
            is_fetched: node.is_fetched,
            child_count: self.children(id).len(),
        })
    }

    /// Pre-order walk of the subtree under `id`, with depth relative to `id`.
    pub fn walk(&self, id: NodeId) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![(id, 0usize)];
        while let Some((current, depth)) = stack.pop() {
            out.push((current, depth));
            for child in self.children(current).into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    /// Materialise the subtree under `id` in nested form.
    pub fn to_schema_node(&self, id: NodeId) -> Option<SchemaNode> {
        let node = self.node(id)?;
        Some(SchemaNode {
            name: node.name().to_string(),
            children: self
                .children(id)
                .into_iter()
                .filter_map(|c| self.to_schema_node(c))
                .collect(),
            is_fetched: node.is_fetched,
            has_children: node.has_children,
        })
    }

    /// Nested form of the whole hierarchy.
    pub fn to_root_node(&self) -> SchemaNode {
        self.to_schema_node(self.root()).unwrap_or_else(|| SchemaNode::unfetched("", false))
    }

    /// Splice freshly fetched `children` into `id`, returning the new version.
    ///
    /// Leaves `self` untouched. When the target is a leaf or already fetched nothing
    /// changes and the returned tree is this very snapshot.
    pub fn expand(
        &self,
        id: NodeId,
        children: Vec<SchemaNode>,
    ) -> BrowserResult<(SchemaTree, SpliceOutcome)> {
        let node = self.require(id)?;
        if !node.has_children {
            return Ok((self.clone(), SpliceOutcome::Leaf));
        }
        if node.is_fetched {
            return Ok((self.clone(), SpliceOutcome::AlreadyFetched));
        }

        let mut builder = self.to_builder();
        let outcome = builder.splice_children(id, children)?;
        Ok((builder.build(), outcome))
    }
}

impl std::fmt::Debug for SchemaTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaTree")
            .field("session", &self.inner.session)
            .field("version", &self.inner.version)
            .field("nodes", &self.node_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_root() -> SchemaNode {
        SchemaNode {
            name: "Thing".to_string(),
            children: vec![
                SchemaNode::unfetched("Person", true),
                SchemaNode::unfetched("Place", false),
            ],
            is_fetched: true,
            has_children: true,
        }
    }

    #[test]
    fn test_children_keep_discovery_order() {
        let tree = SchemaTree::from_schema_node(&scenario_root());
        let names: Vec<_> = tree
            .children(tree.root())
            .into_iter()
            .map(|c| tree.node(c).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["Person", "Place"]);
    }

    #[test]
    fn test_expand_splices_only_target() {
        let tree = SchemaTree::from_schema_node(&scenario_root());
        let person = tree.find_by_name("Person")[0];
        let place = tree.find_by_name("Place")[0];

        let (next, outcome) = tree
            .expand(person, vec![SchemaNode::unfetched("Athlete", false)])
            .unwrap();

        assert_eq!(outcome, SpliceOutcome::Spliced { added: 1 });
        assert!(next.node(person).unwrap().is_fetched);
        assert_eq!(next.node(place), tree.node(place));
        assert_eq!(next.path(next.find_by_name("Athlete")[0]).unwrap(), "/Thing/Person/Athlete");

        // The earlier snapshot is untouched
        assert!(!tree.node(person).unwrap().is_fetched);
        assert!(tree.find_by_name("Athlete").is_empty());
        assert_eq!(next.version(), tree.version() + 1);
    }

    #[test]
    fn test_expand_leaf_and_fetched_are_noops() {
        let tree = SchemaTree::from_schema_node(&scenario_root());
        let place = tree.find_by_name("Place")[0];

        let (same, outcome) = tree
            .expand(place, vec![SchemaNode::unfetched("Ghost", false)])
            .unwrap();
        assert_eq!(outcome, SpliceOutcome::Leaf);
        assert!(same.same_snapshot(&tree));

        let (same, outcome) = tree.expand(tree.root(), vec![]).unwrap();
        assert_eq!(outcome, SpliceOutcome::AlreadyFetched);
        assert!(same.same_snapshot(&tree));
    }

    #[test]
    fn test_expand_unknown_node() {
        let tree = SchemaTree::from_schema_node(&scenario_root());
        assert!(matches!(
            tree.expand(NodeId(99), vec![]),
            Err(BrowserError::NodeNotFound(NodeId(99)))
        ));
    }

    #[test]
    fn test_walk_and_nested_round_trip() {
        let mut root = scenario_root();
        root.children[0].is_fetched = true;
        root.children[0]
            .children
            .push(SchemaNode::unfetched("Athlete", false));

        let tree = SchemaTree::from_schema_node(&root);
        let order: Vec<_> = tree
            .walk(tree.root())
            .into_iter()
            .map(|(id, depth)| (tree.node(id).unwrap().name().to_string(), depth))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Thing".to_string(), 0),
                ("Person".to_string(), 1),
                ("Athlete".to_string(), 2),
                ("Place".to_string(), 1),
            ]
        );
        assert_eq!(tree.to_root_node(), root);
    }

    #[test]
    fn test_duplicate_names_are_distinct_nodes() {
        let root = SchemaNode {
            name: "Thing".to_string(),
            children: vec![
                SchemaNode::unfetched("Agent", true),
                SchemaNode::unfetched("Agent", true),
            ],
            is_fetched: true,
            has_children: true,
        };
        let tree = SchemaTree::from_schema_node(&root);
        let agents = tree.find_by_name("Agent");
        assert_eq!(agents.len(), 2);

        let (next, _) = tree
            .expand(agents[1], vec![SchemaNode::unfetched("Robot", false)])
            .unwrap();
        assert!(!next.node(agents[0]).unwrap().is_fetched);
        assert!(next.children(agents[0]).is_empty());
        assert_eq!(next.children(agents[1]).len(), 1);
    }
}
