use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable arena id of a materialised node.
///
/// Assigned once when the node is inserted and never reused, so two nodes that share a
/// display name (a class reachable through two parents) stay distinguishable.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('#').unwrap_or(s).parse().map(NodeId)
    }
}

/// One vertex of the displayed hierarchy, in nested form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Lookup key and display label
    pub name: String,
    #[serde(default)]
    pub children: Vec<SchemaNode>,
    #[serde(default)]
    pub is_fetched: bool,
    #[serde(default)]
    pub has_children: bool,
}

impl SchemaNode {
    /// A freshly discovered child: nothing fetched yet, `has_children` from its probe.
    pub fn unfetched(name: impl Into<String>, has_children: bool) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            is_fetched: false,
            has_children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !self.has_children
    }

    /// Whether an expand on this node would issue a fetch.
    pub fn needs_fetch(&self) -> bool {
        self.has_children && !self.is_fetched
    }

    /// Depth-first search for the first node carrying `name`.
    pub fn find(&self, name: &str) -> Option<&SchemaNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SchemaNode::count).sum::<usize>()
    }
}

/// Flat per-node record handed to renderers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    pub id: NodeId,
    pub name: String,
    pub depth: usize,
    pub has_children: bool,
    pub is_fetched: bool,
    pub child_count: usize,
}
