use std::sync::Arc;

/// Arena payload of one hierarchy node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub name: Arc<str>,
    pub is_fetched: bool,
    pub has_children: bool,
}

impl TreeNode {
    pub fn new(name: impl Into<Arc<str>>, has_children: bool) -> Self {
        Self {
            name: name.into(),
            is_fetched: false,
            has_children,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expandable and not yet fetched.
    pub fn needs_fetch(&self) -> bool {
        self.has_children && !self.is_fetched
    }
}

/// Parent → child edge; `position` keeps the order the service reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildEdge {
    pub position: u32,
}

/// What a splice did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceOutcome {
    Spliced { added: usize },
    AlreadyFetched,
    Leaf,
}

impl SpliceOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, SpliceOutcome::Spliced { .. })
    }
}
