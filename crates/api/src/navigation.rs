use crate::error::BrowserResult;
use crate::models::NodeId;
use async_trait::async_trait;

/// Result of resolving a user-provided path to a materialised node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveResult {
    /// Exactly one node found
    Found(NodeId),
    /// Multiple nodes match the query (ambiguous)
    Ambiguous(Vec<NodeId>),
    /// No node found
    NotFound,
}

/// Navigation over the nodes that have been fetched so far.
///
/// Supported targets:
/// - **Special paths**: "/" or "root" → the hierarchy root
/// - **Parent**: ".." from the current node
/// - **Id**: "#12" → the node with that arena id
/// - **Name path**: "/Thing/Person" from the root, "Person/Athlete" from the current node
/// - **Bare name**: "Athlete" → a child of the current node, else any node with that name
#[async_trait]
pub trait NavigationService: Send + Sync {
    async fn resolve_path(
        &self,
        target: &str,
        current_context: Option<NodeId>,
    ) -> BrowserResult<ResolveResult>;

    /// Names of the current node's children that start with `prefix`.
    async fn completion_candidates(
        &self,
        prefix: &str,
        current_context: Option<NodeId>,
        limit: usize,
    ) -> BrowserResult<Vec<String>>;
}
