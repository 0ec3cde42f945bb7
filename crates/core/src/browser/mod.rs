//! Tree controller
//!
//! `SchemaBrowser` owns the current hierarchy snapshot and turns user expansions into
//! lookups. It follows the same MVCC scheme as the rest of the crate:
//!
//! - Readers get cheap snapshots (Arc clone)
//! - Fetches run without holding any lock
//! - Splices are applied under the write lock against the *latest* snapshot, so two
//!   expansions racing on different nodes both land

mod fetch;

pub use fetch::fetch_children;

use crate::config::BrowserConfig;
use crate::tree::{SchemaTree, SchemaTreeBuilder, SpliceOutcome};
use dashmap::DashSet;
use schemascope_api::{
    BrowserError, BrowserResult, LookupResult, LookupService, NodeId, SchemaNode,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinSet;
use tracing::{info, warn};

/// What an expand request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandOutcome {
    /// Children were fetched and spliced in
    Expanded { added: usize },
    /// Nothing to do: children were fetched before
    AlreadyFetched,
    /// Nothing to do: the node has no children
    Leaf,
    /// Another expand of the same node is still fetching
    InFlight,
    /// The hierarchy was reloaded while fetching; the result was dropped
    Superseded,
}

impl ExpandOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, ExpandOutcome::Expanded { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ExpandResult {
    /// Snapshot after the request (the same snapshot when nothing changed)
    pub tree: SchemaTree,
    pub outcome: ExpandOutcome,
}

/// Marks a node as fetching for as long as it lives.
struct InFlightGuard {
    set: Arc<DashSet<(u64, NodeId)>>,
    key: (u64, NodeId),
}

impl InFlightGuard {
    fn acquire(set: &Arc<DashSet<(u64, NodeId)>>, key: (u64, NodeId)) -> Option<Self> {
        set.insert(key).then(|| Self {
            set: Arc::clone(set),
            key,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.remove(&self.key);
    }
}

/// Lazily expanding browser over a remote class hierarchy.
#[derive(Clone)]
pub struct SchemaBrowser {
    lookup: Arc<dyn LookupService>,
    root_name: Arc<str>,
    current: Arc<RwLock<Option<SchemaTree>>>,
    in_flight: Arc<DashSet<(u64, NodeId)>>,
    probe_limit: Arc<Semaphore>,
}

impl SchemaBrowser {
    pub fn new(lookup: Arc<dyn LookupService>, root_name: impl Into<Arc<str>>) -> Self {
        Self::with_probe_limit(
            lookup,
            root_name,
            crate::config::DEFAULT_MAX_IN_FLIGHT_PROBES,
        )
    }

    pub fn with_probe_limit(
        lookup: Arc<dyn LookupService>,
        root_name: impl Into<Arc<str>>,
        max_in_flight_probes: usize,
    ) -> Self {
        Self {
            lookup,
            root_name: root_name.into(),
            current: Arc::new(RwLock::new(None)),
            in_flight: Arc::new(DashSet::new()),
            probe_limit: Arc::new(Semaphore::new(max_in_flight_probes.max(1))),
        }
    }

    pub fn from_config(lookup: Arc<dyn LookupService>, config: &BrowserConfig) -> Self {
        Self::with_probe_limit(lookup, config.root.as_str(), config.max_in_flight_probes)
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Current snapshot (cheap operation)
    pub async fn snapshot(&self) -> BrowserResult<SchemaTree> {
        self.current
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotInitialized)
    }

    pub async fn is_initialized(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Load the root and its probed children, replacing any previous hierarchy.
    ///
    /// On failure nothing is stored; calling again retries the load.
    pub async fn initialize_root(&self) -> BrowserResult<SchemaTree> {
        let children = self.fetch_children(&self.root_name).await?;
        let tree = SchemaTreeBuilder::with_root(&self.root_name, children).build();

        {
            let mut lock = self.current.write().await;
            *lock = Some(tree.clone());
        }

        info!(
            root = %self.root_name,
            children = tree.children(tree.root()).len(),
            "Hierarchy loaded"
        );
        Ok(tree)
    }

    /// Direct children of `node`, each with its `has_children` probe applied.
    pub async fn fetch_children(&self, node: &str) -> LookupResult<Vec<SchemaNode>> {
        fetch_children(&self.lookup, &self.probe_limit, node).await
    }

    /// Fetch the children of `id` unless that already happened, and splice them in.
    ///
    /// Leaves and fetched nodes never reach the network. On a failed fetch nothing is
    /// committed and the node stays expandable for a later retry.
    pub async fn expand_node(&self, id: NodeId) -> BrowserResult<ExpandResult> {
        let tree = self.snapshot().await?;
        let (name, has_children, is_fetched) = {
            let node = tree.require(id)?;
            (node.name.clone(), node.has_children, node.is_fetched)
        };

        if !has_children {
            return Ok(ExpandResult {
                tree,
                outcome: ExpandOutcome::Leaf,
            });
        }
        if is_fetched {
            return Ok(ExpandResult {
                tree,
                outcome: ExpandOutcome::AlreadyFetched,
            });
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, (tree.session(), id)) else {
            return Ok(ExpandResult {
                tree,
                outcome: ExpandOutcome::InFlight,
            });
        };

        let children = self.fetch_children(&name).await?;

        let mut lock = self.current.write().await;
        let latest = lock.clone().ok_or(BrowserError::NotInitialized)?;
        if latest.session() != tree.session() {
            warn!(node = %name, "Hierarchy reloaded during fetch, dropping result");
            return Ok(ExpandResult {
                tree: latest,
                outcome: ExpandOutcome::Superseded,
            });
        }

        let (next, splice) = latest.expand(id, children)?;
        let outcome = match splice {
            SpliceOutcome::Spliced { added } => {
                *lock = Some(next.clone());
                info!(node = %name, added, version = next.version(), "Expanded");
                ExpandOutcome::Expanded { added }
            }
            SpliceOutcome::AlreadyFetched => ExpandOutcome::AlreadyFetched,
            SpliceOutcome::Leaf => ExpandOutcome::Leaf,
        };

        Ok(ExpandResult {
            tree: next,
            outcome,
        })
    }

    /// Walk a `/`-separated name path from the root, expanding each step as needed.
    ///
    /// A leading segment equal to the root name is optional. The first child with a
    /// matching name is followed at every step.
    pub async fn expand_path(&self, path: &str) -> BrowserResult<NodeId> {
        let mut tree = self.snapshot().await?;
        let mut cursor = tree.root();

        let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
        if segments.peek().copied() == Some(&*self.root_name) {
            segments.next();
        }

        for segment in segments {
            if tree.require(cursor)?.needs_fetch() {
                tree = self.expand_node(cursor).await?.tree;
            }
            cursor = tree
                .child_named(cursor, segment)
                .ok_or_else(|| BrowserError::PathNotFound(path.to_string()))?;
        }
        Ok(cursor)
    }

    /// Expand every expandable node under `id` so that `depth` levels of descendants
    /// are materialised (`depth = 1` only expands `id` itself).
    ///
    /// Each level is fetched concurrently. A node whose fetch fails is logged and
    /// skipped (it stays expandable); the rest of the level carries on. Returns the
    /// number of nodes that were expanded.
    pub async fn expand_to_depth(&self, id: NodeId, depth: usize) -> BrowserResult<usize> {
        self.snapshot().await?.require(id)?;

        let mut expanded = 0;
        let mut frontier = VecDeque::from([id]);
        for _ in 0..depth {
            let mut tasks = JoinSet::new();
            for node in frontier.drain(..) {
                let browser = self.clone();
                tasks.spawn(async move { (node, browser.expand_node(node).await) });
            }

            let mut reached = Vec::new();
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok((node, Ok(result))) => {
                        if result.outcome.changed() {
                            expanded += 1;
                        }
                        reached.push(node);
                    }
                    Ok((node, Err(e))) => warn!(%node, "Expansion failed, skipping: {}", e),
                    Err(e) => warn!("Expansion task aborted: {}", e),
                }
            }

            let tree = self.snapshot().await?;
            reached.sort();
            for node in reached {
                frontier.extend(
                    tree.children(node)
                        .into_iter()
                        .filter(|c| tree.node(*c).is_some_and(|n| n.has_children)),
                );
            }
            if frontier.is_empty() {
                break;
            }
        }
        Ok(expanded)
    }
}
