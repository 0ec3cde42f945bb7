use schemascope_api::{BrowserResult, NavigationService, NodeId, ResolveResult};
use schemascope_core::config::BrowserConfig;
use schemascope_core::{ExpandResult, SchemaBrowser, SchemaTree};
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

const MAX_AMBIGUOUS_SHOWN: usize = 10;

#[derive(Clone)]
pub struct ShellContext {
    pub browser: SchemaBrowser,
    pub config: Arc<BrowserConfig>,
    pub rt_handle: tokio::runtime::Handle,
    pub current_node: Arc<RwLock<Option<NodeId>>>,
    /// Presentational open/closed state; not part of the hierarchy
    pub open_nodes: Arc<RwLock<HashSet<NodeId>>>,
}

impl ShellContext {
    pub fn new(
        browser: SchemaBrowser,
        config: Arc<BrowserConfig>,
        rt_handle: tokio::runtime::Handle,
    ) -> Self {
        Self {
            browser,
            config,
            rt_handle,
            current_node: Arc::new(RwLock::new(None)),
            open_nodes: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    pub fn current_node(&self) -> Option<NodeId> {
        *self
            .current_node
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_current_node(&self, node: Option<NodeId>) {
        *self
            .current_node
            .write()
            .unwrap_or_else(PoisonError::into_inner) = node;
    }

    /// Helper to get the hierarchy snapshot synchronously
    pub fn snapshot(&self) -> BrowserResult<SchemaTree> {
        self.rt_handle.block_on(self.browser.snapshot())
    }

    /// The current node, or the root when none is set.
    pub fn current_or_root(&self) -> BrowserResult<NodeId> {
        let tree = self.snapshot()?;
        Ok(self
            .current_node()
            .filter(|id| tree.contains(*id))
            .unwrap_or_else(|| tree.root()))
    }

    pub fn current_path(&self) -> Option<String> {
        let tree = self.snapshot().ok()?;
        tree.path(self.current_node()?)
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.open_nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&id)
    }

    pub fn set_open(&self, id: NodeId, open: bool) {
        let mut nodes = self
            .open_nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if open {
            nodes.insert(id);
        } else {
            nodes.remove(&id);
        }
    }

    /// Flip the open flag of `id`, returning the new state.
    pub fn toggle_open(&self, id: NodeId) -> bool {
        let open = !self.is_open(id);
        self.set_open(id, open);
        open
    }

    /// Helper to expand a node synchronously
    pub fn expand(&self, id: NodeId) -> BrowserResult<ExpandResult> {
        self.rt_handle.block_on(self.browser.expand_node(id))
    }

    pub fn expand_to_depth(&self, id: NodeId, depth: usize) -> BrowserResult<usize> {
        self.rt_handle
            .block_on(self.browser.expand_to_depth(id, depth))
    }

    /// Load the hierarchy from scratch; the root starts open and becomes the context.
    pub fn reload(&self) -> BrowserResult<SchemaTree> {
        let tree = self.rt_handle.block_on(self.browser.initialize_root())?;
        {
            let mut nodes = self
                .open_nodes
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            nodes.clear();
            nodes.insert(tree.root());
        }
        self.set_current_node(None);
        Ok(tree)
    }

    /// Resolves a user input path (`/`, `..`, `#id`, name path, or bare name) to a node.
    pub fn resolve_node(&self, target: &str) -> BrowserResult<ResolveResult> {
        self.rt_handle.block_on(NavigationService::resolve_path(
            &self.browser,
            target,
            self.current_node(),
        ))
    }

    /// Resolve `target` (the current node when absent) to exactly one node.
    pub fn resolve_one(&self, target: Option<&str>) -> Result<NodeId, Box<dyn std::error::Error>> {
        let Some(target) = target else {
            return Ok(self.current_or_root()?);
        };

        match self.resolve_node(target)? {
            ResolveResult::Found(id) => Ok(id),
            ResolveResult::Ambiguous(candidates) => {
                let tree = self.snapshot()?;
                let mut msg = format!("Ambiguous path '{}'. Candidates:\n", target);
                for id in candidates.iter().take(MAX_AMBIGUOUS_SHOWN) {
                    let path = tree.path(*id).unwrap_or_default();
                    msg.push_str(&format!("  - {} {}\n", id, path));
                }
                msg.push_str("Use a full path or an id (e.g. #12).");
                Err(msg.into())
            }
            ResolveResult::NotFound => Err(format!("Node '{}' not found.", target).into()),
        }
    }

    /// Completion candidates for a partially typed path.
    ///
    /// Everything up to the last `/` is resolved as a directory; the remainder is the
    /// prefix matched against that directory's children.
    pub fn complete_path(&self, word: &str, limit: usize) -> Vec<String> {
        let (dir, prefix) = match word.rfind('/') {
            Some(pos) => (&word[..=pos], &word[pos + 1..]),
            None => ("", word),
        };

        let parent = match dir {
            "" => self.current_node(),
            "/" => None,
            _ => match self.resolve_node(dir.trim_end_matches('/')) {
                Ok(ResolveResult::Found(id)) => Some(id),
                _ => return Vec::new(),
            },
        };

        self.rt_handle
            .block_on(NavigationService::completion_candidates(
                &self.browser,
                prefix,
                parent,
                limit,
            ))
            .unwrap_or_default()
            .into_iter()
            .map(|name| format!("{}{}", dir, name))
            .collect()
    }
}
