use crate::browser::SchemaBrowser;
use crate::tree::SchemaTree;
use async_trait::async_trait;
use schemascope_api::navigation::{NavigationService, ResolveResult};
use schemascope_api::{BrowserResult, NodeId};

/// NavigationEngine resolves shell-style paths against one hierarchy snapshot.
pub struct NavigationEngine<'a> {
    tree: &'a SchemaTree,
}

impl<'a> NavigationEngine<'a> {
    pub fn new(tree: &'a SchemaTree) -> Self {
        Self { tree }
    }

    pub fn resolve_path(&self, target: &str, current_context: Option<NodeId>) -> ResolveResult {
        let target = target.trim();
        let current = current_context
            .filter(|id| self.tree.contains(*id))
            .unwrap_or_else(|| self.tree.root());

        // 1. Handle special paths ("/" or "root")
        if target == "/" || target == "root" {
            return ResolveResult::Found(self.tree.root());
        }

        // 2. Handle parent navigation (".."); the root is its own parent
        if target == ".." {
            return ResolveResult::Found(self.tree.parent(current).unwrap_or(self.tree.root()));
        }

        if target == "." || target.is_empty() {
            return ResolveResult::Found(current);
        }

        // 3. Explicit arena id ("#12")
        if target.starts_with('#') {
            return match target.parse::<NodeId>() {
                Ok(id) if self.tree.contains(id) => ResolveResult::Found(id),
                _ => ResolveResult::NotFound,
            };
        }

        // 4. Name paths, absolute from the root or relative to the current node
        if target.contains('/') {
            return self.walk_names(target, current);
        }

        // 5. Bare name: children of the current node first, then anywhere in the tree
        let local: Vec<NodeId> = self
            .tree
            .children(current)
            .into_iter()
            .filter(|c| self.tree.node(*c).is_some_and(|n| n.name() == target))
            .collect();
        let candidates = if local.is_empty() {
            self.tree.find_by_name(target)
        } else {
            local
        };

        match candidates.len() {
            0 => ResolveResult::NotFound,
            1 => ResolveResult::Found(candidates[0]),
            _ => ResolveResult::Ambiguous(candidates),
        }
    }

    fn walk_names(&self, target: &str, current: NodeId) -> ResolveResult {
        let root = self.tree.root();
        let (mut cursor, rest) = match target.strip_prefix('/') {
            Some(rest) => (root, rest),
            None => (current, target),
        };

        let mut segments = rest.split('/').filter(|s| !s.is_empty()).peekable();
        if cursor == root {
            let root_name = self.tree.node(root).map(|n| n.name());
            if segments.peek().copied() == root_name {
                segments.next();
            }
        }

        for segment in segments {
            cursor = match segment {
                "." => cursor,
                ".." => self.tree.parent(cursor).unwrap_or(root),
                name => match self.tree.child_named(cursor, name) {
                    Some(child) => child,
                    None => return ResolveResult::NotFound,
                },
            };
        }
        ResolveResult::Found(cursor)
    }

    pub fn completion_candidates(
        &self,
        prefix: &str,
        current_context: Option<NodeId>,
        limit: usize,
    ) -> Vec<String> {
        let current = current_context
            .filter(|id| self.tree.contains(*id))
            .unwrap_or_else(|| self.tree.root());

        let mut names: Vec<String> = self
            .tree
            .children(current)
            .into_iter()
            .filter_map(|c| self.tree.node(c))
            .map(|n| n.name().to_string())
            .filter(|name| name.starts_with(prefix))
            .collect();
        names.dedup();
        names.truncate(limit);
        names
    }
}

#[async_trait]
impl NavigationService for SchemaBrowser {
    async fn resolve_path(
        &self,
        target: &str,
        current_context: Option<NodeId>,
    ) -> BrowserResult<ResolveResult> {
        let tree = self.snapshot().await?;
        Ok(NavigationEngine::new(&tree).resolve_path(target, current_context))
    }

    async fn completion_candidates(
        &self,
        prefix: &str,
        current_context: Option<NodeId>,
        limit: usize,
    ) -> BrowserResult<Vec<String>> {
        let tree = self.snapshot().await?;
        Ok(NavigationEngine::new(&tree).completion_candidates(prefix, current_context, limit))
    }
}
