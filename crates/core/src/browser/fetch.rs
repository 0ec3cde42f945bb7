use schemascope_api::{LookupError, LookupResult, LookupService, SchemaNode};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Direct children of `node`, each probed once for children of its own.
///
/// The primary lookup failing fails the whole call. Probes run concurrently (at most
/// `probe_limit` at a time) and are put back in discovery order; a probe that fails
/// leaves its child with `has_children = false` and is not retried.
pub async fn fetch_children(
    lookup: &Arc<dyn LookupService>,
    probe_limit: &Arc<Semaphore>,
    node: &str,
) -> LookupResult<Vec<SchemaNode>> {
    if node.is_empty() {
        return Err(LookupError::InvalidArgument("empty node identifier".into()));
    }

    let names = lookup.subclasses(node).await?;
    debug!(node, count = names.len(), "Fetched children, probing");

    let mut tasks = JoinSet::new();
    for (position, name) in names.iter().enumerate() {
        let lookup = Arc::clone(lookup);
        let limit = Arc::clone(probe_limit);
        let name = name.clone();

        tasks.spawn(async move {
            let _permit = limit.acquire_owned().await;
            let probe = lookup.subclasses(&name).await;
            (position, name, probe)
        });
    }

    let mut has_children = vec![false; names.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((position, _, Ok(grandchildren))) => {
                has_children[position] = !grandchildren.is_empty();
            }
            Ok((_, name, Err(e))) => {
                warn!(parent = node, child = %name, "Probe failed, showing as leaf: {}", e);
            }
            Err(e) => {
                warn!(parent = node, "Probe task aborted: {}", e);
            }
        }
    }

    Ok(names
        .into_iter()
        .zip(has_children)
        .map(|(name, has_children)| SchemaNode::unfetched(name, has_children))
        .collect())
}
