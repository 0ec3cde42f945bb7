use serde_json::Value;

/// Pull `data.<node>.arcs.<property>.nodes[].dcid` out of a v2 `node` response.
///
/// Any missing level (no `data`, unknown node, no such arc, no `nodes`) means the
/// node has no related identifiers. Entries without a string `dcid` are skipped.
pub fn related_dcids(body: &Value, node: &str, property: &str) -> Vec<String> {
    body.get("data")
        .and_then(|d| d.get(node))
        .and_then(|n| n.get("arcs"))
        .and_then(|a| a.get(property))
        .and_then(|p| p.get("nodes"))
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .filter_map(|n| n.get("dcid").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
