use crate::shell::view::render_tree;
use schemascope_core::config::BrowserConfig;
use tracing::info;

pub async fn run(
    config: BrowserConfig,
    path: Option<String>,
    depth: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let browser = schemascope_runtime::build_default_browser(&config)?;
    browser.initialize_root().await?;

    let id = match path.as_deref() {
        Some(path) => browser.expand_path(path).await?,
        None => browser.snapshot().await?.root(),
    };

    let expanded = browser.expand_to_depth(id, depth).await?;
    info!(expanded, depth, "Tree expanded");

    let tree = browser.snapshot().await?;
    if json {
        let node = tree.to_schema_node(id).ok_or("Node vanished from the hierarchy")?;
        println!("{}", serde_json::to_string_pretty(&node)?);
    } else {
        // Everything fetched within the requested depth is shown open
        let rendered = render_tree(
            &tree,
            id,
            |n| tree.node(n).is_some_and(|t| t.is_fetched),
            Some(depth),
        );
        println!("{}", rendered);
    }
    Ok(())
}
