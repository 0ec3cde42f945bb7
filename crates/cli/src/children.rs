use crate::shell::view::ShellNodeView;
use schemascope_core::config::BrowserConfig;
use tabled::{settings::Style, Table};

pub async fn run(config: BrowserConfig, path: String) -> Result<(), Box<dyn std::error::Error>> {
    let browser = schemascope_runtime::build_default_browser(&config)?;
    browser.initialize_root().await?;

    let id = browser.expand_path(&path).await?;
    let tree = browser.expand_node(id).await?.tree;

    let rows: Vec<ShellNodeView> = tree
        .children(id)
        .into_iter()
        .filter_map(|c| {
            let view = tree.view(c)?;
            let path = tree.path(c)?;
            Some(ShellNodeView::from_view(&view, false, path))
        })
        .collect();

    if rows.is_empty() {
        println!("'{}' has no subclasses.", path);
    } else {
        println!("{}", Table::new(&rows).with(Style::psql()));
    }
    Ok(())
}
