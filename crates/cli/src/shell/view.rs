use schemascope_api::{NodeId, NodeView};
use schemascope_core::SchemaTree;
use serde::Serialize;
use tabled::Tabled;

const INDENT: &str = "  ";

/// A terminal-optimized view of a class (Detailed)
#[derive(Tabled)]
pub struct ShellNodeView {
    pub id: String,
    pub marker: String,
    pub name: String,
    pub children: String,
    pub path: String,
}

/// A short view of a class
#[derive(Tabled)]
pub struct ShellNodeViewShort {
    pub marker: String,
    pub name: String,
}

impl ShellNodeView {
    pub fn from_view(view: &NodeView, open: bool, path: String) -> Self {
        // Child count is only known once fetched
        let children = if !view.has_children {
            "-".to_string()
        } else if view.is_fetched {
            view.child_count.to_string()
        } else {
            "?".to_string()
        };

        Self {
            id: view.id.to_string(),
            marker: marker(view.has_children, open).to_string(),
            name: view.name.clone(),
            children,
            path: shorten_path(&path),
        }
    }
}

impl ShellNodeViewShort {
    pub fn from_view(view: &NodeView, open: bool) -> Self {
        Self {
            marker: marker(view.has_children, open).to_string(),
            name: view.name.clone(),
        }
    }
}

/// Output of `cat`: everything known about one class.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDetails {
    pub id: NodeId,
    pub name: String,
    pub path: String,
    pub depth: usize,
    pub has_children: bool,
    pub is_fetched: bool,
    pub child_count: usize,
    pub open: bool,
    pub link: String,
}

/// `[+]` closed expandable, `[-]` open expandable, `•` leaf.
pub fn marker(has_children: bool, open: bool) -> &'static str {
    match (has_children, open) {
        (false, _) => "•",
        (true, true) => "[-]",
        (true, false) => "[+]",
    }
}

/// Indented tree under `start`, descending only into open nodes.
pub fn render_tree(
    tree: &SchemaTree,
    start: NodeId,
    is_open: impl Fn(NodeId) -> bool,
    max_depth: Option<usize>,
) -> String {
    let mut lines = Vec::new();
    render_node(tree, start, 0, &is_open, max_depth, &mut lines);
    lines.join("\n")
}

fn render_node(
    tree: &SchemaTree,
    id: NodeId,
    level: usize,
    is_open: &impl Fn(NodeId) -> bool,
    max_depth: Option<usize>,
    lines: &mut Vec<String>,
) {
    let Some(node) = tree.node(id) else {
        return;
    };
    let open = node.has_children && is_open(id);
    lines.push(format!(
        "{}{} {}",
        INDENT.repeat(level),
        marker(node.has_children, open),
        node.name()
    ));

    if !open || max_depth.is_some_and(|max| level >= max) {
        return;
    }
    for child in tree.children(id) {
        render_node(tree, child, level + 1, is_open, max_depth, lines);
    }
}

/// Abbreviate all but the last two segments: `/Thing/Person/Athlete/X` -> `/T/P/Athlete/X`.
pub fn shorten_path(path: &str) -> String {
    if path.len() <= 30 {
        return path.to_string();
    }
    let parts: Vec<&str> = path.trim_start_matches('/').split('/').collect();
    if parts.len() <= 2 {
        return path.to_string();
    }

    let mut result = String::new();
    for (i, part) in parts.iter().enumerate() {
        result.push('/');
        if i < parts.len() - 2 {
            if let Some(c) = part.chars().next() {
                result.push(c);
            }
        } else {
            result.push_str(part);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemascope_api::SchemaNode;

    fn sample() -> SchemaTree {
        let mut person = SchemaNode::unfetched("Person", true);
        person.is_fetched = true;
        person.children = vec![
            SchemaNode::unfetched("Athlete", false),
            SchemaNode::unfetched("Student", true),
        ];
        SchemaTree::from_schema_node(&SchemaNode {
            name: "Thing".to_string(),
            children: vec![person, SchemaNode::unfetched("Place", false)],
            is_fetched: true,
            has_children: true,
        })
    }

    #[test]
    fn test_markers() {
        assert_eq!(marker(false, true), "•");
        assert_eq!(marker(true, true), "[-]");
        assert_eq!(marker(true, false), "[+]");
    }

    #[test]
    fn test_render_follows_open_state() {
        let tree = sample();
        let person = tree.find_by_name("Person")[0];
        let root = tree.root();

        let collapsed = render_tree(&tree, root, |id| id == root, None);
        assert_eq!(collapsed, "[-] Thing\n  [+] Person\n  • Place");

        let open = render_tree(&tree, root, |id| id == root || id == person, None);
        assert_eq!(
            open,
            "[-] Thing\n  [-] Person\n    • Athlete\n    [+] Student\n  • Place"
        );
    }

    #[test]
    fn test_render_respects_max_depth() {
        let tree = sample();
        let rendered = render_tree(&tree, tree.root(), |_| true, Some(0));
        assert_eq!(rendered, "[-] Thing");
    }

    #[test]
    fn test_detailed_view_child_column() {
        let tree = sample();
        let person = tree.find_by_name("Person")[0];
        let student = tree.find_by_name("Student")[0];
        let place = tree.find_by_name("Place")[0];

        let row = |id| {
            ShellNodeView::from_view(&tree.view(id).unwrap(), false, tree.path(id).unwrap())
        };
        assert_eq!(row(person).children, "2");
        assert_eq!(row(student).children, "?");
        assert_eq!(row(place).children, "-");
        assert_eq!(row(student).path, "/Thing/Person/Student");
    }

    #[test]
    fn test_shorten_path() {
        assert_eq!(shorten_path("/Thing/Person"), "/Thing/Person");
        assert_eq!(
            shorten_path("/Thing/Intangible/StatisticalVariable/Observation"),
            "/T/I/StatisticalVariable/Observation"
        );
    }
}
