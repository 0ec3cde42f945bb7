use super::command::ShellCommand;
use super::context::ShellContext;
use super::view::{render_tree, NodeDetails, ShellNodeView, ShellNodeViewShort};
use schemascope_api::NodeId;
use schemascope_core::{ExpandOutcome, SchemaTree};
use tabled::{settings::Style, Table};

type HandlerResult = Result<String, Box<dyn std::error::Error>>;

pub trait CommandHandler {
    fn handle(&self, cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult;
}

/// Render the subtree under `id` with the shell's open state.
fn render_from(context: &ShellContext, tree: &SchemaTree, id: NodeId) -> String {
    render_tree(tree, id, |n| context.is_open(n), None)
}

fn outcome_note(name: &str, outcome: ExpandOutcome) -> Option<String> {
    match outcome {
        ExpandOutcome::InFlight => Some(format!("'{}' is still being fetched.", name)),
        ExpandOutcome::Superseded => {
            Some("The hierarchy was reloaded meanwhile; try again.".to_string())
        }
        _ => None,
    }
}

pub struct LsHandler;
impl CommandHandler for LsHandler {
    fn handle(&self, cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        let ShellCommand::Ls { node, long } = cmd else {
            return Ok(String::new());
        };
        let id = context.resolve_one(node.as_deref())?;

        // Listing an unfetched class fetches it
        let tree = context.expand(id)?.tree;
        let children = tree.children(id);
        if children.is_empty() {
            let name = tree.node(id).map(|n| n.name().to_string()).unwrap_or_default();
            return Ok(format!("'{}' has no subclasses.", name));
        }

        let table = if *long {
            let rows: Vec<ShellNodeView> = children
                .iter()
                .filter_map(|c| {
                    let view = tree.view(*c)?;
                    let path = tree.path(*c)?;
                    Some(ShellNodeView::from_view(&view, context.is_open(*c), path))
                })
                .collect();
            Table::new(&rows).with(Style::psql()).to_string()
        } else {
            let rows: Vec<ShellNodeViewShort> = children
                .iter()
                .filter_map(|c| tree.view(*c))
                .map(|view| ShellNodeViewShort::from_view(&view, context.is_open(view.id)))
                .collect();
            Table::new(&rows).with(Style::psql()).to_string()
        };
        Ok(table)
    }
}

pub struct CdHandler;
impl CommandHandler for CdHandler {
    fn handle(&self, cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        if let ShellCommand::Cd { path } = cmd {
            let id = context.resolve_one(Some(path.as_str()))?;
            let tree = context.snapshot()?;
            let new_curr = if id == tree.root() { None } else { Some(id) };
            context.set_current_node(new_curr);
        }
        Ok(String::new())
    }
}

pub struct PwdHandler;
impl CommandHandler for PwdHandler {
    fn handle(&self, _cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        let tree = context.snapshot()?;
        let id = context.current_or_root()?;
        Ok(tree.path(id).unwrap_or_else(|| "/".to_string()))
    }
}

pub struct ExpandHandler;
impl CommandHandler for ExpandHandler {
    fn handle(&self, cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        let ShellCommand::Expand { node } = cmd else {
            return Ok(String::new());
        };
        let id = context.resolve_one(node.as_deref())?;
        let tree = context.snapshot()?;
        let name = tree.node(id).map(|n| n.name().to_string()).unwrap_or_default();
        if tree.node(id).is_some_and(|n| !n.has_children) {
            return Ok(format!("'{}' is a leaf.", name));
        }

        context.set_open(id, true);
        let result = context.expand(id)?;
        let rendered = render_from(context, &result.tree, id);
        Ok(match outcome_note(&name, result.outcome) {
            Some(note) => format!("{}\n{}", note, rendered),
            None => rendered,
        })
    }
}

pub struct CollapseHandler;
impl CommandHandler for CollapseHandler {
    fn handle(&self, cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        if let ShellCommand::Collapse { node } = cmd {
            let id = context.resolve_one(node.as_deref())?;
            context.set_open(id, false);
        }
        Ok(String::new())
    }
}

/// Flips the open flag of an expandable class and asks for its children; leaves are ignored.
pub struct ToggleHandler;
impl CommandHandler for ToggleHandler {
    fn handle(&self, cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        let ShellCommand::Toggle { node } = cmd else {
            return Ok(String::new());
        };
        let id = context.resolve_one(Some(node.as_str()))?;
        let tree = context.snapshot()?;
        let Some(target) = tree.node(id) else {
            return Ok(String::new());
        };
        if !target.has_children {
            return Ok(String::new());
        }
        let name = target.name().to_string();

        context.toggle_open(id);
        let result = context.expand(id)?;
        let rendered = render_from(context, &result.tree, id);
        Ok(match outcome_note(&name, result.outcome) {
            Some(note) => format!("{}\n{}", note, rendered),
            None => rendered,
        })
    }
}

pub struct TreeHandler;
impl CommandHandler for TreeHandler {
    fn handle(&self, cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        let ShellCommand::Tree { node, depth } = cmd else {
            return Ok(String::new());
        };
        let id = context.resolve_one(node.as_deref())?;

        match depth {
            Some(depth) => {
                context.expand_to_depth(id, *depth)?;
                let tree = context.snapshot()?;
                for (n, level) in tree.walk(id) {
                    if level < *depth && tree.node(n).is_some_and(|t| t.is_fetched) {
                        context.set_open(n, true);
                    }
                }
                Ok(render_tree(&tree, id, |n| context.is_open(n), Some(*depth)))
            }
            None => {
                let tree = context.snapshot()?;
                Ok(render_from(context, &tree, id))
            }
        }
    }
}

pub struct CatHandler;
impl CommandHandler for CatHandler {
    fn handle(&self, cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        let ShellCommand::Cat { node } = cmd else {
            return Ok(String::new());
        };
        let id = context.resolve_one(node.as_deref())?;
        let tree = context.snapshot()?;
        let view = tree.view(id).ok_or("Node vanished from the hierarchy")?;

        let details = NodeDetails {
            id,
            path: tree.path(id).unwrap_or_default(),
            depth: view.depth,
            has_children: view.has_children,
            is_fetched: view.is_fetched,
            child_count: view.child_count,
            open: context.is_open(id),
            link: context.config.browser_link(&view.name),
            name: view.name,
        };
        Ok(serde_json::to_string_pretty(&details)?)
    }
}

pub struct OpenHandler;
impl CommandHandler for OpenHandler {
    fn handle(&self, cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        let ShellCommand::Open { node } = cmd else {
            return Ok(String::new());
        };
        let id = context.resolve_one(node.as_deref())?;
        let tree = context.snapshot()?;
        let name = tree.node(id).map(|n| n.name()).ok_or("Node vanished from the hierarchy")?;
        Ok(context.config.browser_link(name))
    }
}

pub struct ReloadHandler;
impl CommandHandler for ReloadHandler {
    fn handle(&self, _cmd: &ShellCommand, context: &mut ShellContext) -> HandlerResult {
        let tree = context.reload()?;
        Ok(format!(
            "Hierarchy reloaded. {} subclasses under {}.",
            tree.children(tree.root()).len(),
            context.browser.root_name()
        ))
    }
}

pub struct ClearHandler;
impl CommandHandler for ClearHandler {
    fn handle(&self, _cmd: &ShellCommand, _context: &mut ShellContext) -> HandlerResult {
        // The loop handles `line_editor.clear_screen()`.
        Ok(String::new())
    }
}

pub fn get_handler(cmd: &ShellCommand) -> Box<dyn CommandHandler> {
    match cmd {
        ShellCommand::Ls { .. } => Box::new(LsHandler),
        ShellCommand::Cd { .. } => Box::new(CdHandler),
        ShellCommand::Pwd => Box::new(PwdHandler),
        ShellCommand::Expand { .. } => Box::new(ExpandHandler),
        ShellCommand::Collapse { .. } => Box::new(CollapseHandler),
        ShellCommand::Toggle { .. } => Box::new(ToggleHandler),
        ShellCommand::Tree { .. } => Box::new(TreeHandler),
        ShellCommand::Cat { .. } => Box::new(CatHandler),
        ShellCommand::Open { .. } => Box::new(OpenHandler),
        ShellCommand::Reload => Box::new(ReloadHandler),
        ShellCommand::Clear => Box::new(ClearHandler),
    }
}
