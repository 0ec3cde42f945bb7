use clap::error::ErrorKind;
use clap::Parser;

/// Helper struct for Clap parsing within the shell
#[derive(Parser, Clone, Debug, PartialEq)]
#[command(no_binary_name = true)]
pub enum ShellCommand {
    /// List the subclasses of a class (fetching them if needed)
    Ls {
        /// Target class (optional, defaults to the current class)
        node: Option<String>,
        /// Use long listing format
        #[arg(short, long)]
        long: bool,
    },
    /// Change the current class
    Cd {
        /// Target path: /, .., #id, a name path or a name
        path: String,
    },
    /// Print the path of the current class
    Pwd,
    /// Open a class and fetch its subclasses
    Expand {
        /// Target class (optional, defaults to the current class)
        node: Option<String>,
    },
    /// Close a class in the tree view
    Collapse {
        /// Target class (optional, defaults to the current class)
        node: Option<String>,
    },
    /// Open a closed class or close an open one
    Toggle {
        /// Target class
        node: String,
    },
    /// Show the tree under a class
    Tree {
        /// Target class (optional, defaults to the current class)
        node: Option<String>,
        /// Expand and open this many levels first
        #[arg(short, long)]
        depth: Option<usize>,
    },
    /// Inspect class details
    Cat {
        /// Target class (optional, defaults to the current class)
        node: Option<String>,
    },
    /// Print the web page of a class
    Open {
        /// Target class (optional, defaults to the current class)
        node: Option<String>,
    },
    /// Discard the loaded hierarchy and load the root again
    Reload,
    /// Clear the screen
    Clear,
}

impl ShellCommand {
    /// Command names derived from the enum, plus the loop-level ones.
    pub fn command_names() -> Vec<String> {
        use clap::CommandFactory;
        let cmd = Self::command();
        let mut names = vec!["help".to_string(), "exit".to_string(), "quit".to_string()];
        names.extend(cmd.get_subcommands().map(|s| s.get_name().to_string()));
        names
    }

    /// Commands whose positional argument is a class path.
    pub fn takes_node(name: &str) -> bool {
        matches!(
            name,
            "ls" | "cd" | "expand" | "collapse" | "toggle" | "tree" | "cat" | "open"
        )
    }
}

pub fn parse_shell_command(
    input: &str,
) -> Result<Option<ShellCommand>, Box<dyn std::error::Error>> {
    // Use shlex to split arguments while respecting quotes
    let args = shlex::split(&escape_ids(input)).ok_or("Invalid quoting")?;

    match ShellCommand::try_parse_from(args) {
        Ok(c) => Ok(Some(c)),
        Err(e) => {
            // Handle help/version display without returning an error
            if e.kind() == ErrorKind::DisplayHelp || e.kind() == ErrorKind::DisplayVersion {
                println!("{}", e);
                return Ok(None);
            }
            Err(Box::new(e))
        }
    }
}

/// `#12` addresses a node by id; keep shlex from reading it as a comment.
fn escape_ids(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut quote = None;
    let mut prev = ' ';
    for ch in input.chars() {
        match (quote, ch) {
            (None, '\'' | '"') => quote = Some(ch),
            (Some(q), c) if c == q => quote = None,
            (None, '#') if prev.is_whitespace() => out.push('\\'),
            _ => {}
        }
        out.push(ch);
        prev = ch;
    }
    out
}
