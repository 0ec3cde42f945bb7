mod children;
mod shell;
mod tree;

use clap::{Args, Parser, Subcommand};
use schemascope_core::config::{ApiKey, BrowserConfig};

#[derive(Parser)]
#[command(
    name = "schemascope",
    version,
    about = "A lazily-expanding browser for the Data Commons class hierarchy",
    long_about = "Schemascope shows the is-a hierarchy of Data Commons classes, starting from a \
                  root class (Thing by default), and fetches each class's subclasses on demand. \
                  Use the interactive shell to explore, or the one-shot commands for scripting."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection settings; each one overrides its environment variable.
#[derive(Args, Clone, Debug, Default)]
pub struct GlobalArgs {
    /// Data Commons API key (overrides SCHEMASCOPE_API_KEY / DC_API_KEY)
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Base URL of the Data Commons API (overrides SCHEMASCOPE_API_BASE)
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// Root class of the hierarchy (overrides SCHEMASCOPE_ROOT)
    #[arg(long, global = true, value_name = "DCID")]
    pub root: Option<String>,
}

impl GlobalArgs {
    pub fn apply(&self, config: &mut BrowserConfig) {
        if let Some(key) = &self.api_key {
            config.lookup.api_key = ApiKey::new(key.clone());
        }
        if let Some(base) = &self.api_base {
            config.lookup.base_url = base.clone();
        }
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive shell over the class hierarchy
    #[command(
        long_about = "Loads the root class and its direct subclasses, then starts a shell where \
                      classes can be listed, expanded, collapsed and inspected. History is kept \
                      in ~/.schemascope/shell/history."
    )]
    Shell,
    /// Print the hierarchy under a class
    #[command(
        long_about = "Expands the hierarchy under PATH (the root by default) DEPTH levels deep \
                      and prints it as an indented tree, or as nested JSON with --json."
    )]
    Tree {
        /// Name path from the root, e.g. /Thing/Person
        #[arg(value_name = "PATH")]
        path: Option<String>,
        /// Number of levels to expand below PATH
        #[arg(long, short, default_value_t = 1)]
        depth: usize,
        /// Print nested JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// List the direct subclasses of a class
    Children {
        /// Name path from the root, e.g. /Thing/Person
        #[arg(value_name = "PATH")]
        path: String,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let component = match &cli.command {
        Commands::Shell => "shell",
        _ => "cli",
    };
    let _guard = schemascope_runtime::init_logging(component, false);

    let mut config = schemascope_runtime::config_from_env();
    cli.global.apply(&mut config);

    let rt = tokio::runtime::Runtime::new()?;

    match cli.command {
        Commands::Shell => shell::run(config, rt.handle().clone()),
        Commands::Tree { path, depth, json } => rt.block_on(tree::run(config, path, depth, json)),
        Commands::Children { path } => rt.block_on(children::run(config, path)),
    }
}
