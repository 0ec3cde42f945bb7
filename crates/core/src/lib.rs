pub mod browser;
pub mod config;
pub mod datacommons;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod tree;

pub use browser::{ExpandOutcome, ExpandResult, SchemaBrowser};
pub use config::{ApiKey, BrowserConfig, LookupConfig};
pub use datacommons::DataCommonsClient;
pub use error::{Result, SchemascopeError};
pub use navigation::NavigationEngine;
pub use tree::{SchemaTree, SchemaTreeBuilder, SpliceOutcome, TreeNode};
