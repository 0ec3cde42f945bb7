pub mod error;
pub mod lookup;
pub mod models;
pub mod navigation;

// Re-export commonly used types
pub use error::{BrowserError, BrowserResult, LookupError, LookupResult};
pub use lookup::{Direction, LookupService, Relation, SUBCLASS_OF};
pub use models::*;
pub use navigation::{NavigationService, ResolveResult};
