use crate::models::NodeId;

/// Failures of a single lookup against the remote hierarchy service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Lookup service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Undecodable response: {0}")]
    Decode(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type LookupResult<T> = std::result::Result<T, LookupError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowserError {
    #[error("Hierarchy has not been loaded yet")]
    NotInitialized,
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("No node at path '{0}'")]
    PathNotFound(String),
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BrowserResult<T> = std::result::Result<T, BrowserError>;
