use crate::error::LookupResult;
use async_trait::async_trait;
use std::fmt;

/// Property name of the is-a edge between a subtype and its supertype.
pub const SUBCLASS_OF: &str = "subClassOf";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Arcs pointing into the queried node
    Incoming,
    /// Arcs leaving the queried node
    Outgoing,
}

/// A relation to follow from a queried node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Relation {
    pub property: String,
    pub direction: Direction,
}

impl Relation {
    pub fn new(property: impl Into<String>, direction: Direction) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    /// Direct subtypes: every `X` such that `X subClassOf node`.
    pub fn subclasses() -> Self {
        Self::new(SUBCLASS_OF, Direction::Incoming)
    }

    /// Property expression understood by the Data Commons v2 API (`<-subClassOf`, `->name`).
    pub fn expression(&self) -> String {
        match self.direction {
            Direction::Incoming => format!("<-{}", self.property),
            Direction::Outgoing => format!("->{}", self.property),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression())
    }
}

/// Remote graph-query endpoint the hierarchy is read from.
///
/// Implementations return the identifiers related to `node` by `relation`, in the
/// order the service reports them. An unknown node or an empty relation is an empty
/// list, not an error.
#[async_trait]
pub trait LookupService: Send + Sync {
    async fn related(&self, node: &str, relation: &Relation) -> LookupResult<Vec<String>>;

    /// Direct children of `node` in the is-a hierarchy.
    async fn subclasses(&self, node: &str) -> LookupResult<Vec<String>> {
        self.related(node, &Relation::subclasses()).await
    }
}
