//! Data Commons v2 `node` endpoint
//!
//! The only shape the browser needs is "identifiers related to a node by one
//! property", which the v2 API answers as
//! `data.<node>.arcs.<property>.nodes[].dcid`.

mod client;
mod response;

pub use client::DataCommonsClient;
pub use response::related_dcids;
