//! Rnest - client for the Echo Nest music metadata API
//!
//! Resources (artists, tracks, songs) are addressed by id or name and expose
//! the operations the API serves for their kind. Replies are unwrapped from
//! the API's response envelope and the resource's identity is refreshed from
//! what the server echoes back.

/// Client, resource factory and their collaborators
pub mod api;

pub use api::{Client, Error, Operation, Query, Resource, ResourceKind, ResourceParams, Result};
