/// Top-level client and its builder
pub mod client;
/// Resource kinds, operations, descriptors and credentials
pub mod entities;
/// Response envelope unwrapping and reshaping
pub mod envelope;
/// Error types and result aliases
pub mod errors;
/// Id/name addressing of resources
pub mod identity;
/// Query string building
pub mod query;
/// Resource factory and per-operation dispatch
pub mod resource;
/// Search endpoints returning lists of resources
pub mod search;
/// HTTP transport boundary
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use entities::{Credentials, Operation, ResourceDescriptor, ResourceKind, ResourceParams};
pub use errors::{Error, Result};
pub use query::{Query, QueryValue};
pub use resource::{Resource, ResourceFactory};
pub use search::Search;
pub use transport::{HttpTransport, Transport};
