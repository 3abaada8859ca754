use thiserror::Error;

use crate::api::entities::{Operation, ResourceKind};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Resource has neither an id nor a name to address it by")]
    MissingIdentity,

    #[error("Invalid resource descriptor for {kind}: {reason}")]
    InvalidDescriptor { kind: ResourceKind, reason: String },

    #[error("Operation {operation} is not available on {kind}")]
    UnsupportedOperation {
        kind: ResourceKind,
        operation: Operation,
    },

    #[error("Transport failure, HTTP status {0}")]
    TransportFailure(u16),

    #[error("Connection error: {0}")]
    Connection(#[from] reqwest::Error),

    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// HTTP status carried by a transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::TransportFailure(status) => Some(*status),
            Error::Connection(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedEnvelope(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
