use crate::api::errors::{Error, Result};
use crate::api::query::Query;

/// How a request addresses its resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Id(String),
    Name(String),
}

impl Identity {
    pub fn key(&self) -> &'static str {
        match self {
            Identity::Id(_) => "id",
            Identity::Name(_) => "name",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Identity::Id(v) | Identity::Name(v) => v,
        }
    }

    pub fn to_query(&self) -> Query {
        Query::new().with(self.key(), self.value())
    }
}

/// The id/name pair a resource carries between calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityFields {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl IdentityFields {
    pub fn new(id: Option<String>, name: Option<String>) -> Self {
        IdentityFields { id, name }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.name.is_none()
    }

    /// Picks the id when present, the name otherwise. Empty strings count as absent.
    pub fn resolve(&self) -> Result<Identity> {
        let id = self.id.as_ref().filter(|v| !v.is_empty());
        let name = self.name.as_ref().filter(|v| !v.is_empty());
        match (id, name) {
            (Some(id), _) => Ok(Identity::Id(id.clone())),
            (None, Some(name)) => Ok(Identity::Name(name.clone())),
            (None, None) => Err(Error::MissingIdentity),
        }
    }

    // Absent values in `update` never clear a known field
    pub fn refresh(&mut self, update: IdentityFields) {
        if let Some(id) = update.id {
            self.id = Some(id);
        }
        if let Some(name) = update.name {
            self.name = Some(name);
        }
    }
}
