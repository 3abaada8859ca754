//! Resource construction and per-operation dispatch.
//!
//! A [`ResourceFactory`] is built once per resource kind from its
//! [`ResourceDescriptor`]. Every [`Resource`] it hands out shares the
//! factory's credentials and transport, carries its own identity, and
//! exposes the descriptor's operations through [`Resource::call`] and the
//! named shortcuts.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::api::entities::{Credentials, Operation, ResourceDescriptor, ResourceKind, ResourceParams};
use crate::api::envelope;
use crate::api::errors::{Error, Result};
use crate::api::identity::IdentityFields;
use crate::api::query::Query;
use crate::api::transport::Transport;

/// Credentials and transport shared by everything a client builds.
#[derive(Clone)]
pub(crate) struct ApiContext {
    pub(crate) credentials: Arc<Credentials>,
    pub(crate) transport: Arc<dyn Transport>,
}

impl ApiContext {
    pub(crate) fn new(credentials: Arc<Credentials>, transport: Arc<dyn Transport>) -> Self {
        ApiContext {
            credentials,
            transport,
        }
    }

    /// Sends `query` to the endpoint and returns the unwrapped envelope.
    pub(crate) async fn fetch(
        &self,
        kind: ResourceKind,
        operation: Operation,
        mut query: Query,
    ) -> Result<Value> {
        query.insert("api_key", self.credentials.api_key.as_str());
        query.insert("format", "json");
        let url = format!(
            "{}{}",
            self.credentials.endpoint(kind, operation),
            query.encode()
        );
        let body = self.transport.get(&url).await?;
        envelope::unwrap(&body)
    }
}

/// Builds [`Resource`]s of one kind.
#[derive(Clone)]
pub struct ResourceFactory {
    descriptor: Arc<ResourceDescriptor>,
    context: ApiContext,
}

impl ResourceFactory {
    pub(crate) fn new(descriptor: ResourceDescriptor, context: ApiContext) -> Result<Self> {
        validate(&descriptor)?;
        Ok(ResourceFactory {
            descriptor: Arc::new(descriptor),
            context,
        })
    }

    pub fn kind(&self) -> ResourceKind {
        self.descriptor.kind
    }

    pub fn descriptor(&self) -> &ResourceDescriptor {
        &self.descriptor
    }

    /// Creates a resource addressed by the id or name in `params`.
    ///
    /// Fails with [`Error::MissingIdentity`] when neither is given; nothing
    /// is sent over the wire in that case.
    pub fn construct(&self, params: ResourceParams) -> Result<Resource> {
        let resource = self.seed(params);
        resource.identity().resolve()?;
        Ok(resource)
    }

    // Search hits may arrive without id or name; calls on them fail later
    pub(crate) fn seed(&self, params: ResourceParams) -> Resource {
        Resource {
            identity: RwLock::new(IdentityFields::new(params.id, params.name)),
            attributes: params.attributes,
            factory: self.clone(),
        }
    }

    pub(crate) fn context(&self) -> &ApiContext {
        &self.context
    }
}

fn validate(descriptor: &ResourceDescriptor) -> Result<()> {
    if descriptor.operations.is_empty() {
        return Err(Error::InvalidDescriptor {
            kind: descriptor.kind,
            reason: "no operations declared".into(),
        });
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = descriptor.operations.iter().find(|op| !seen.insert(**op)) {
        return Err(Error::InvalidDescriptor {
            kind: descriptor.kind,
            reason: format!("operation {duplicate} declared twice"),
        });
    }
    Ok(())
}

/// Client-side handle on one remote artist, track or song.
pub struct Resource {
    identity: RwLock<IdentityFields>,
    attributes: Map<String, Value>,
    factory: ResourceFactory,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.factory.kind()
    }

    pub fn id(&self) -> Option<String> {
        self.identity().id
    }

    pub fn name(&self) -> Option<String> {
        self.identity().name
    }

    /// Snapshot of the current id/name pair.
    pub fn identity(&self) -> IdentityFields {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fields other than id and name the resource was seeded with.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn operations(&self) -> &[Operation] {
        &self.factory.descriptor.operations
    }

    /// Runs `operation` against this resource.
    ///
    /// `options` are merged over the identity parameter, so an explicit `id`
    /// or `name` option wins. On success the id and name echoed by the server
    /// replace the current ones; failures leave the identity untouched.
    pub async fn call(&self, operation: Operation, options: Option<Query>) -> Result<Value> {
        let kind = self.kind();
        if !self.factory.descriptor.supports(operation) {
            return Err(Error::UnsupportedOperation { kind, operation });
        }

        let mut query = self.identity().resolve()?.to_query();
        if let Some(options) = options {
            query.merge(options);
        }

        let envelope = self.factory.context.fetch(kind, operation, query).await?;
        let reshaped = envelope::reshape(envelope, kind, operation)?;
        if let Some(update) = reshaped.identity {
            self.identity
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .refresh(update);
        }
        Ok(reshaped.payload)
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let identity = self.identity();
        f.debug_struct("Resource")
            .field("kind", &self.kind())
            .field("id", &identity.id)
            .field("name", &identity.name)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

macro_rules! operation_shortcuts {
    ($($method:ident => $op:ident),* $(,)?) => {
        impl Resource {
            $(
                #[doc = concat!("Shortcut for [`Resource::call`] with [`Operation::", stringify!($op), "`].")]
                pub async fn $method(&self, options: Option<Query>) -> Result<Value> {
                    self.call(Operation::$op, options).await
                }
            )*
        }
    };
}

operation_shortcuts! {
    audio => Audio,
    biographies => Biographies,
    blogs => Blogs,
    familiarity => Familiarity,
    hotttnesss => Hotttnesss,
    images => Images,
    news => News,
    profile => Profile,
    reviews => Reviews,
    similar => Similar,
    songs => Songs,
    terms => Terms,
    urls => Urls,
    video => Video,
    analyze => Analyze,
    identify => Identify,
}
