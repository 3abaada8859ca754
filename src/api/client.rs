use std::sync::Arc;

use log::debug;

use crate::api::entities::{Credentials, DEFAULT_API_PATH_PREFIX, ResourceDescriptor, ResourceKind, ResourceParams};
use crate::api::errors::{Error, Result};
use crate::api::query::Query;
use crate::api::resource::{ApiContext, Resource, ResourceFactory};
use crate::api::search::Search;
use crate::api::transport::{HttpTransport, Transport};

pub const API_KEY_ENV: &str = "ECHONEST_API_KEY";
pub const HOST_ENV: &str = "ECHONEST_HOST";

/// Entry point: holds the API key and host and builds resources from them.
#[derive(Clone)]
pub struct Client {
    credentials: Arc<Credentials>,
    artist: ResourceFactory,
    track: ResourceFactory,
    song: ResourceFactory,
    artist_search: Search,
    song_search: Search,
}

impl Client {
    /// Client for the public API host.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    pub fn with_host(api_key: impl Into<String>, host: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).host(host).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    // Create a client from environment variables or raise a configuration error
    pub fn try_default() -> Result<Self> {
        ClientBuilder::new().build()
    }

    pub fn api_key(&self) -> &str {
        &self.credentials.api_key
    }

    pub fn host(&self) -> &str {
        &self.credentials.host
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn artist(&self, params: ResourceParams) -> Result<Resource> {
        self.artist.construct(params)
    }

    pub fn track(&self, params: ResourceParams) -> Result<Resource> {
        self.track.construct(params)
    }

    pub fn song(&self, params: ResourceParams) -> Result<Resource> {
        self.song.construct(params)
    }

    pub fn factory(&self, kind: ResourceKind) -> &ResourceFactory {
        match kind {
            ResourceKind::Artist => &self.artist,
            ResourceKind::Track => &self.track,
            ResourceKind::Song => &self.song,
        }
    }

    /// Builds a resource of any kind from its params.
    pub fn resource(&self, kind: ResourceKind, params: ResourceParams) -> Result<Resource> {
        self.factory(kind).construct(params)
    }

    pub async fn search_artists(&self, options: Option<Query>) -> Result<Vec<Resource>> {
        self.artist_search.run(options).await
    }

    pub async fn search_songs(&self, options: Option<Query>) -> Result<Vec<Resource>> {
        self.song_search.run(options).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("host", &self.credentials.host)
            .field("api_path_prefix", &self.credentials.api_path_prefix)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct ClientBuilder {
    api_key: Option<String>,
    host: Option<String>,
    api_path_prefix: Option<String>,
    transport: Option<Arc<dyn Transport>>,
}

impl ClientBuilder {
    pub fn new() -> Self {
        ClientBuilder::default()
    }

    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    #[must_use]
    pub fn api_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_path_prefix = Some(prefix.into());
        self
    }

    /// Replaces the default `reqwest` transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client, taking the key and host from `ECHONEST_API_KEY`
    /// and `ECHONEST_HOST` when they were not set explicitly.
    pub fn build(self) -> Result<Client> {
        self.build_with_env(|key| std::env::var(key).ok())
    }

    fn build_with_env(self, env: impl Fn(&str) -> Option<String>) -> Result<Client> {
        let api_key = match self.api_key {
            Some(key) => key,
            None => env(API_KEY_ENV).ok_or_else(|| {
                Error::ConfigurationError(format!("missing API key, set {API_KEY_ENV}"))
            })?,
        };
        let host = self.host.or_else(|| env(HOST_ENV));
        let mut credentials = Credentials::new(api_key, host);
        credentials.api_path_prefix = self
            .api_path_prefix
            .unwrap_or_else(|| DEFAULT_API_PATH_PREFIX.to_string());
        let credentials = Arc::new(credentials);

        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new()?),
        };
        let context = ApiContext::new(credentials.clone(), transport);

        let factory = |kind| ResourceFactory::new(ResourceDescriptor::builtin(kind), context.clone());
        let artist = factory(ResourceKind::Artist)?;
        let track = factory(ResourceKind::Track)?;
        let song = factory(ResourceKind::Song)?;

        debug!(
            "Built client for http://{}/{}",
            credentials.host, credentials.api_path_prefix
        );
        Ok(Client {
            credentials,
            artist_search: Search::new(artist.clone()),
            song_search: Search::new(song.clone()),
            artist,
            track,
            song,
        })
    }
}
