use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_HOST: &str = "developer.echonest.com";
pub const DEFAULT_API_PATH_PREFIX: &str = "api/v4";

/// Remote entity categories the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Artist,
    Track,
    Song,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Artist => "artist",
            ResourceKind::Track => "track",
            ResourceKind::Song => "song",
        }
    }

    // Key search responses list their hits under
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Artist => "artists",
            ResourceKind::Track => "tracks",
            ResourceKind::Song => "songs",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artist" | "artists" => Ok(ResourceKind::Artist),
            "track" | "tracks" => Ok(ResourceKind::Track),
            "song" | "songs" => Ok(ResourceKind::Song),
            other => Err(format!("unknown resource type: {other}")),
        }
    }
}

/// Named GET endpoints scoped to a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Audio,
    Biographies,
    Blogs,
    Familiarity,
    Hotttnesss,
    Images,
    News,
    Profile,
    Reviews,
    Similar,
    Songs,
    Terms,
    Urls,
    Video,
    Analyze,
    Identify,
    Search,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Audio => "audio",
            Operation::Biographies => "biographies",
            Operation::Blogs => "blogs",
            Operation::Familiarity => "familiarity",
            Operation::Hotttnesss => "hotttnesss",
            Operation::Images => "images",
            Operation::News => "news",
            Operation::Profile => "profile",
            Operation::Reviews => "reviews",
            Operation::Similar => "similar",
            Operation::Songs => "songs",
            Operation::Terms => "terms",
            Operation::Urls => "urls",
            Operation::Video => "video",
            Operation::Analyze => "analyze",
            Operation::Identify => "identify",
            Operation::Search => "search",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s {
            "audio" => Operation::Audio,
            "biographies" => Operation::Biographies,
            "blogs" => Operation::Blogs,
            "familiarity" => Operation::Familiarity,
            "hotttnesss" => Operation::Hotttnesss,
            "images" => Operation::Images,
            "news" => Operation::News,
            "profile" => Operation::Profile,
            "reviews" => Operation::Reviews,
            "similar" => Operation::Similar,
            "songs" => Operation::Songs,
            "terms" => Operation::Terms,
            "urls" => Operation::Urls,
            "video" => Operation::Video,
            "analyze" => Operation::Analyze,
            "identify" => Operation::Identify,
            "search" => Operation::Search,
            other => return Err(format!("unknown operation: {other}")),
        };
        Ok(op)
    }
}

const ARTIST_OPERATIONS: &[Operation] = &[
    Operation::Audio,
    Operation::Biographies,
    Operation::Blogs,
    Operation::Familiarity,
    Operation::Hotttnesss,
    Operation::Images,
    Operation::News,
    Operation::Profile,
    Operation::Reviews,
    Operation::Similar,
    Operation::Songs,
    Operation::Terms,
    Operation::Urls,
    Operation::Video,
];

const TRACK_OPERATIONS: &[Operation] = &[Operation::Profile, Operation::Analyze];

const SONG_OPERATIONS: &[Operation] = &[Operation::Profile, Operation::Identify];

/// Declares which operations a resource kind supports, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub operations: Vec<Operation>,
}

impl ResourceDescriptor {
    pub fn new(kind: ResourceKind, operations: impl Into<Vec<Operation>>) -> Self {
        ResourceDescriptor {
            kind,
            operations: operations.into(),
        }
    }

    /// Descriptor for the operations the v4 API serves for `kind`.
    pub fn builtin(kind: ResourceKind) -> Self {
        let operations = match kind {
            ResourceKind::Artist => ARTIST_OPERATIONS,
            ResourceKind::Track => TRACK_OPERATIONS,
            ResourceKind::Song => SONG_OPERATIONS,
        };
        ResourceDescriptor::new(kind, operations)
    }

    pub fn supports(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }
}

/// Static API access settings shared by every resource of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub host: String,
    pub api_path_prefix: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, host: Option<String>) -> Self {
        Credentials {
            api_key: api_key.into(),
            host: host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            api_path_prefix: DEFAULT_API_PATH_PREFIX.to_string(),
        }
    }

    pub fn endpoint(&self, kind: ResourceKind, operation: Operation) -> String {
        format!(
            "http://{host}/{prefix}/{kind}/{operation}",
            host = self.host,
            prefix = self.api_path_prefix.trim_matches('/'),
        )
    }
}

/// Caller-supplied seed for a resource: identity plus any extra fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ResourceParams {
    pub fn with_id(id: impl Into<String>) -> Self {
        ResourceParams {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        ResourceParams {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_descriptors_have_unique_operations() {
        for kind in [ResourceKind::Artist, ResourceKind::Track, ResourceKind::Song] {
            let descriptor = ResourceDescriptor::builtin(kind);
            assert!(!descriptor.operations.is_empty());
            let mut seen = std::collections::HashSet::new();
            assert!(descriptor.operations.iter().all(|op| seen.insert(*op)));
        }
    }

    #[test]
    fn operation_names_parse_back() {
        for op in ARTIST_OPERATIONS.iter().chain(SONG_OPERATIONS).chain(TRACK_OPERATIONS) {
            assert_eq!(op.as_str().parse::<Operation>(), Ok(*op));
        }
        assert!("dance".parse::<Operation>().is_err());
    }

    #[test]
    fn endpoint_uses_host_and_prefix() {
        let creds = Credentials::new("KEY", Some("localhost:8080".into()));
        assert_eq!(
            creds.endpoint(ResourceKind::Artist, Operation::Similar),
            "http://localhost:8080/api/v4/artist/similar"
        );
        let default = Credentials::new("KEY", None);
        assert_eq!(default.host, DEFAULT_HOST);
    }

    #[test]
    fn params_keep_extra_fields() {
        let params: ResourceParams = serde_json::from_value(serde_json::json!({
            "id": "SO1",
            "title": "Karma Police",
        }))
        .unwrap();
        assert_eq!(params.id.as_deref(), Some("SO1"));
        assert!(params.name.is_none());
        assert_eq!(params.attributes["title"], "Karma Police");
    }
}
