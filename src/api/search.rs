use serde_json::Value;

use crate::api::entities::{Operation, ResourceKind, ResourceParams};
use crate::api::errors::{Error, Result};
use crate::api::query::Query;
use crate::api::resource::{Resource, ResourceFactory};

/// List-returning `search` endpoint for one resource kind.
#[derive(Clone)]
pub struct Search {
    factory: ResourceFactory,
}

impl Search {
    pub fn new(factory: ResourceFactory) -> Self {
        Search { factory }
    }

    pub fn kind(&self) -> ResourceKind {
        self.factory.kind()
    }

    /// Runs the search and builds one resource per hit, in server order.
    ///
    /// Hits are read from the pluralized key of the envelope (`artists`,
    /// `songs`); a missing or non-array value is [`Error::MalformedEnvelope`].
    pub async fn run(&self, options: Option<Query>) -> Result<Vec<Resource>> {
        let kind = self.kind();
        let envelope = self
            .factory
            .context()
            .fetch(kind, Operation::Search, options.unwrap_or_default())
            .await?;

        let hits = match envelope {
            Value::Object(mut fields) => fields.remove(kind.plural()),
            _ => None,
        };
        let Some(Value::Array(hits)) = hits else {
            return Err(Error::MalformedEnvelope(format!(
                "search reply has no `{}` array",
                kind.plural()
            )));
        };

        hits.into_iter()
            .map(|hit| {
                let params: ResourceParams = serde_json::from_value(hit)?;
                Ok(self.factory.seed(params))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::api::entities::{Credentials, ResourceDescriptor};
    use crate::api::resource::ApiContext;
    use crate::api::transport::stub::{StubReply, StubTransport};

    fn search(kind: ResourceKind, transport: Arc<StubTransport>) -> Search {
        let context = ApiContext::new(
            Arc::new(Credentials::new("KEY", Some("api.test".into()))),
            transport,
        );
        Search::new(ResourceFactory::new(ResourceDescriptor::builtin(kind), context).unwrap())
    }

    #[tokio::test]
    async fn hits_become_resources_in_order() {
        let transport = Arc::new(StubTransport::replying([StubTransport::body(json!({
            "response": {"status": {"code": 0}, "artists": [{"id": "1", "name": "A"}, {"id": "2", "name": "B"}]}
        }))]));

        let artists = search(ResourceKind::Artist, transport.clone())
            .run(Some(Query::new().with("name", "radio").with("results", 2u32)))
            .await
            .unwrap();

        let ids: Vec<_> = artists.iter().map(|a| a.id().unwrap()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(artists[1].name().as_deref(), Some("B"));
        assert_eq!(artists[0].kind(), ResourceKind::Artist);
        assert_eq!(
            transport.calls(),
            vec!["http://api.test/api/v4/artist/search?name=radio&results=2&api_key=KEY&format=json"]
        );
    }

    #[tokio::test]
    async fn hits_are_callable_resources() {
        let transport = Arc::new(StubTransport::replying([
            StubTransport::body(json!({"response": {"songs": [{"id": "SO1", "title": "Creep", "artist_name": "Radiohead"}]}})),
            StubTransport::body(json!({"response": {"song": {"id": "SO1", "name": "Creep", "songs": [{"tempo": 92}]}}})),
        ]));

        let songs = search(ResourceKind::Song, transport.clone()).run(None).await.unwrap();
        assert_eq!(songs[0].attributes()["title"], "Creep");

        let payload = songs[0].identify(None).await.unwrap();
        assert_eq!(payload, json!({"tempo": 92}));
        assert_eq!(songs[0].name().as_deref(), Some("Creep"));
        assert!(transport.calls()[1].starts_with("http://api.test/api/v4/song/identify?id=SO1&"));
    }

    #[tokio::test]
    async fn hit_without_identity_fails_on_call() {
        let transport = Arc::new(StubTransport::replying([StubTransport::body(json!({
            "response": {"artists": [{"familiarity": 0.1}]}
        }))]));

        let artists = search(ResourceKind::Artist, transport.clone()).run(None).await.unwrap();

        assert!(artists[0].identity().is_empty());
        assert!(matches!(artists[0].profile(None).await, Err(Error::MissingIdentity)));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_hits_array_is_malformed() {
        let transport = Arc::new(StubTransport::replying([
            StubTransport::body(json!({"response": {"status": {"code": 0}}})),
            StubTransport::body(json!({"response": {"artists": {"id": "1"}}})),
        ]));
        let artists = search(ResourceKind::Artist, transport);

        assert!(matches!(artists.run(None).await, Err(Error::MalformedEnvelope(_))));
        assert!(matches!(artists.run(None).await, Err(Error::MalformedEnvelope(_))));
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let transport = Arc::new(StubTransport::replying([StubReply::Status(500)]));
        let err = search(ResourceKind::Song, transport).run(None).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
