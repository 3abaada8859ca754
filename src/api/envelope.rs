//! Unwrapping of the `{"response": {...}}` envelope every API reply carries.

use serde_json::{Map, Value};

use crate::api::entities::{Operation, ResourceKind};
use crate::api::errors::{Error, Result};
use crate::api::identity::IdentityFields;

/// Parses a raw body and returns the value under its `response` key.
pub fn unwrap(raw: &str) -> Result<Value> {
    let body: Value = serde_json::from_str(raw)?;
    match body {
        Value::Object(mut root) => root
            .remove("response")
            .ok_or_else(|| Error::MalformedEnvelope("missing `response` key".into())),
        _ => Err(Error::MalformedEnvelope(
            "response body is not a JSON object".into(),
        )),
    }
}

/// An unwrapped envelope classified by whether it carries type-scoped data.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeShape {
    /// `envelope[type]` was present.
    Typed {
        identity: IdentityFields,
        body: Map<String, Value>,
    },
    /// Flat results, passed through untouched.
    Raw(Value),
}

impl EnvelopeShape {
    pub fn parse(envelope: Value, kind: ResourceKind) -> Result<Self> {
        let Value::Object(mut fields) = envelope else {
            return Ok(EnvelopeShape::Raw(envelope));
        };
        match fields.remove(kind.as_str()) {
            Some(Value::Object(body)) => {
                let identity = IdentityFields::new(string_field(&body, "id"), string_field(&body, "name"));
                Ok(EnvelopeShape::Typed { identity, body })
            }
            Some(Value::Null) => {
                fields.insert(kind.as_str().to_string(), Value::Null);
                Ok(EnvelopeShape::Raw(Value::Object(fields)))
            }
            Some(other) => Err(Error::MalformedEnvelope(format!(
                "`{kind}` is not an object: {other}"
            ))),
            None => Ok(EnvelopeShape::Raw(Value::Object(fields))),
        }
    }
}

/// Payload of a call plus the identity the server echoed back, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped {
    pub identity: Option<IdentityFields>,
    pub payload: Value,
}

/// Extracts the payload `operation` expects from an unwrapped envelope.
pub fn reshape(envelope: Value, kind: ResourceKind, operation: Operation) -> Result<Reshaped> {
    match EnvelopeShape::parse(envelope, kind)? {
        EnvelopeShape::Raw(payload) => Ok(Reshaped {
            identity: None,
            payload,
        }),
        EnvelopeShape::Typed { identity, body } => {
            let payload = typed_payload(body, kind, operation)?;
            Ok(Reshaped {
                identity: Some(identity),
                payload,
            })
        }
    }
}

fn typed_payload(
    mut body: Map<String, Value>,
    kind: ResourceKind,
    operation: Operation,
) -> Result<Value> {
    if operation == Operation::Profile {
        // some replies nest the profile fields one level down
        if let Some(Value::Object(nested)) = body.get(Operation::Profile.as_str()) {
            let nested = nested.clone();
            body.remove(Operation::Profile.as_str());
            body.extend(nested);
        }
        return Ok(Value::Object(body));
    }

    if kind == ResourceKind::Song {
        return body
            .remove("songs")
            .and_then(|songs| match songs {
                Value::Array(mut items) if !items.is_empty() => Some(items.swap_remove(0)),
                _ => None,
            })
            .ok_or_else(|| {
                Error::MalformedEnvelope(format!("`song` has no `songs[0]` for {operation}"))
            });
    }

    body.remove(operation.as_str()).ok_or_else(|| {
        Error::MalformedEnvelope(format!("`{kind}` is missing `{operation}`"))
    })
}

fn string_field(body: &Map<String, Value>, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_returns_response_value() {
        let envelope = unwrap(r#"{"response": {"status": {"code": 0}}}"#).unwrap();
        assert_eq!(envelope, json!({"status": {"code": 0}}));
    }

    #[test]
    fn unwrap_rejects_bad_bodies() {
        assert!(matches!(unwrap("not json"), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(unwrap(r#"{"status": 0}"#), Err(Error::MalformedEnvelope(_))));
        assert!(matches!(unwrap("[1, 2]"), Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn profile_lifts_nested_fields() {
        let envelope = json!({"artist": {"id": "1", "name": "A", "profile": {"familiarity": 0.9}}});
        let reshaped = reshape(envelope, ResourceKind::Artist, Operation::Profile).unwrap();
        assert_eq!(reshaped.payload, json!({"id": "1", "name": "A", "familiarity": 0.9}));
        assert_eq!(
            reshaped.identity,
            Some(IdentityFields::new(Some("1".into()), Some("A".into())))
        );
    }

    #[test]
    fn profile_returns_whole_object() {
        let envelope = json!({"artist": {"id": "1", "name": "A", "hotttnesss": 0.5}});
        let reshaped = reshape(envelope, ResourceKind::Artist, Operation::Profile).unwrap();
        assert_eq!(reshaped.payload, json!({"id": "1", "name": "A", "hotttnesss": 0.5}));
    }

    #[test]
    fn operation_payload_is_keyed_by_operation() {
        let envelope = json!({
            "status": {"code": 0},
            "artist": {"id": "AR1", "biographies": [{"text": "..."}]}
        });
        let reshaped = reshape(envelope, ResourceKind::Artist, Operation::Biographies).unwrap();
        assert_eq!(reshaped.payload, json!([{"text": "..."}]));
        assert_eq!(
            reshaped.identity,
            Some(IdentityFields::new(Some("AR1".into()), None))
        );
    }

    #[test]
    fn song_payload_is_first_song() {
        let envelope = json!({"song": {"id": "S1", "songs": [{"title": "T"}, {"title": "U"}]}});
        let reshaped = reshape(envelope, ResourceKind::Song, Operation::Identify).unwrap();
        assert_eq!(reshaped.payload, json!({"title": "T"}));
    }

    #[test]
    fn song_without_songs_is_malformed() {
        let empty = json!({"song": {"id": "S1", "songs": []}});
        assert!(matches!(
            reshape(empty, ResourceKind::Song, Operation::Identify),
            Err(Error::MalformedEnvelope(_))
        ));
        let missing = json!({"song": {"id": "S1"}});
        assert!(matches!(
            reshape(missing, ResourceKind::Song, Operation::Identify),
            Err(Error::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn missing_operation_key_is_malformed() {
        let envelope = json!({"artist": {"id": "AR1"}});
        assert!(matches!(
            reshape(envelope, ResourceKind::Artist, Operation::Similar),
            Err(Error::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn null_type_key_passes_through() {
        let envelope = json!({"status": {"code": 0}, "artist": null});
        let reshaped = reshape(envelope.clone(), ResourceKind::Artist, Operation::Profile).unwrap();
        assert_eq!(reshaped.payload, envelope);
        assert!(reshaped.identity.is_none());
    }

    #[test]
    fn flat_results_pass_through() {
        let envelope = json!({"status": {"code": 0}, "artists": [{"id": "1"}]});
        let reshaped = reshape(envelope.clone(), ResourceKind::Artist, Operation::Similar).unwrap();
        assert_eq!(reshaped.payload, envelope);
        assert!(reshaped.identity.is_none());
    }
}
