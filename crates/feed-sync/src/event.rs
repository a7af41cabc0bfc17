//! Activity event model
//!
//! An `Event` is built from one loosely-typed record of the GitHub events
//! API. The typed fields are extracted once; the whole record is kept so it
//! can be written back to the cache without losing anything.

use serde_json::{Map, Value};

/// One normalized activity record
///
/// Immutable once parsed: all fields are private and only exposed through
/// accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    kind: String,
    actor_name: String,
    repo_name: String,
    avatar_url: Option<String>,
    raw_payload: Map<String, Value>,
}

impl Event {
    /// Parse an event from a raw record
    ///
    /// Requires `type`, `actor.display_login` (or `actor.login`) and
    /// `repo.name` to be non-empty strings. `actor.avatar_url` is optional
    /// and kept only when it is an http(s) URL. Returns `None` for anything
    /// else.
    pub fn parse(record: Value) -> Option<Self> {
        let Value::Object(raw_payload) = record else {
            return None;
        };

        let kind = non_empty_str(raw_payload.get("type"))?;

        let actor = raw_payload.get("actor")?.as_object()?;
        let actor_name = non_empty_str(actor.get("display_login"))
            .or_else(|| non_empty_str(actor.get("login")))?;
        let avatar_url = non_empty_str(actor.get("avatar_url")).filter(|url| is_http_url(url));

        let repo = raw_payload.get("repo")?.as_object()?;
        let repo_name = non_empty_str(repo.get("name"))?;

        Some(Self {
            kind,
            actor_name,
            repo_name,
            avatar_url,
            raw_payload,
        })
    }

    /// Parse every element of a JSON array, dropping malformed records
    ///
    /// Anything other than an array yields an empty batch.
    pub fn parse_batch(records: Value) -> Vec<Self> {
        match records {
            Value::Array(items) => Self::from_records(items),
            other => {
                log::debug!("Expected an array of events, got {}", value_kind(&other));
                Vec::new()
            }
        }
    }

    /// Parse a list of records, dropping malformed ones
    pub fn from_records(records: Vec<Value>) -> Vec<Self> {
        let total = records.len();
        let events: Vec<Self> = records.into_iter().filter_map(Self::parse).collect();

        if events.len() < total {
            log::debug!(
                "Dropped {} malformed event record(s) out of {}",
                total - events.len(),
                total
            );
        }

        events
    }

    /// Serialize back to the raw record shape
    pub fn to_record(&self) -> Value {
        Value::Object(self.raw_payload.clone())
    }

    /// Activity category, e.g. "PushEvent"
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Acting user's display name
    pub fn actor_name(&self) -> &str {
        &self.actor_name
    }

    /// Repository in `owner/name` form
    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    pub fn raw_payload(&self) -> &Map<String, Value> {
        &self.raw_payload
    }

    /// Kind without the trailing "Event", lower-cased ("PushEvent" -> "push")
    pub fn humanized_action(&self) -> String {
        self.kind.replace("Event", "").to_lowercase()
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
