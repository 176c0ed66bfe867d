use serde::Serialize;
use simd_json::{OwnedValue, StaticNode};

/// A `(key, value)` pair from one of the record's free-form objects.
pub type Field<'a> = (&'a str, &'a OwnedValue);

/// Player record extracted from the stream.
///
/// Only "is a JSON object" is guaranteed. Accessors read the well-known
/// fields (`history`, `simple_information`, `statistics`, `games`) and treat a
/// field of the wrong type as absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlayerData {
    value: OwnedValue,
}

/// Failure reported in-band by the service as `{"error": true, "message": ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceError<'a> {
    pub message: Option<&'a str>,
    pub details: Option<&'a str>,
    pub player_name: Option<&'a str>,
}

impl PlayerData {
    pub fn from_value(value: OwnedValue) -> Self {
        Self { value }
    }

    pub fn as_value(&self) -> &OwnedValue {
        &self.value
    }

    pub fn into_value(self) -> OwnedValue {
        self.value
    }

    pub fn get(&self, key: &str) -> Option<&OwnedValue> {
        match &self.value {
            OwnedValue::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Narrative of the player's career.
    pub fn history(&self) -> Option<&str> {
        self.get("history").and_then(as_str)
    }

    /// Biographical key/values such as team and position.
    pub fn simple_information(&self) -> Option<Vec<Field<'_>>> {
        self.get("simple_information").and_then(object_fields)
    }

    pub fn statistics(&self) -> Option<Vec<Field<'_>>> {
        self.get("statistics").and_then(object_fields)
    }

    /// Notable games in service order. Entries that are not objects have no fields.
    pub fn games(&self) -> Vec<Vec<Field<'_>>> {
        match self.get("games") {
            Some(OwnedValue::Array(games)) => games
                .iter()
                .map(|game| object_fields(game).unwrap_or_default())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn reported_error(&self) -> Option<ServiceError<'_>> {
        match self.get("error") {
            Some(OwnedValue::Static(StaticNode::Bool(true))) => Some(ServiceError {
                message: self.get("message").and_then(as_str),
                details: self.get("details").and_then(as_str),
                player_name: self.get("player_name").and_then(as_str),
            }),
            _ => None,
        }
    }
}

fn as_str(value: &OwnedValue) -> Option<&str> {
    match value {
        OwnedValue::String(s) => Some(s.as_str()),
        _ => None,
    }
}

fn object_fields(value: &OwnedValue) -> Option<Vec<Field<'_>>> {
    match value {
        OwnedValue::Object(map) => Some(map.iter().map(|(k, v)| (k.as_str(), v)).collect()),
        _ => None,
    }
}

/// Renders a value for display: strings verbatim, everything else as JSON.
pub fn display_value(value: &OwnedValue) -> String {
    match value {
        OwnedValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `batting_average` -> `Batting average`.
pub fn humanize_key(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
