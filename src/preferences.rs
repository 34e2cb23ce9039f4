use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Reading preferences inferred from a free-text query.
///
/// All three fields are always present; "nothing inferred" is the empty
/// string, never a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub length: String,
}

impl PreferenceRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether there is anything worth recommending on. Length alone is not
    /// enough to build a recommendation from.
    pub fn has_recommendation(&self) -> bool {
        !self.genre.is_empty() || !self.author.is_empty()
    }
}

/// Why an extraction fell back to the empty record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("completion request failed: {0}")]
    Transport(String),

    #[error("completion is not valid JSON: {0}")]
    NotJson(String),

    #[error("completion JSON is not an object")]
    NotAnObject,

    #[error("field `{field}` holds {found}, expected a string")]
    InvalidField { field: &'static str, found: &'static str },
}

/// Outcome of one extraction attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Extracted(PreferenceRecord),
    Degraded { reason: ExtractionError },
}

impl Extraction {
    /// The record to hand to callers; the empty record when degraded.
    pub fn into_record(self) -> PreferenceRecord {
        match self {
            Extraction::Extracted(record) => record,
            Extraction::Degraded { .. } => PreferenceRecord::empty(),
        }
    }

    /// Why the record had to be degraded, if it was.
    pub fn reason(&self) -> Option<&ExtractionError> {
        match self {
            Extraction::Extracted(_) => None,
            Extraction::Degraded { reason } => Some(reason),
        }
    }
}

/// Parse model output strictly as a JSON object and coerce it into a
/// [`PreferenceRecord`].
///
/// Missing keys and `null` become `""`, numbers and booleans keep their
/// textual form, unknown keys are dropped. Arrays or objects under one of the
/// three keys are rejected.
pub fn parse_preferences(content: &str) -> Result<PreferenceRecord, ExtractionError> {
    let value: Value =
        serde_json::from_str(content).map_err(|e| ExtractionError::NotJson(e.to_string()))?;

    let Value::Object(map) = value else {
        return Err(ExtractionError::NotAnObject);
    };

    Ok(PreferenceRecord {
        genre: string_field(&map, "genre")?,
        author: string_field(&map, "author")?,
        length: string_field(&map, "length")?,
    })
}

fn string_field(map: &Map<String, Value>, field: &'static str) -> Result<String, ExtractionError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(_)) => Err(ExtractionError::InvalidField { field, found: "an array" }),
        Some(Value::Object(_)) => Err(ExtractionError::InvalidField { field, found: "an object" }),
    }
}
