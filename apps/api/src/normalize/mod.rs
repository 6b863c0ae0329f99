//! Response Normalizer — reduces whatever the scoring workflow answered with
//! to a single analysis object.
//!
//! N8N nodes are not consistent about their output: depending on how the
//! workflow ends, the payload arrives as a bare object, an array of items,
//! or nested under `json`, `result` or `body`. The unwrap is permissive
//! about *where* the payload lives and strict about *what* it must contain.
//!
//! Algorithm:
//! 1. Array: empty → error. Otherwise return the first object element that
//!    carries an object-valued `json`, `result` or `body` (in that order), or a
//!    `total_score` of its own. If none does, unwrap the first element anyway.
//! 2. Object: the object-valued `result`, `json` or `body` (in that order),
//!    else the object itself.
//! 3. Anything else → error.
//!
//! The selected object then has a textual `total_score` coerced to a number
//! when it parses as a finite one, gets an empty `scores_breakdown` if it had
//! none, and is rejected if `total_score` is still absent.

use serde_json::{Map, Number, Value};
use thiserror::Error;

pub const TOTAL_SCORE: &str = "total_score";
pub const SCORES_BREAKDOWN: &str = "scores_breakdown";

/// Wrapper precedence when scanning array items.
const ITEM_WRAPPER_KEYS: [&str; 3] = ["json", "result", "body"];
/// Wrapper precedence for a top-level object.
const OBJECT_WRAPPER_KEYS: [&str; 3] = ["result", "json", "body"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("empty response")]
    EmptyResponse,

    #[error("invalid shape: expected an object or an array of objects, got {0}")]
    InvalidShape(&'static str),

    #[error("missing total_score")]
    MissingTotalScore,

    /// The object was located but a known field has the wrong JSON type.
    #[error("malformed result: {0}")]
    MalformedResult(String),
}

/// Normalizes a raw webhook response into the analysis object.
///
/// Fields other than `total_score` and `scores_breakdown` pass through
/// untouched, so an already-normalized object comes back unchanged.
pub fn normalize(raw: &Value) -> Result<Map<String, Value>, NormalizationError> {
    let selected = select_payload(raw)?;
    let Value::Object(object) = selected else {
        return Err(NormalizationError::InvalidShape(kind_of(selected)));
    };

    let mut object = object.clone();
    coerce_total_score(&mut object);
    object
        .entry(SCORES_BREAKDOWN)
        .or_insert_with(|| Value::Object(Map::new()));

    if !object.contains_key(TOTAL_SCORE) {
        return Err(NormalizationError::MissingTotalScore);
    }

    Ok(object)
}

/// Locates the payload inside `raw` without modifying it.
fn select_payload(raw: &Value) -> Result<&Value, NormalizationError> {
    match raw {
        Value::Array(items) => {
            let first = items.first().ok_or(NormalizationError::EmptyResponse)?;
            let matched = items.iter().find_map(|item| {
                let object = item.as_object()?;
                object_wrapped(object, &ITEM_WRAPPER_KEYS).or_else(|| {
                    object.contains_key(TOTAL_SCORE).then_some(item)
                })
            });
            Ok(matched.unwrap_or_else(|| {
                first
                    .as_object()
                    .and_then(|object| object_wrapped(object, &ITEM_WRAPPER_KEYS))
                    .unwrap_or(first)
            }))
        }
        Value::Object(object) => {
            Ok(object_wrapped(object, &OBJECT_WRAPPER_KEYS).unwrap_or(raw))
        }
        other => Err(NormalizationError::InvalidShape(kind_of(other))),
    }
}

/// First of `keys` whose value is itself an object.
fn object_wrapped<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| value.is_object())
}

fn coerce_total_score(object: &mut Map<String, Value>) {
    let Some(Value::String(text)) = object.get(TOTAL_SCORE) else {
        return;
    };
    if let Some(number) = parse_score(text) {
        object.insert(TOTAL_SCORE.to_string(), Value::Number(number));
    }
}

/// Parses a textual score. Integral values become JSON integers so `"75"`
/// compares equal to `75`; non-finite or malformed text yields `None`.
fn parse_score(text: &str) -> Option<Number> {
    let parsed: f64 = text.trim().parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    if parsed.fract() == 0.0 && parsed.abs() < i64::MAX as f64 {
        return Some(Number::from(parsed as i64));
    }
    Number::from_f64(parsed)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
