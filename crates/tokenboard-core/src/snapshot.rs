//! Persisted board snapshot and its defensive decoder.
//!
//! The wire format is `{ "tokens": [...], "defaultTokenPx": n }`. Saved
//! boards come from older page versions and from hand edits, so decoding
//! validates every field on its own and never fails: anything unreadable
//! falls back to a documented default, and an unreadable document yields an
//! empty board.

use crate::geometry::{clamp_token_size, round_half_up, DEFAULT_TOKEN_PX};
use crate::token::{Token, TokenId, DEFAULT_LAYER, DEFAULT_STATUS};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Default centre coordinate (percent) for records without a usable position.
pub const DEFAULT_POSITION_PERCENT: f64 = 50.0;

/// Everything a board persists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub tokens: Vec<Token>,
    #[serde(rename = "defaultTokenPx")]
    pub default_token_px: f64,
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self {
            tokens: Vec::new(),
            default_token_px: DEFAULT_TOKEN_PX,
        }
    }
}

impl BoardSnapshot {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a snapshot, defaulting every unreadable part.
    pub fn decode(json: &str) -> Self {
        let value: Value = match serde_json::from_str(json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding unreadable board snapshot: {}", e);
                return Self::default();
            }
        };
        let Some(root) = value.as_object() else {
            log::warn!("Discarding board snapshot that is not an object");
            return Self::default();
        };

        let tokens: Vec<Token> = root
            .get("tokens")
            .and_then(Value::as_array)
            .map(|records| records.iter().filter_map(decode_token).collect())
            .unwrap_or_default();

        let default_token_px = js_number(root.get("defaultTokenPx"))
            .map(clamp_token_size)
            .unwrap_or(DEFAULT_TOKEN_PX);

        Self {
            tokens,
            default_token_px,
        }
    }
}

/// Decode one token record; `None` drops the record.
fn decode_token(record: &Value) -> Option<Token> {
    let record = record.as_object()?;
    let id = truthy_string(record.get("id"))?;
    let kind = truthy_string(record.get("type"))?;

    // Older saves stored a base size and a separate scale factor.
    let raw_size = js_number(record.get("size")).unwrap_or(DEFAULT_TOKEN_PX);
    let raw_scale = js_number(record.get("scale")).unwrap_or(1.0);

    Some(Token {
        id: TokenId::new(id),
        kind,
        x: number_or(record, "x", DEFAULT_POSITION_PERCENT),
        y: number_or(record, "y", DEFAULT_POSITION_PERCENT),
        rotation: int_field(record, "rotation", round_half_up).unwrap_or(0),
        size: clamp_token_size(raw_size * raw_scale),
        layer: int_field(record, "layer", f64::trunc).unwrap_or(DEFAULT_LAYER),
        notes: string_or(record, "notes", ""),
        status: string_or(record, "status", DEFAULT_STATUS),
    })
}

fn number_or(record: &Map<String, Value>, key: &str, default: f64) -> f64 {
    js_number(record.get(key)).unwrap_or(default)
}

/// A number field converted to `i32`; `None` when missing or out of range.
fn int_field(record: &Map<String, Value>, key: &str, to_integer: fn(f64) -> f64) -> Option<i32> {
    let value = to_integer(js_number(record.get(key))?);
    (value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX)).then_some(value as i32)
}

fn string_or(record: &Map<String, Value>, key: &str, default: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => default.to_string(),
    }
}

/// Coerce a JSON value the way the page's `Number(value)` does, returning
/// only finite results.
///
/// Numbers pass through, numeric strings are parsed (blank means 0),
/// booleans are 0/1 and `null` is 0. Missing values, arrays, objects and
/// unparsable strings are not numbers.
fn js_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => return None,
    };
    number.is_finite().then_some(number)
}

/// A non-empty string for truthy ids and kinds; numbers other than zero are
/// stringified.
fn truthy_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(number_string(n)),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Format a number the way the page's `String(value)` does: `5.0` is `"5"`,
/// very large and very small magnitudes use a signed exponent.
fn number_string(number: &Number) -> String {
    let Some(value) = number.as_f64().filter(|_| number.is_f64()) else {
        return number.to_string();
    };
    let magnitude = value.abs();
    if magnitude >= 1e21 || (magnitude > 0.0 && magnitude < 1e-6) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    format!("{}", value)
}
