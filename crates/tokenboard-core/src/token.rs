//! The token record.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default `status` for new and loaded tokens.
pub const DEFAULT_STATUS: &str = "active";
/// Default `layer` for new and loaded tokens.
pub const DEFAULT_LAYER: i32 = 1;
/// Prefix of every allocated token id.
pub const TOKEN_ID_PREFIX: &str = "t";

/// Stable identifier of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id for the given counter value.
    pub fn from_counter(counter: u64) -> Self {
        Self(format!("{}{}", TOKEN_ID_PREFIX, counter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first run of ASCII digits in the id, or 0 when there is none.
    ///
    /// Runs too long for a `u64` saturate to `u64::MAX`. Used to recompute
    /// the id counter from loaded tokens.
    pub fn numeric_suffix(&self) -> u64 {
        let digits: String = self
            .0
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            return 0;
        }
        digits.parse().unwrap_or(u64::MAX)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A placed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    /// Tool key selecting the token's asset.
    #[serde(rename = "type")]
    pub kind: String,
    /// Centre x, percent of board width.
    pub x: f64,
    /// Centre y, percent of board height.
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: i32,
    /// Edge length in pixels.
    pub size: f64,
    pub layer: i32,
    pub notes: String,
    pub status: String,
}

impl Token {
    /// Create a token with default rotation, layer and metadata.
    pub fn new(id: TokenId, kind: impl Into<String>, x: f64, y: f64, size: f64) -> Self {
        Self {
            id,
            kind: kind.into(),
            x,
            y,
            rotation: 0,
            size,
            layer: DEFAULT_LAYER,
            notes: String::new(),
            status: DEFAULT_STATUS.to_string(),
        }
    }

    /// Centre in board percentages.
    pub fn center_percent(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn half_size(&self) -> f64 {
        self.size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_suffix() {
        assert_eq!(TokenId::new("t12").numeric_suffix(), 12);
        assert_eq!(TokenId::new("pawn-7-b3").numeric_suffix(), 7);
        assert_eq!(TokenId::new("abc").numeric_suffix(), 0);
        assert_eq!(TokenId::new("t123456789012345678901").numeric_suffix(), u64::MAX);
        assert_eq!(TokenId::from_counter(3).as_str(), "t3");
    }

    #[test]
    fn test_wire_field_names() {
        let token = Token::new(TokenId::new("t1"), "engine", 10.0, 20.0, 52.0);
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["type"], "engine");
        assert_eq!(json["id"], "t1");
        assert_eq!(json["status"], "active");
        assert_eq!(json["layer"], 1);
        assert!(json.get("kind").is_none());
    }
}
