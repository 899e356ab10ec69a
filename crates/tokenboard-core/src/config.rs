//! Board configuration.

use crate::geometry::{DEFAULT_TOKEN_PX, MAX_TOKEN_PX, MIN_TOKEN_PX, ROTATION_SNAP_DEGREES};
use serde::{Deserialize, Serialize};

/// Prefix of the storage key that holds a board snapshot.
pub const STORAGE_PREFIX: &str = "fg.board.state.v1.";
/// Board key used when the page does not name one.
pub const DEFAULT_BOARD_KEY: &str = "default";
/// Pointer travel (px) after which a press on a token becomes a drag.
pub const DRAG_START_THRESHOLD_PX: f64 = 6.0;
/// Maximum distance (px) between clicks that still counts as "the same spot".
pub const CYCLE_SAME_SPOT_TOLERANCE_PX: f64 = 24.0;

/// Tunables for a board session.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    /// Scopes the persisted snapshot; one entry per board.
    pub board_key: String,
    /// Prepended to `board_key` to form the storage key.
    pub storage_prefix: String,
    pub drag_threshold_px: f64,
    pub cycle_tolerance_px: f64,
    pub rotation_snap_degrees: f64,
    /// Edge length for new tokens until a snapshot says otherwise.
    pub default_token_px: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            board_key: DEFAULT_BOARD_KEY.to_string(),
            storage_prefix: STORAGE_PREFIX.to_string(),
            drag_threshold_px: DRAG_START_THRESHOLD_PX,
            cycle_tolerance_px: CYCLE_SAME_SPOT_TOLERANCE_PX,
            rotation_snap_degrees: ROTATION_SNAP_DEGREES,
            default_token_px: DEFAULT_TOKEN_PX,
        }
    }
}

impl BoardConfig {
    /// Create a config for the given board key.
    pub fn for_board(board_key: impl Into<String>) -> Self {
        let board_key = board_key.into();
        let board_key = if board_key.is_empty() {
            DEFAULT_BOARD_KEY.to_string()
        } else {
            board_key
        };
        Self {
            board_key,
            ..Self::default()
        }
    }

    /// Parse a config from JSON, falling back to defaults on malformed input.
    pub fn from_json_or_default(json: &str) -> Self {
        match serde_json::from_str::<Self>(json) {
            Ok(config) => config.sanitized(),
            Err(e) => {
                log::warn!("Ignoring malformed board config: {}", e);
                Self::default()
            }
        }
    }

    /// The key the board snapshot is stored under.
    pub fn storage_key(&self) -> String {
        format!("{}{}", self.storage_prefix, self.board_key)
    }

    /// Replace out-of-range values with their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.board_key.is_empty() {
            self.board_key = defaults.board_key;
        }
        if !(self.drag_threshold_px.is_finite() && self.drag_threshold_px >= 0.0) {
            self.drag_threshold_px = defaults.drag_threshold_px;
        }
        if !(self.cycle_tolerance_px.is_finite() && self.cycle_tolerance_px >= 0.0) {
            self.cycle_tolerance_px = defaults.cycle_tolerance_px;
        }
        if !(self.rotation_snap_degrees.is_finite() && self.rotation_snap_degrees > 0.0) {
            self.rotation_snap_degrees = defaults.rotation_snap_degrees;
        }
        if self.default_token_px.is_finite() {
            self.default_token_px = self.default_token_px.clamp(MIN_TOKEN_PX, MAX_TOKEN_PX);
        } else {
            self.default_token_px = defaults.default_token_px;
        }
        self
    }
}
