//! Board settings read from the page markup.

use tokenboard_core::{BoardConfig, ToolRegistry};

/// Element the board is drawn on; its bounding box is the board surface.
pub const BOARD_ID: &str = "board";
/// Container the token elements are appended to.
pub const LAYER_ID: &str = "tokenLayer";
/// Optional "clear tokens" button.
pub const CLEAR_BUTTON_ID: &str = "clearTokens";
/// Toolbar buttons, each carrying `data-type` and `data-src`.
pub const TOOL_BUTTON_SELECTOR: &str = ".tokenbtn";

/// Build the board config from the board element's attributes.
///
/// `data-config` may hold a partial JSON `BoardConfig`; a non-empty
/// `data-scenario-key` always wins for the board key.
pub fn board_config(scenario_key: Option<&str>, config_json: Option<&str>) -> BoardConfig {
    let config = match config_json.filter(|json| !json.trim().is_empty()) {
        Some(json) => BoardConfig::from_json_or_default(json),
        None => BoardConfig::default(),
    };
    match scenario_key.filter(|key| !key.is_empty()) {
        Some(key) => BoardConfig {
            board_key: key.to_string(),
            ..config
        },
        None => config,
    }
}

/// Build the tool registry from `(data-type, data-src)` pairs.
///
/// Buttons missing either attribute are skipped.
pub fn tool_registry<I>(buttons: I) -> ToolRegistry
where
    I: IntoIterator<Item = (Option<String>, Option<String>)>,
{
    buttons
        .into_iter()
        .filter_map(|(kind, src)| Some((kind?, src?)))
        .collect()
}
