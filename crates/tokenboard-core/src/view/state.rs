//! Visual state definitions.

use crate::geometry::clamp_token_size;
use crate::token::{Token, TokenId};
use crate::tools::ToolRegistry;

/// How a token is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisualState {
    /// Normal display state - no interaction.
    #[default]
    Normal,
    /// The selected token; shows its controls.
    Active,
    /// Being placed from the toolbar (slightly translucent).
    Placing,
}

impl VisualState {
    /// Whether the token's controls are shown.
    pub fn shows_handles(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Everything a renderer needs to draw one token.
///
/// Positions are centre-anchored percentages so the element stays put when
/// the board is resized.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenVisual {
    pub id: TokenId,
    pub kind: String,
    /// Asset source; empty when the kind is no longer registered.
    pub src: String,
    pub left_percent: f64,
    pub top_percent: f64,
    pub edge_px: f64,
    pub rotation_deg: i32,
    pub state: VisualState,
}

impl TokenVisual {
    /// Project a token record.
    pub fn project(token: &Token, registry: &ToolRegistry, state: VisualState) -> Self {
        Self {
            id: token.id.clone(),
            kind: token.kind.clone(),
            src: registry.src(&token.kind).unwrap_or_default().to_string(),
            left_percent: token.x,
            top_percent: token.y,
            edge_px: clamp_token_size(token.size),
            rotation_deg: token.rotation,
            state,
        }
    }

    /// CSS transform for the element.
    pub fn transform(&self) -> String {
        format!("translate(-50%, -50%) rotate({}deg)", self.rotation_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project() {
        let registry = ToolRegistry::new().with_tool("pawn", "/img/pawn.png");
        let mut token = Token::new(TokenId::new("t4"), "pawn", 12.5, 80.0, 700.0);
        token.rotation = -45;

        let visual = TokenVisual::project(&token, &registry, VisualState::Active);
        assert_eq!(visual.src, "/img/pawn.png");
        assert!((visual.left_percent - 12.5).abs() < f64::EPSILON);
        assert!((visual.top_percent - 80.0).abs() < f64::EPSILON);
        assert!((visual.edge_px - 600.0).abs() < f64::EPSILON);
        assert_eq!(visual.transform(), "translate(-50%, -50%) rotate(-45deg)");
        assert!(visual.state.shows_handles());
    }

    #[test]
    fn test_unknown_kind_has_empty_src() {
        let token = Token::new(TokenId::new("t1"), "ghost", 0.0, 0.0, 52.0);
        let visual = TokenVisual::project(&token, &ToolRegistry::new(), VisualState::Normal);
        assert!(visual.src.is_empty());
        assert!(!visual.state.shows_handles());
    }
}
