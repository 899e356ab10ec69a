//! Token store: the ordered set of tokens on a board.

use crate::geometry::{clamp_token_size, DEFAULT_TOKEN_PX};
use crate::snapshot::{BoardSnapshot, DEFAULT_POSITION_PERCENT};
use crate::token::{Token, TokenId};
use crate::tools::ToolRegistry;
use thiserror::Error;

/// Token store errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Unknown token type: {0}")]
    UnknownType(String),
    #[error("Token id counter exhausted")]
    IdsExhausted,
}

/// All tokens on a board plus the id counter and the active selection.
///
/// Tokens keep creation order. Later tokens render above earlier ones.
#[derive(Debug, Clone)]
pub struct Board {
    tokens: Vec<Token>,
    next_id: u64,
    default_token_px: f64,
    active: Option<TokenId>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            next_id: 1,
            default_token_px: DEFAULT_TOKEN_PX,
            active: None,
        }
    }

    /// Create an empty board whose new tokens use the given edge length.
    pub fn with_default_token_px(default_token_px: f64) -> Self {
        Self {
            default_token_px: clamp_token_size(default_token_px),
            ..Self::new()
        }
    }

    /// Rebuild a board from a snapshot. Nothing is selected afterwards.
    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let next_id = next_id_after(&snapshot.tokens);
        Self {
            tokens: snapshot.tokens,
            next_id,
            default_token_px: clamp_token_size(snapshot.default_token_px),
            active: None,
        }
    }

    /// Capture everything that gets persisted.
    pub fn to_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            tokens: self.tokens.clone(),
            default_token_px: self.default_token_px,
        }
    }

    /// Create a token of a registered kind at the given centre (percent).
    ///
    /// Non-finite coordinates fall back to the board centre.
    pub fn create(
        &mut self,
        kind: &str,
        x: f64,
        y: f64,
        registry: &ToolRegistry,
    ) -> Result<&Token, BoardError> {
        if !registry.contains(kind) {
            return Err(BoardError::UnknownType(kind.to_string()));
        }

        let id = self.allocate_id()?;

        let x = if x.is_finite() { x } else { DEFAULT_POSITION_PERCENT };
        let y = if y.is_finite() { y } else { DEFAULT_POSITION_PERCENT };
        let token = Token::new(id, kind, x, y, self.default_token_px);
        log::debug!("Created token {} ({})", token.id, token.kind);

        let index = self.tokens.len();
        self.tokens.push(token);
        Ok(&self.tokens[index])
    }

    /// Next counter id that is not live. The counter never wraps.
    fn allocate_id(&mut self) -> Result<TokenId, BoardError> {
        loop {
            let counter = self.next_id;
            self.next_id = counter.checked_add(1).ok_or(BoardError::IdsExhausted)?;
            let id = TokenId::from_counter(counter);
            if self.find(&id).is_none() {
                return Ok(id);
            }
        }
    }

    /// Remove a token. Missing ids are a no-op.
    pub fn remove(&mut self, id: &TokenId) -> Option<Token> {
        let index = self.tokens.iter().position(|token| &token.id == id)?;
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        Some(self.tokens.remove(index))
    }

    /// Remove every token and clear the selection.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.active = None;
    }

    pub fn find(&self, id: &TokenId) -> Option<&Token> {
        self.tokens.iter().find(|token| &token.id == id)
    }

    pub fn find_mut(&mut self, id: &TokenId) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|token| &token.id == id)
    }

    /// Tokens in creation order (bottom to top).
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Tokens from topmost to bottommost.
    pub fn tokens_topmost_first(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().rev()
    }

    pub fn active(&self) -> Option<&TokenId> {
        self.active.as_ref()
    }

    /// Select a token, or clear the selection with `None`.
    ///
    /// Selecting an id that is not on the board clears the selection.
    pub fn set_active(&mut self, id: Option<TokenId>) {
        self.active = id.filter(|id| self.find(id).is_some());
    }

    pub fn default_token_px(&self) -> f64 {
        self.default_token_px
    }

    /// The counter value the next created token will use.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One past the largest numeric suffix among the ids.
fn next_id_after(tokens: &[Token]) -> u64 {
    tokens
        .iter()
        .map(|token| token.id.numeric_suffix())
        .max()
        .unwrap_or(0)
        .saturating_add(1)
}
