//! Keeps a renderer in step with the board.

use super::state::{TokenVisual, VisualState};
use crate::board::Board;
use crate::interaction::BoardChange;
use crate::token::TokenId;
use crate::tools::ToolRegistry;
use std::collections::HashMap;

/// Receives visual updates. Implemented over DOM elements in the browser.
pub trait VisualSink {
    /// Create or update the visual for `visual.id`.
    fn upsert(&mut self, visual: &TokenVisual);
    /// Drop the visual for a token.
    fn remove(&mut self, id: &TokenId);
    /// Drop every visual.
    fn clear(&mut self);
}

/// Tracks what the sink currently shows and re-projects only what changed.
#[derive(Debug, Clone)]
pub struct ViewSync {
    registry: ToolRegistry,
    /// Token currently drawn as active.
    shown_active: Option<TokenId>,
    /// Token currently drawn as placing.
    placing: Option<TokenId>,
}

impl ViewSync {
    pub fn new(registry: ToolRegistry) -> Self {
        Self {
            registry,
            shown_active: None,
            placing: None,
        }
    }

    /// Rebuild every visual from scratch.
    pub fn render_all(&mut self, board: &Board, sink: &mut impl VisualSink) {
        sink.clear();
        self.shown_active = board.active().cloned();
        self.placing = self
            .placing
            .take()
            .filter(|id| board.find(id).is_some());
        for token in board.tokens() {
            let state = self.state_for(board, &token.id);
            sink.upsert(&TokenVisual::project(token, &self.registry, state));
        }
        log::info!("Rendered {} tokens", board.len());
    }

    /// Apply one change.
    pub fn apply(&mut self, board: &Board, change: &BoardChange, sink: &mut impl VisualSink) {
        match change {
            BoardChange::Added(id)
            | BoardChange::Moved(id)
            | BoardChange::Rotated(id)
            | BoardChange::Resized(id) => self.refresh(board, id, sink),
            BoardChange::Removed(id) => {
                sink.remove(id);
                if self.shown_active.as_ref() == Some(id) {
                    self.shown_active = None;
                }
                if self.placing.as_ref() == Some(id) {
                    self.placing = None;
                }
            }
            BoardChange::Cleared => {
                sink.clear();
                self.shown_active = None;
                self.placing = None;
            }
            BoardChange::Selected(_) => {}
            BoardChange::PlacingStarted(id) => {
                self.placing = Some(id.clone());
                self.refresh(board, id, sink);
            }
            BoardChange::PlacingFinished(id) => {
                if self.placing.as_ref() == Some(id) {
                    self.placing = None;
                }
                self.refresh(board, id, sink);
            }
        }
        self.sync_selection(board, sink);
    }

    /// Apply a batch of changes in order.
    pub fn apply_all<'a>(
        &mut self,
        board: &Board,
        changes: impl IntoIterator<Item = &'a BoardChange>,
        sink: &mut impl VisualSink,
    ) {
        for change in changes {
            self.apply(board, change, sink);
        }
    }

    /// The token currently drawn as active.
    pub fn shown_active(&self) -> Option<&TokenId> {
        self.shown_active.as_ref()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    fn state_for(&self, board: &Board, id: &TokenId) -> VisualState {
        if self.placing.as_ref() == Some(id) {
            VisualState::Placing
        } else if board.active() == Some(id) {
            VisualState::Active
        } else {
            VisualState::Normal
        }
    }

    fn refresh(&self, board: &Board, id: &TokenId, sink: &mut impl VisualSink) {
        if let Some(token) = board.find(id) {
            let state = self.state_for(board, id);
            sink.upsert(&TokenVisual::project(token, &self.registry, state));
        }
    }

    /// Demote the previously active visual and promote the new one.
    fn sync_selection(&mut self, board: &Board, sink: &mut impl VisualSink) {
        if board.active() == self.shown_active.as_ref() {
            return;
        }
        if let Some(previous) = self.shown_active.take() {
            self.refresh(board, &previous, sink);
        }
        self.shown_active = board.active().cloned();
        if let Some(current) = self.shown_active.clone() {
            self.refresh(board, &current, sink);
        }
    }
}

/// In-memory sink that keeps the latest visual per token.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    visuals: HashMap<TokenId, TokenVisual>,
    upserts: usize,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &TokenId) -> Option<&TokenVisual> {
        self.visuals.get(id)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Ids currently drawn as active.
    pub fn active_ids(&self) -> Vec<&TokenId> {
        self.visuals
            .values()
            .filter(|v| v.state == VisualState::Active)
            .map(|v| &v.id)
            .collect()
    }

    /// Number of `upsert` calls so far.
    pub fn upsert_count(&self) -> usize {
        self.upserts
    }
}

impl VisualSink for RecordingSink {
    fn upsert(&mut self, visual: &TokenVisual) {
        self.upserts += 1;
        self.visuals.insert(visual.id.clone(), visual.clone());
    }

    fn remove(&mut self, id: &TokenId) {
        self.visuals.remove(id);
    }

    fn clear(&mut self) {
        self.visuals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Board, ViewSync, RecordingSink, Vec<TokenId>) {
        let registry = ToolRegistry::new().with_tool("pawn", "/img/pawn.png");
        let mut board = Board::new();
        let ids = (0..3)
            .map(|i| {
                board
                    .create("pawn", 10.0 * i as f64, 20.0, &registry)
                    .unwrap()
                    .id
                    .clone()
            })
            .collect();
        (board, ViewSync::new(registry), RecordingSink::new(), ids)
    }

    #[test]
    fn test_render_all() {
        let (board, mut view, mut sink, ids) = setup();
        view.render_all(&board, &mut sink);
        assert_eq!(sink.len(), 3);
        assert!(sink.active_ids().is_empty());
        assert_eq!(sink.get(&ids[1]).unwrap().src, "/img/pawn.png");
    }

    #[test]
    fn test_selection_change_touches_two_tokens() {
        let (mut board, mut view, mut sink, ids) = setup();
        view.render_all(&board, &mut sink);

        board.set_active(Some(ids[0].clone()));
        view.apply(&board, &BoardChange::Selected(Some(ids[0].clone())), &mut sink);
        assert_eq!(sink.active_ids(), vec![&ids[0]]);

        let before = sink.upsert_count();
        board.set_active(Some(ids[2].clone()));
        view.apply(&board, &BoardChange::Selected(Some(ids[2].clone())), &mut sink);
        assert_eq!(sink.upsert_count() - before, 2);
        assert_eq!(sink.active_ids(), vec![&ids[2]]);
        assert_eq!(sink.get(&ids[0]).unwrap().state, VisualState::Normal);
    }

    #[test]
    fn test_move_reprojects_one_token() {
        let (mut board, mut view, mut sink, ids) = setup();
        view.render_all(&board, &mut sink);

        board.find_mut(&ids[1]).unwrap().x = 77.0;
        let before = sink.upsert_count();
        view.apply(&board, &BoardChange::Moved(ids[1].clone()), &mut sink);
        assert_eq!(sink.upsert_count() - before, 1);
        assert!((sink.get(&ids[1]).unwrap().left_percent - 77.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_placing_state() {
        let (mut board, mut view, mut sink, ids) = setup();
        view.render_all(&board, &mut sink);

        board.set_active(Some(ids[2].clone()));
        view.apply(&board, &BoardChange::PlacingStarted(ids[2].clone()), &mut sink);
        assert_eq!(sink.get(&ids[2]).unwrap().state, VisualState::Placing);

        view.apply(&board, &BoardChange::PlacingFinished(ids[2].clone()), &mut sink);
        assert_eq!(sink.get(&ids[2]).unwrap().state, VisualState::Active);
    }

    #[test]
    fn test_remove_and_clear() {
        let (mut board, mut view, mut sink, ids) = setup();
        board.set_active(Some(ids[0].clone()));
        view.render_all(&board, &mut sink);
        assert_eq!(view.shown_active(), Some(&ids[0]));

        board.remove(&ids[0]);
        view.apply(&board, &BoardChange::Removed(ids[0].clone()), &mut sink);
        assert!(sink.get(&ids[0]).is_none());
        assert_eq!(view.shown_active(), None);

        board.clear();
        view.apply(&board, &BoardChange::Cleared, &mut sink);
        assert!(sink.is_empty());
    }
}
