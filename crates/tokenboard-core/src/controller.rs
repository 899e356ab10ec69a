//! Board controller: session, view and persistence wired together.

use crate::board::Board;
use crate::config::BoardConfig;
use crate::geometry::BoardSurface;
use crate::input::PointerEvent;
use crate::interaction::{BoardChange, Session};
use crate::storage::{BoardPersistence, KeyValueStore};
use crate::token::TokenId;
use crate::tools::ToolRegistry;
use crate::view::{ViewSync, VisualSink};

/// Owns one board session for the lifetime of a page.
///
/// Every batch of changes is pushed to the visual sink, and the full
/// snapshot is written whenever a batch touched token records. Write
/// failures are logged and otherwise ignored.
pub struct BoardController<S: KeyValueStore, V: VisualSink> {
    session: Session,
    persistence: BoardPersistence<S>,
    view: ViewSync,
    sink: V,
}

impl<S: KeyValueStore, V: VisualSink> BoardController<S, V> {
    /// Load the saved board and render it with nothing selected.
    pub fn open(store: S, mut sink: V, registry: ToolRegistry, config: BoardConfig) -> Self {
        let persistence = BoardPersistence::new(store, &config);
        let board = persistence.load(config.default_token_px);
        let mut view = ViewSync::new(registry.clone());
        view.render_all(&board, &mut sink);
        log::info!(
            "Opened board {} with {} tokens",
            persistence.key(),
            board.len()
        );

        Self {
            session: Session::new(board, registry, config),
            persistence,
            view,
            sink,
        }
    }

    /// Feed one pointer event through the session.
    pub fn dispatch(&mut self, surface: &impl BoardSurface, event: PointerEvent) -> Vec<BoardChange> {
        let changes = self.session.handle_event(surface, event);
        self.commit(&changes);
        changes
    }

    /// Delete a token by id.
    pub fn delete_token(&mut self, id: &TokenId) -> Vec<BoardChange> {
        let changes = self.session.delete_token(id);
        self.commit(&changes);
        changes
    }

    /// Remove every token.
    pub fn clear(&mut self) -> Vec<BoardChange> {
        let changes = self.session.clear();
        self.commit(&changes);
        changes
    }

    /// Select the tool used when pressing on empty board space.
    pub fn select_tool(&mut self, kind: &str) -> bool {
        self.session.select_tool(kind)
    }

    /// Pressing empty space deselects again.
    pub fn clear_tool(&mut self) {
        self.session.clear_tool();
    }

    /// Re-render everything, e.g. after the sink was rebuilt.
    pub fn rerender(&mut self) {
        self.view.render_all(self.session.board(), &mut self.sink);
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn board(&self) -> &Board {
        self.session.board()
    }

    pub fn sink(&self) -> &V {
        &self.sink
    }

    pub fn persistence(&self) -> &BoardPersistence<S> {
        &self.persistence
    }

    fn commit(&mut self, changes: &[BoardChange]) {
        if changes.is_empty() {
            return;
        }
        self.view
            .apply_all(self.session.board(), changes, &mut self.sink);
        if changes.iter().any(BoardChange::needs_persist) {
            self.persist();
        }
    }

    fn persist(&self) {
        if let Err(e) = self.persistence.save(self.session.board()) {
            log::warn!("Failed to save board {}: {}", self.persistence.key(), e);
        }
    }
}
