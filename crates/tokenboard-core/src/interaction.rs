//! Pointer interaction state machine.
//!
//! One pointer stream drives every gesture: placing a token from the
//! toolbar, dragging, rotating, resizing, click-to-select with cycling
//! through stacked tokens, and deleting. Exactly one gesture is live at a
//! time. Every call returns the list of changes it made so the caller can
//! update the view and persist.

use crate::board::Board;
use crate::config::BoardConfig;
use crate::geometry::{
    angle_degrees, center_percent_for_pointer, clamp_token_size, distance, snap_rotation,
    BoardSurface,
};
use crate::hit::{hit_test, token_center, tokens_at_point, Hit, HitKind};
use crate::input::PointerEvent;
use crate::token::TokenId;
use crate::tools::ToolRegistry;
use kurbo::{Point, Rect, Vec2};

/// Something that changed on the board.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardChange {
    Added(TokenId),
    Moved(TokenId),
    Rotated(TokenId),
    Resized(TokenId),
    Removed(TokenId),
    Cleared,
    /// The active token changed.
    Selected(Option<TokenId>),
    PlacingStarted(TokenId),
    PlacingFinished(TokenId),
}

impl BoardChange {
    /// Whether the token records changed.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Added(_)
                | Self::Moved(_)
                | Self::Rotated(_)
                | Self::Resized(_)
                | Self::Removed(_)
                | Self::Cleared
        )
    }

    /// Whether the snapshot should be written after this change.
    pub fn needs_persist(&self) -> bool {
        self.is_mutation() || matches!(self, Self::PlacingFinished(_))
    }
}

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionMode {
    Idle,
    /// A freshly created token follows the pointer until release.
    Placing { id: TokenId },
    /// Pressed on a body; becomes a drag once the pointer travels far enough.
    Pending {
        id: TokenId,
        start: Point,
        /// Pointer minus token centre at press time.
        grab: Vec2,
    },
    Dragging { id: TokenId, grab: Vec2 },
    Rotating { id: TokenId },
    Resizing {
        id: TokenId,
        start_size: f64,
        start_distance: f64,
    },
    /// Pressed on the delete control; removal happens on release.
    Deleting { id: TokenId },
}

impl InteractionMode {
    /// The token the gesture acts on.
    pub fn token(&self) -> Option<&TokenId> {
        match self {
            Self::Idle => None,
            Self::Placing { id }
            | Self::Pending { id, .. }
            | Self::Dragging { id, .. }
            | Self::Rotating { id }
            | Self::Resizing { id, .. }
            | Self::Deleting { id } => Some(id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Memory of the last select click, used to cycle through stacked tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleMemory {
    /// Tokens under the click, topmost first.
    pub stack: Vec<TokenId>,
    pub index: usize,
    /// Where the click happened (viewport pixels).
    pub at: Point,
}

/// A board plus the interaction state layered over it.
#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    registry: ToolRegistry,
    config: BoardConfig,
    selected_tool: Option<String>,
    mode: InteractionMode,
    cycle: Option<CycleMemory>,
}

impl Session {
    pub fn new(board: Board, registry: ToolRegistry, config: BoardConfig) -> Self {
        Self {
            board,
            registry,
            config,
            selected_tool: None,
            mode: InteractionMode::Idle,
            cycle: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn cycle_memory(&self) -> Option<&CycleMemory> {
        self.cycle.as_ref()
    }

    pub fn selected_tool(&self) -> Option<&str> {
        self.selected_tool.as_deref()
    }

    /// Select the tool used when pressing on empty board space.
    ///
    /// The tool is one-shot: it is cleared when the placing gesture ends.
    /// Unknown kinds leave the selection unchanged and return false.
    pub fn select_tool(&mut self, kind: &str) -> bool {
        if !self.registry.contains(kind) {
            log::debug!("Ignoring unknown tool {:?}", kind);
            return false;
        }
        self.selected_tool = Some(kind.to_string());
        true
    }

    pub fn clear_tool(&mut self) {
        self.selected_tool = None;
    }

    /// Feed one pointer event through the state machine.
    pub fn handle_event(
        &mut self,
        surface: &impl BoardSurface,
        event: PointerEvent,
    ) -> Vec<BoardChange> {
        let mut changes = Vec::new();
        match event {
            PointerEvent::Down { position } => {
                self.finish_gesture(&mut changes);
                self.pointer_down(surface.bounds(), position, &mut changes);
            }
            PointerEvent::ToolPressed { kind, position } => {
                self.finish_gesture(&mut changes);
                if self.select_tool(&kind) {
                    self.begin_placing(surface.bounds(), position, &mut changes);
                }
            }
            PointerEvent::Move { position } => {
                self.pointer_move(surface.bounds(), position, &mut changes);
            }
            PointerEvent::Up { position } => {
                self.pointer_up(surface.bounds(), position, &mut changes);
            }
            PointerEvent::Cancel => {
                log::debug!("Gesture cancelled in {:?}", self.mode);
                self.finish_gesture(&mut changes);
            }
        }
        changes
    }

    /// Delete a token directly (not via its control).
    pub fn delete_token(&mut self, id: &TokenId) -> Vec<BoardChange> {
        let mut changes = Vec::new();
        if self.mode.token() == Some(id) {
            self.mode = InteractionMode::Idle;
        }
        self.remove(id, &mut changes);
        changes
    }

    /// Remove every token and drop any gesture in progress.
    pub fn clear(&mut self) -> Vec<BoardChange> {
        self.board.clear();
        self.mode = InteractionMode::Idle;
        self.cycle = None;
        log::debug!("Board cleared");
        vec![BoardChange::Cleared]
    }

    /// Select (or cycle through) the tokens under `point`.
    pub fn cycle_select(&mut self, rect: Rect, point: Point) -> Vec<BoardChange> {
        let mut changes = Vec::new();
        self.cycle_select_into(rect, point, &mut changes);
        changes
    }

    fn pointer_down(&mut self, rect: Rect, position: Point, changes: &mut Vec<BoardChange>) {
        let Some(Hit { kind, token: id }) = hit_test(&self.board, rect, position) else {
            if self.selected_tool.is_some() {
                self.begin_placing(rect, position, changes);
            } else {
                self.cycle = None;
                self.select(None, changes);
            }
            return;
        };
        let Some(token) = self.board.find(&id) else {
            return;
        };
        let center = token_center(token, rect);

        self.mode = match kind {
            HitKind::Body => InteractionMode::Pending {
                id: id.clone(),
                start: position,
                grab: position - center,
            },
            HitKind::RotateHandle => InteractionMode::Rotating { id: id.clone() },
            HitKind::ResizeHandle => InteractionMode::Resizing {
                id: id.clone(),
                start_size: token.size,
                start_distance: distance(position, center).max(1.0),
            },
            HitKind::DeleteControl => InteractionMode::Deleting { id },
        };
        log::debug!("Pointer down -> {:?}", self.mode);

        if let Some(id) = self.mode.token().cloned() {
            if !matches!(self.mode, InteractionMode::Deleting { .. }) {
                self.select(Some(id), changes);
            }
        }
    }

    fn begin_placing(&mut self, rect: Rect, position: Point, changes: &mut Vec<BoardChange>) {
        let Some(kind) = self.selected_tool.clone() else {
            return;
        };
        let half = self.board.default_token_px() / 2.0;
        let center = center_percent_for_pointer(rect, position, half);
        let id = match self.board.create(&kind, center.x, center.y, &self.registry) {
            Ok(token) => token.id.clone(),
            Err(e) => {
                log::debug!("Not placing: {}", e);
                return;
            }
        };
        changes.push(BoardChange::Added(id.clone()));
        self.select(Some(id.clone()), changes);
        changes.push(BoardChange::PlacingStarted(id.clone()));
        self.mode = InteractionMode::Placing { id };
    }

    fn pointer_move(&mut self, rect: Rect, position: Point, changes: &mut Vec<BoardChange>) {
        // Promote a press to a drag once it travels far enough.
        if let InteractionMode::Pending { id, start, grab } = &self.mode {
            if distance(*start, position) >= self.config.drag_threshold_px {
                log::debug!("Dragging {}", id);
                self.mode = InteractionMode::Dragging {
                    id: id.clone(),
                    grab: *grab,
                };
            }
        }

        let change = match &self.mode {
            InteractionMode::Resizing {
                id,
                start_size,
                start_distance,
            } => self.board.find_mut(id).map(|token| {
                let center = token_center(token, rect);
                let ratio = distance(position, center) / start_distance;
                token.size = clamp_token_size(start_size * ratio);
                BoardChange::Resized(id.clone())
            }),
            InteractionMode::Dragging { id, grab } => self.board.find_mut(id).map(|token| {
                let center = center_percent_for_pointer(rect, position - *grab, token.half_size());
                token.x = center.x;
                token.y = center.y;
                BoardChange::Moved(id.clone())
            }),
            InteractionMode::Rotating { id } => {
                let snap = self.config.rotation_snap_degrees;
                self.board.find_mut(id).map(|token| {
                    let angle = angle_degrees(token_center(token, rect), position);
                    token.rotation = snap_rotation(angle, snap);
                    BoardChange::Rotated(id.clone())
                })
            }
            InteractionMode::Placing { id } => self.board.find_mut(id).map(|token| {
                let center = center_percent_for_pointer(rect, position, token.half_size());
                token.x = center.x;
                token.y = center.y;
                BoardChange::Moved(id.clone())
            }),
            InteractionMode::Idle
            | InteractionMode::Pending { .. }
            | InteractionMode::Deleting { .. } => return,
        };

        match change {
            Some(change) => changes.push(change),
            // The token vanished under the gesture.
            None => self.mode = InteractionMode::Idle,
        }
    }

    fn pointer_up(&mut self, rect: Rect, position: Point, changes: &mut Vec<BoardChange>) {
        match std::mem::replace(&mut self.mode, InteractionMode::Idle) {
            InteractionMode::Pending { .. } => self.cycle_select_into(rect, position, changes),
            InteractionMode::Placing { id } => {
                self.selected_tool = None;
                self.select(Some(id.clone()), changes);
                changes.push(BoardChange::PlacingFinished(id));
            }
            InteractionMode::Deleting { id } => {
                let still_on_control = hit_test(&self.board, rect, position)
                    == Some(Hit {
                        kind: HitKind::DeleteControl,
                        token: id.clone(),
                    });
                if still_on_control {
                    self.remove(&id, changes);
                }
            }
            InteractionMode::Idle
            | InteractionMode::Dragging { .. }
            | InteractionMode::Rotating { .. }
            | InteractionMode::Resizing { .. } => {}
        }
    }

    /// Drop the gesture in progress. Committed moves stay; a token being
    /// placed stays where it is.
    fn finish_gesture(&mut self, changes: &mut Vec<BoardChange>) {
        if let InteractionMode::Placing { id } =
            std::mem::replace(&mut self.mode, InteractionMode::Idle)
        {
            self.selected_tool = None;
            changes.push(BoardChange::PlacingFinished(id));
        }
    }

    fn cycle_select_into(&mut self, rect: Rect, point: Point, changes: &mut Vec<BoardChange>) {
        let stack = tokens_at_point(&self.board, rect, point);
        if stack.is_empty() {
            self.cycle = None;
            self.select(None, changes);
            return;
        }

        let index = match &self.cycle {
            Some(memory)
                if stack.len() > 1
                    && memory.stack == stack
                    && distance(memory.at, point) <= self.config.cycle_tolerance_px =>
            {
                (memory.index + 1) % stack.len()
            }
            _ => 0,
        };

        self.select(Some(stack[index].clone()), changes);
        self.cycle = Some(CycleMemory {
            stack,
            index,
            at: point,
        });
    }

    fn select(&mut self, id: Option<TokenId>, changes: &mut Vec<BoardChange>) {
        if self.board.active() == id.as_ref() {
            return;
        }
        self.board.set_active(id);
        changes.push(BoardChange::Selected(self.board.active().cloned()));
    }

    fn remove(&mut self, id: &TokenId, changes: &mut Vec<BoardChange>) {
        let was_active = self.board.active() == Some(id);
        if self.board.remove(id).is_none() {
            return;
        }
        log::debug!("Removed token {}", id);
        changes.push(BoardChange::Removed(id.clone()));
        if was_active {
            changes.push(BoardChange::Selected(None));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1000 x 1000 board at the origin, so 1% == 10px.
    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 1000.0)
    }

    fn session() -> Session {
        let registry = ToolRegistry::new()
            .with_tool("pawn", "/img/pawn.png")
            .with_tool("engine", "/img/engine.png");
        Session::new(Board::new(), registry, BoardConfig::default())
    }

    fn down(session: &mut Session, x: f64, y: f64) -> Vec<BoardChange> {
        session.handle_event(&rect(), PointerEvent::Down { position: Point::new(x, y) })
    }

    fn mv(session: &mut Session, x: f64, y: f64) -> Vec<BoardChange> {
        session.handle_event(&rect(), PointerEvent::Move { position: Point::new(x, y) })
    }

    fn up(session: &mut Session, x: f64, y: f64) -> Vec<BoardChange> {
        session.handle_event(&rect(), PointerEvent::Up { position: Point::new(x, y) })
    }

    fn place(session: &mut Session, kind: &str, x: f64, y: f64) -> TokenId {
        session.handle_event(
            &rect(),
            PointerEvent::ToolPressed {
                kind: kind.to_string(),
                position: Point::new(x, y),
            },
        );
        up(session, x, y);
        session.board().active().cloned().unwrap()
    }

    #[test]
    fn test_tool_press_places_token() {
        let mut s = session();
        let changes = s.handle_event(
            &rect(),
            PointerEvent::ToolPressed {
                kind: "pawn".to_string(),
                position: Point::new(200.0, 300.0),
            },
        );
        let id = TokenId::new("t1");
        assert_eq!(
            changes,
            vec![
                BoardChange::Added(id.clone()),
                BoardChange::Selected(Some(id.clone())),
                BoardChange::PlacingStarted(id.clone()),
            ]
        );
        assert_eq!(s.mode(), &InteractionMode::Placing { id: id.clone() });

        let changes = mv(&mut s, 400.0, 500.0);
        assert_eq!(changes, vec![BoardChange::Moved(id.clone())]);
        let token = s.board().find(&id).unwrap();
        assert!((token.x - 40.0).abs() < 1e-9);
        assert!((token.y - 50.0).abs() < 1e-9);

        let changes = up(&mut s, 400.0, 500.0);
        assert_eq!(changes, vec![BoardChange::PlacingFinished(id.clone())]);
        assert!(s.mode().is_idle());
        assert_eq!(s.board().active(), Some(&id));
    }

    #[test]
    fn test_unknown_tool_is_ignored() {
        let mut s = session();
        let changes = s.handle_event(
            &rect(),
            PointerEvent::ToolPressed {
                kind: "truck".to_string(),
                position: Point::new(200.0, 300.0),
            },
        );
        assert!(changes.is_empty());
        assert!(s.board().is_empty());
        assert_eq!(s.selected_tool(), None);
    }

    #[test]
    fn test_down_on_empty_space_with_tool_places() {
        let mut s = session();
        assert!(s.select_tool("engine"));
        down(&mut s, 100.0, 100.0);
        assert_eq!(s.board().len(), 1);
        assert!(matches!(s.mode(), InteractionMode::Placing { .. }));
        assert_eq!(s.board().tokens()[0].kind, "engine");
    }

    #[test]
    fn test_down_on_empty_space_without_tool_deselects() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);
        assert!(s.select_tool("engine"));
        s.clear_tool();
        assert_eq!(s.board().active(), Some(&id));

        let changes = down(&mut s, 50.0, 50.0);
        assert_eq!(changes, vec![BoardChange::Selected(None)]);
        assert_eq!(s.cycle_memory(), None);
        assert!(s.mode().is_idle());
    }

    #[test]
    fn test_tool_press_is_one_shot() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);
        assert_eq!(s.selected_tool(), None);

        let changes = down(&mut s, 50.0, 50.0);
        assert_eq!(changes, vec![BoardChange::Selected(None)]);
        assert_eq!(s.board().len(), 1);
        assert!(s.mode().is_idle());
        assert!(s.board().find(&id).is_some());
    }

    #[test]
    fn test_small_move_is_not_a_drag() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);

        down(&mut s, 505.0, 505.0);
        let changes = mv(&mut s, 508.0, 507.0);
        assert!(changes.is_empty());
        assert!(matches!(s.mode(), InteractionMode::Pending { .. }));

        up(&mut s, 508.0, 507.0);
        let token = s.board().find(&id).unwrap();
        assert!((token.x - 50.0).abs() < 1e-9);
        assert_eq!(s.board().active(), Some(&id));
    }

    #[test]
    fn test_move_at_threshold_starts_drag() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);

        down(&mut s, 500.0, 500.0);
        let changes = mv(&mut s, 506.0, 500.0);
        assert_eq!(changes, vec![BoardChange::Moved(id.clone())]);
        assert!(matches!(s.mode(), InteractionMode::Dragging { .. }));
        let token = s.board().find(&id).unwrap();
        assert!((token.x - 50.6).abs() < 1e-9);
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);

        // Grab 10px right of centre.
        down(&mut s, 510.0, 500.0);
        let changes = mv(&mut s, 610.0, 700.0);
        assert_eq!(changes, vec![BoardChange::Moved(id.clone())]);
        assert!(matches!(s.mode(), InteractionMode::Dragging { .. }));

        let token = s.board().find(&id).unwrap();
        assert!((token.x - 60.0).abs() < 1e-9);
        assert!((token.y - 70.0).abs() < 1e-9);

        // A drag never cycles the selection on release.
        assert!(up(&mut s, 610.0, 700.0).is_empty());
    }

    #[test]
    fn test_drag_is_clamped_to_visible_range() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);

        down(&mut s, 500.0, 500.0);
        mv(&mut s, -4000.0, 500.0);
        // half 26, min visible 26: the centre cannot leave the board
        let token = s.board().find(&id).unwrap();
        assert!(token.x.abs() < 1e-9);
    }

    #[test]
    fn test_rotate_snaps() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);

        // Rotate handle sits 18px above the top edge.
        down(&mut s, 500.0, 456.0);
        assert_eq!(s.mode(), &InteractionMode::Rotating { id: id.clone() });

        // 44 degrees below the x axis snaps to 45.
        let angle = 44.0_f64.to_radians();
        let changes = mv(&mut s, 500.0 + 100.0 * angle.cos(), 500.0 + 100.0 * angle.sin());
        assert_eq!(changes, vec![BoardChange::Rotated(id.clone())]);
        assert_eq!(s.board().find(&id).unwrap().rotation, 45);
    }

    #[test]
    fn test_resize_scales_and_clamps() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);

        // Resize handle at the bottom-right corner, distance 26 * sqrt(2).
        down(&mut s, 526.0, 526.0);
        assert!(matches!(s.mode(), InteractionMode::Resizing { .. }));

        mv(&mut s, 552.0, 552.0);
        let size = s.board().find(&id).unwrap().size;
        assert!((size - 104.0).abs() < 1e-9);

        mv(&mut s, 5000.0, 5000.0);
        assert!((s.board().find(&id).unwrap().size - 600.0).abs() < f64::EPSILON);

        mv(&mut s, 500.0, 500.0);
        assert!((s.board().find(&id).unwrap().size - 24.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cycle_select_through_stack() {
        let mut s = session();
        let a = place(&mut s, "pawn", 500.0, 500.0);
        let b = place(&mut s, "engine", 510.0, 500.0);

        let click = |s: &mut Session, x: f64| {
            down(s, x, 500.0);
            up(s, x, 500.0);
            s.board().active().cloned()
        };

        assert_eq!(click(&mut s, 505.0), Some(b.clone()));
        assert_eq!(click(&mut s, 506.0), Some(a.clone()));
        assert_eq!(click(&mut s, 505.0), Some(b.clone()));

        // Only A here: a different stack resets cycling.
        assert_eq!(click(&mut s, 480.0), Some(a.clone()));
        assert_eq!(s.cycle_memory().unwrap().index, 0);
    }

    #[test]
    fn test_cycle_resets_when_far_from_last_click() {
        let mut s = session();
        let a = place(&mut s, "pawn", 500.0, 500.0);
        let b = place(&mut s, "engine", 500.0, 500.0);

        s.cycle_select(rect(), Point::new(480.0, 480.0));
        assert_eq!(s.board().active(), Some(&b));
        s.cycle_select(rect(), Point::new(481.0, 480.0));
        assert_eq!(s.board().active(), Some(&a));
        // Same stack, but more than 24px away.
        s.cycle_select(rect(), Point::new(515.0, 515.0));
        assert_eq!(s.board().active(), Some(&b));
    }

    #[test]
    fn test_cycle_on_empty_space_clears_memory() {
        let mut s = session();
        place(&mut s, "pawn", 500.0, 500.0);
        s.cycle_select(rect(), Point::new(500.0, 500.0));
        assert!(s.cycle_memory().is_some());

        let changes = s.cycle_select(rect(), Point::new(10.0, 10.0));
        assert_eq!(changes, vec![BoardChange::Selected(None)]);
        assert!(s.cycle_memory().is_none());
    }

    #[test]
    fn test_delete_control_removes_on_release() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);

        let changes = down(&mut s, 526.0, 474.0);
        assert!(changes.is_empty());
        assert_eq!(s.mode(), &InteractionMode::Deleting { id: id.clone() });

        let changes = up(&mut s, 527.0, 473.0);
        assert_eq!(
            changes,
            vec![BoardChange::Removed(id.clone()), BoardChange::Selected(None)]
        );
        assert!(s.board().is_empty());
        assert_eq!(s.board().active(), None);
    }

    #[test]
    fn test_delete_aborted_when_released_elsewhere() {
        let mut s = session();
        place(&mut s, "pawn", 500.0, 500.0);

        down(&mut s, 526.0, 474.0);
        assert!(up(&mut s, 700.0, 700.0).is_empty());
        assert_eq!(s.board().len(), 1);
    }

    #[test]
    fn test_cancel_keeps_committed_moves() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);

        down(&mut s, 500.0, 500.0);
        mv(&mut s, 600.0, 500.0);
        let changes = s.handle_event(&rect(), PointerEvent::Cancel);
        assert!(changes.is_empty());
        assert!(s.mode().is_idle());
        assert!((s.board().find(&id).unwrap().x - 60.0).abs() < 1e-9);

        // The release after a cancel does nothing.
        assert!(up(&mut s, 600.0, 500.0).is_empty());
    }

    #[test]
    fn test_cancelled_placing_keeps_token() {
        let mut s = session();
        s.handle_event(
            &rect(),
            PointerEvent::ToolPressed {
                kind: "pawn".to_string(),
                position: Point::new(300.0, 300.0),
            },
        );
        let changes = s.handle_event(&rect(), PointerEvent::Cancel);
        assert_eq!(changes, vec![BoardChange::PlacingFinished(TokenId::new("t1"))]);
        assert_eq!(s.board().len(), 1);
        assert_eq!(s.selected_tool(), None);
    }

    #[test]
    fn test_delete_token_during_gesture() {
        let mut s = session();
        let id = place(&mut s, "pawn", 500.0, 500.0);

        down(&mut s, 500.0, 500.0);
        s.delete_token(&id);
        assert!(s.mode().is_idle());
        assert!(mv(&mut s, 700.0, 700.0).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut s = session();
        place(&mut s, "pawn", 500.0, 500.0);
        place(&mut s, "pawn", 100.0, 100.0);
        assert_eq!(s.clear(), vec![BoardChange::Cleared]);
        assert!(s.board().is_empty());
        assert_eq!(s.board().active(), None);
    }

    #[test]
    fn test_change_classification() {
        assert!(BoardChange::Moved(TokenId::new("t1")).is_mutation());
        assert!(BoardChange::Cleared.is_mutation());
        assert!(!BoardChange::Selected(None).is_mutation());
        assert!(!BoardChange::PlacingFinished(TokenId::new("t1")).is_mutation());
        assert!(BoardChange::PlacingFinished(TokenId::new("t1")).needs_persist());
        assert!(!BoardChange::PlacingStarted(TokenId::new("t1")).needs_persist());
    }
}
