//! Hit testing: which token, and which part of it, lies under a pointer.
//!
//! All geometry is in viewport pixels. A token is a square centred on its
//! stored position and rotated about that centre. The active token also
//! carries three controls that rotate with it.

use crate::board::Board;
use crate::geometry::percent_to_client;
use crate::token::{Token, TokenId};
use kurbo::{Affine, Point, Rect};

/// Hit radius of each control, in pixels.
pub const HANDLE_HIT_RADIUS: f64 = 12.0;
/// Distance of the rotate handle above the token's top edge, in pixels.
pub const ROTATE_HANDLE_OFFSET: f64 = 18.0;

/// The part of a token that was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitKind {
    Body,
    RotateHandle,
    ResizeHandle,
    DeleteControl,
}

/// A hit-test result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub kind: HitKind,
    pub token: TokenId,
}

impl Hit {
    fn new(kind: HitKind, token: &Token) -> Self {
        Self {
            kind,
            token: token.id.clone(),
        }
    }
}

/// A control with its position in viewport pixels.
#[derive(Debug, Clone, Copy)]
pub struct Handle {
    pub kind: HitKind,
    pub position: Point,
}

impl Handle {
    /// Check if a point hits this handle.
    pub fn hit_test(&self, point: Point) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= HANDLE_HIT_RADIUS * HANDLE_HIT_RADIUS
    }
}

/// Token-local frame to viewport pixels.
fn token_transform(token: &Token, rect: Rect) -> Affine {
    let center = percent_to_client(rect, token.center_percent());
    Affine::translate(center.to_vec2()) * Affine::rotate(f64::from(token.rotation).to_radians())
}

/// Centre of a token in viewport pixels.
pub fn token_center(token: &Token, rect: Rect) -> Point {
    percent_to_client(rect, token.center_percent())
}

/// Whether a point lies on the token's (rotated) square.
pub fn body_contains(token: &Token, rect: Rect, point: Point) -> bool {
    let local = token_transform(token, rect).inverse() * point;
    let half = token.half_size();
    local.x.abs() <= half && local.y.abs() <= half
}

/// Control positions for a token, in hit-test priority order.
pub fn handles(token: &Token, rect: Rect) -> [Handle; 3] {
    let transform = token_transform(token, rect);
    let half = token.half_size();
    [
        Handle {
            kind: HitKind::DeleteControl,
            position: transform * Point::new(half, -half),
        },
        Handle {
            kind: HitKind::ResizeHandle,
            position: transform * Point::new(half, half),
        },
        Handle {
            kind: HitKind::RotateHandle,
            position: transform * Point::new(0.0, -half - ROTATE_HANDLE_OFFSET),
        },
    ]
}

/// Hit test a single token. Controls are only live when `active` is set.
fn hit_token(token: &Token, active: bool, rect: Rect, point: Point) -> Option<Hit> {
    if active {
        if let Some(handle) = handles(token, rect).iter().find(|h| h.hit_test(point)) {
            return Some(Hit::new(handle.kind, token));
        }
    }
    body_contains(token, rect, point).then(|| Hit::new(HitKind::Body, token))
}

/// The topmost token part under `point`.
pub fn hit_test(board: &Board, rect: Rect, point: Point) -> Option<Hit> {
    let active = board.active();
    board
        .tokens_topmost_first()
        .find_map(|token| hit_token(token, active == Some(&token.id), rect, point))
}

/// Every token under `point`, topmost first.
pub fn tokens_at_point(board: &Board, rect: Rect, point: Point) -> Vec<TokenId> {
    let active = board.active();
    board
        .tokens_topmost_first()
        .filter(|token| hit_token(token, active == Some(&token.id), rect, point).is_some())
        .map(|token| token.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolRegistry;

    // 1000 x 1000 board, so 1% == 10px.
    fn rect() -> Rect {
        Rect::new(0.0, 0.0, 1000.0, 1000.0)
    }

    fn board_with(positions: &[(f64, f64)]) -> (Board, Vec<TokenId>) {
        let registry = ToolRegistry::new().with_tool("pawn", "/img/pawn.png");
        let mut board = Board::new();
        let ids = positions
            .iter()
            .map(|&(x, y)| board.create("pawn", x, y, &registry).unwrap().id.clone())
            .collect();
        (board, ids)
    }

    #[test]
    fn test_body_hit() {
        let (board, ids) = board_with(&[(50.0, 50.0)]);
        // size 52, half 26 around (500, 500)
        let hit = hit_test(&board, rect(), Point::new(520.0, 480.0)).unwrap();
        assert_eq!(hit, Hit { kind: HitKind::Body, token: ids[0].clone() });
        assert!(hit_test(&board, rect(), Point::new(530.0, 500.0)).is_none());
    }

    #[test]
    fn test_rotated_body() {
        let (mut board, ids) = board_with(&[(50.0, 50.0)]);
        board.find_mut(&ids[0]).unwrap().rotation = 45;
        // The unrotated corner is outside a 45 degree diamond.
        assert!(!body_contains(board.find(&ids[0]).unwrap(), rect(), Point::new(524.0, 524.0)));
        // But the diamond reaches further along the axes.
        assert!(body_contains(board.find(&ids[0]).unwrap(), rect(), Point::new(534.0, 500.0)));
    }

    #[test]
    fn test_handles_only_on_active_token() {
        let (mut board, ids) = board_with(&[(50.0, 50.0)]);
        let delete_corner = Point::new(526.0, 474.0);
        assert_eq!(hit_test(&board, rect(), delete_corner).unwrap().kind, HitKind::Body);

        board.set_active(Some(ids[0].clone()));
        assert_eq!(
            hit_test(&board, rect(), delete_corner).unwrap().kind,
            HitKind::DeleteControl
        );
        assert_eq!(
            hit_test(&board, rect(), Point::new(526.0, 526.0)).unwrap().kind,
            HitKind::ResizeHandle
        );
        assert_eq!(
            hit_test(&board, rect(), Point::new(500.0, 456.0)).unwrap().kind,
            HitKind::RotateHandle
        );
    }

    #[test]
    fn test_handles_rotate_with_token() {
        let (mut board, ids) = board_with(&[(50.0, 50.0)]);
        board.find_mut(&ids[0]).unwrap().rotation = 90;
        board.set_active(Some(ids[0].clone()));
        // Rotated 90 degrees clockwise (y down), "above" becomes "right".
        let hit = hit_test(&board, rect(), Point::new(544.0, 500.0)).unwrap();
        assert_eq!(hit.kind, HitKind::RotateHandle);
    }

    #[test]
    fn test_topmost_first() {
        let (board, ids) = board_with(&[(50.0, 50.0), (51.0, 50.0), (80.0, 80.0)]);
        let stack = tokens_at_point(&board, rect(), Point::new(505.0, 500.0));
        assert_eq!(stack, vec![ids[1].clone(), ids[0].clone()]);
        assert_eq!(hit_test(&board, rect(), Point::new(505.0, 500.0)).unwrap().token, ids[1]);
    }

    #[test]
    fn test_empty_space() {
        let (board, _) = board_with(&[(50.0, 50.0)]);
        assert!(tokens_at_point(&board, rect(), Point::new(10.0, 10.0)).is_empty());
    }
}
