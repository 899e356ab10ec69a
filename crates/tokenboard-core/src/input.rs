//! Pointer input events.
//!
//! Mouse, pen and touch all arrive as one unified pointer stream. Positions
//! are viewport (client) pixels; the session converts them against the
//! board's bounding box at the time of each event.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    /// Primary button pressed on the board.
    Down { position: Point },
    /// Pointer moved anywhere in the window.
    Move { position: Point },
    /// Primary button released anywhere in the window.
    Up { position: Point },
    /// The platform aborted the gesture.
    Cancel,
    /// A toolbar button was pressed: select that tool and start placing.
    ToolPressed { kind: String, position: Point },
}

impl PointerEvent {
    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Down { position }
            | Self::Move { position }
            | Self::Up { position }
            | Self::ToolPressed { position, .. } => Some(*position),
            Self::Cancel => None,
        }
    }

    /// Whether this event ends the current gesture.
    pub fn ends_gesture(&self) -> bool {
        matches!(self, Self::Up { .. } | Self::Cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(PointerEvent::Down { position: p }.position(), Some(p));
        assert_eq!(
            PointerEvent::ToolPressed {
                kind: "pawn".to_string(),
                position: p
            }
            .position(),
            Some(p)
        );
        assert_eq!(PointerEvent::Cancel.position(), None);
    }

    #[test]
    fn test_ends_gesture() {
        assert!(PointerEvent::Up { position: Point::ZERO }.ends_gesture());
        assert!(PointerEvent::Cancel.ends_gesture());
        assert!(!PointerEvent::Move { position: Point::ZERO }.ends_gesture());
    }

    #[test]
    fn test_serde() {
        let event = PointerEvent::Move {
            position: Point::new(1.5, 2.5),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: PointerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
