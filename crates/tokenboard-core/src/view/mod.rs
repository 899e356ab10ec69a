//! Visual sync layer.
//!
//! Projects token records into renderer-facing visuals:
//! - one `TokenVisual` per token, centre-anchored in percent
//! - at most one visual in the `Active` state
//!
//! Records remain pure data. The view never reads pointer state and never
//! mutates the board.

mod state;
mod sync;

pub use state::{TokenVisual, VisualState};
pub use sync::{RecordingSink, ViewSync, VisualSink};
