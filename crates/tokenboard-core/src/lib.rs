//! Token Board Core Library
//!
//! Platform-agnostic core data structures and logic for the token board:
//! coordinate math, the token store, persistence, hit testing, the pointer
//! interaction state machine and the visual sync layer.

pub mod board;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod interaction;
pub mod snapshot;
pub mod storage;
pub mod token;
pub mod tools;
pub mod view;

pub use board::{Board, BoardError};
pub use config::BoardConfig;
pub use controller::BoardController;
pub use geometry::BoardSurface;
pub use hit::{Hit, HitKind, hit_test, tokens_at_point};
pub use input::PointerEvent;
pub use interaction::{BoardChange, CycleMemory, InteractionMode, Session};
pub use snapshot::BoardSnapshot;
pub use storage::{BoardPersistence, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use token::{Token, TokenId};
pub use tools::{Tool, ToolRegistry};
pub use view::{RecordingSink, TokenVisual, ViewSync, VisualSink, VisualState};
