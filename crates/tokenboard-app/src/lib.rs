//! Token Board Application
//!
//! The browser shell: page settings, DOM pointer events into the board
//! controller, and token elements out of it.

pub mod page;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{run_wasm, DomSink};
