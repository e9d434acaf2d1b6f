//! Core model and rendering for live game views.
//!
//! This crate provides the I/O-free building blocks:
//! - `Board` / `GameState` - Decoded game state
//! - `protocol` - Enveloped and length-prefixed wire formats
//! - `CellSurface` / `CellGrid` - Display cells written by the renderer
//! - `StateRenderer` - Message to cell-write pipeline

pub mod board;
pub mod protocol;
pub mod renderer;
pub mod surface;

pub use board::{Board, BoardError, GameState};
pub use protocol::{DecodeError, WireFormat, decode};
pub use renderer::{RenderError, RenderOutcome, StateRenderer};
pub use surface::{CellGrid, CellSurface, SurfaceError};
