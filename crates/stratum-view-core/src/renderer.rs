//! Renders decoded game states onto a cell surface.

use thiserror::Error;

use crate::{
    board::GameState,
    protocol::{self, DecodeError},
    surface::{CellSurface, SurfaceError},
};

/// Render error.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
}

/// Result of rendering one state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Cells written.
    pub written: usize,
    /// Board values that did not fit on the surface.
    pub dropped: usize,
    /// Winner reported alongside the board.
    pub winner: Option<String>,
}

/// Turns inbound messages into cell writes.
///
/// Holds no state between messages besides the surface itself: every
/// message is decoded and rendered on its own.
#[derive(Debug)]
pub struct StateRenderer<S> {
    surface: S,
}

impl<S: CellSurface> StateRenderer<S> {
    /// Create a renderer writing into `surface`.
    #[must_use]
    pub const fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Decode a raw message and render it.
    ///
    /// Decoding finishes before the first write, so a rejected message
    /// leaves the surface untouched.
    ///
    /// # Errors
    /// Returns [`RenderError::Decode`] if the message cannot be decoded.
    pub fn handle_message(&mut self, raw: &str) -> Result<RenderOutcome, RenderError> {
        let state = protocol::decode(raw)?;
        self.render(&state)
    }

    /// Write the board row by row into consecutive cells.
    ///
    /// Cells past the end of the board keep their text. Values past the end
    /// of the surface are skipped and counted in [`RenderOutcome::dropped`].
    ///
    /// # Errors
    /// Returns [`RenderError::Surface`] if the surface rejects a write.
    pub fn render(&mut self, state: &GameState) -> Result<RenderOutcome, RenderError> {
        let capacity = self.surface.len();
        let total = state.board.cell_count();

        for (index, value) in state.board.cells().take(capacity).enumerate() {
            self.surface.set_text(index, value)?;
        }

        let written = total.min(capacity);
        let dropped = total - written;
        let (rows, cols) = state.board.dimensions();
        if dropped > 0 {
            tracing::warn!(rows, cols, capacity, dropped, "Board larger than cell surface");
        }
        tracing::debug!(rows, cols, written, "Rendered board");

        Ok(RenderOutcome {
            written,
            dropped,
            winner: state.winner.clone(),
        })
    }

    /// The surface being rendered into.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Consume the renderer, returning its surface.
    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
