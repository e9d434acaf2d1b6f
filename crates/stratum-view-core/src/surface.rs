//! Display cell surfaces.

use thiserror::Error;

/// Surface error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("Cell {index} out of range (surface has {len} cells)")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered set of display cells the renderer writes into.
///
/// Cells are addressed by their row-major position. Implementations own the
/// cells; the renderer only replaces their text.
pub trait CellSurface {
    /// Number of cells available.
    fn len(&self) -> usize;

    /// Whether the surface has no cells.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the text of the cell at `index`.
    ///
    /// # Errors
    /// Returns [`SurfaceError::OutOfRange`] if `index >= len()`.
    fn set_text(&mut self, index: usize, text: &str) -> Result<(), SurfaceError>;
}

impl<S: CellSurface + ?Sized> CellSurface for &mut S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn set_text(&mut self, index: usize, text: &str) -> Result<(), SurfaceError> {
        (**self).set_text(index, text)
    }
}

impl CellSurface for Vec<String> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn set_text(&mut self, index: usize, text: &str) -> Result<(), SurfaceError> {
        let len = self.as_slice().len();
        let cell = self
            .get_mut(index)
            .ok_or(SurfaceError::OutOfRange { index, len })?;
        text.clone_into(cell);
        Ok(())
    }
}

/// In-memory grid of text cells.
///
/// Counts every write so callers can tell an untouched surface from one that
/// was rewritten with identical text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellGrid {
    cols: usize,
    cells: Vec<String>,
    mutations: usize,
}

impl CellGrid {
    /// Create a `rows` x `cols` grid of empty cells.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            cells: vec![String::new(); rows * cols],
            mutations: 0,
        }
    }

    /// Create a single-row grid of `len` empty cells.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self::new(1, len)
    }

    /// Number of columns per row.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Text of the cell at `index`.
    #[must_use]
    pub fn text(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// All cell texts in row-major order.
    #[must_use]
    pub fn texts(&self) -> &[String] {
        &self.cells
    }

    /// Cells grouped into rows.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(self.cols.max(1))
    }

    /// Total number of writes applied so far.
    #[must_use]
    pub const fn mutations(&self) -> usize {
        self.mutations
    }
}

impl CellSurface for CellGrid {
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn set_text(&mut self, index: usize, text: &str) -> Result<(), SurfaceError> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(SurfaceError::OutOfRange { index, len })?;
        text.clone_into(cell);
        self.mutations += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_writes_and_counts() {
        let mut grid = CellGrid::new(2, 2);
        assert_eq!(grid.len(), 4);
        grid.set_text(3, "X").unwrap();
        grid.set_text(3, "X").unwrap();
        assert_eq!(grid.text(3), Some("X"));
        assert_eq!(grid.mutations(), 2);

        let rows: Vec<_> = grid.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], ["", "X"]);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut grid = CellGrid::with_len(3);
        assert_eq!(
            grid.set_text(3, "O"),
            Err(SurfaceError::OutOfRange { index: 3, len: 3 })
        );
        assert_eq!(grid.mutations(), 0);

        let mut cells = vec![String::new()];
        assert!(cells.set_text(1, "O").is_err());
        assert!(CellSurface::is_empty(&Vec::<String>::new()));
    }

    #[test]
    fn test_empty_grid_has_no_rows() {
        let grid = CellGrid::new(0, 0);
        assert!(grid.is_empty());
        assert_eq!(grid.rows().count(), 0);
    }
}
