//! Board and game state model.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Shape error raised while building a [`Board`] from decoded JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Board is not an array of rows")]
    NotRows,
    #[error("Row {row} is not an array of cells")]
    NotCells { row: usize },
    #[error("Cell ({row}, {col}) is not a string")]
    BadCell { row: usize, col: usize },
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rectangular grid of cell values, rows first.
///
/// An empty string marks an unplayed cell. Boards are rebuilt from every
/// inbound message and never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Board {
    rows: Vec<Vec<String>>,
}

impl Board {
    /// Build a board from owned rows.
    ///
    /// # Errors
    /// Returns [`BoardError::RaggedRow`] if the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Result<Self, BoardError> {
        if let Some(first) = rows.first() {
            let expected = first.len();
            if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
                return Err(BoardError::RaggedRow {
                    row,
                    expected,
                    found: r.len(),
                });
            }
        }
        Ok(Self { rows })
    }

    /// Build a board from a decoded JSON value.
    ///
    /// Cells must be strings; `null` is accepted as an unplayed cell since
    /// the game engine emits it for empty squares.
    ///
    /// # Errors
    /// Returns a [`BoardError`] describing the first shape violation.
    pub fn from_value(value: &Value) -> Result<Self, BoardError> {
        let Value::Array(raw_rows) = value else {
            return Err(BoardError::NotRows);
        };

        let mut rows = Vec::with_capacity(raw_rows.len());
        for (row, raw_row) in raw_rows.iter().enumerate() {
            let Value::Array(raw_cells) = raw_row else {
                return Err(BoardError::NotCells { row });
            };
            let cells = raw_cells
                .iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Value::String(s) => Ok(s.clone()),
                    Value::Null => Ok(String::new()),
                    _ => Err(BoardError::BadCell { row, col }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(cells);
        }

        Self::from_rows(rows)
    }

    /// Rows of the board.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// `(rows, columns)`.
    #[must_use]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, Vec::len))
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Cell value at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Cell values in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }
}

/// Game state carried by one inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameState {
    /// Current board.
    pub board: Board,
    /// Winning player's mark, when the engine reported one.
    pub winner: Option<String>,
}

impl GameState {
    /// Extract the state from a decoded payload.
    ///
    /// An object with a `board` field yields that field (and its optional
    /// `winner`); any other value is taken as the board itself.
    ///
    /// # Errors
    /// Returns a [`BoardError`] if the board has the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, BoardError> {
        match value {
            Value::Object(map) if map.contains_key("board") => Ok(Self {
                board: Board::from_value(&map["board"])?,
                winner: map
                    .get("winner")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            }),
            other => Ok(Self {
                board: Board::from_value(other)?,
                winner: None,
            }),
        }
    }
}
