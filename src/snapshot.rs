//! Render-ready view of a session
//!
//! This is the whole contract with a renderer: the combined grid, the
//! lost flag and the cleared-row counter. Serialized field names are
//! `grid`, `lost` and `clearedRows`; cells serialize as their labels.

use crate::board::{BOARD_HEIGHT, Board, Row};
use crate::tetromino::Cell;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Committed cells plus the falling piece, `[row][col]`, row 0 at the bottom
    pub grid: [Row; BOARD_HEIGHT],
    pub lost: bool,
    pub cleared_rows: u32,
}

impl Snapshot {
    pub fn new(grid: &Board, lost: bool, cleared_rows: u32) -> Self {
        Self {
            grid: *grid.rows(),
            lost,
            cleared_rows,
        }
    }

    /// Number of non-empty cells in the grid
    pub fn filled_count(&self) -> usize {
        self.grid.iter().flatten().filter(|c| c.is_filled()).count()
    }

    /// Highest row holding anything, if any
    pub fn top_filled_row(&self) -> Option<usize> {
        self.grid
            .iter()
            .rposition(|row| row.iter().any(Cell::is_filled))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Plain text picture, top row first, `.` for empty cells
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(BOARD_HEIGHT * (self.grid[0].len() + 1));
        for row in self.grid.iter().rev() {
            for cell in row {
                match cell {
                    Cell::Empty => out.push('.'),
                    Cell::Filled(t) => out.push_str(&t.label().to_uppercase()),
                }
            }
            out.push('\n');
        }
        out
    }
}
