//! Game board representation and collision detection

use crate::tetromino::{Cell, Shape};
use std::collections::BTreeSet;
use tracing::warn;

/// Standard Tetris board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

/// Spawn anchor: top row, just left of center
pub const SPAWN_X: i32 = BOARD_WIDTH as i32 / 2 - 1;
pub const SPAWN_Y: i32 = BOARD_HEIGHT as i32 - 1;

/// One board row, column 0 on the left
pub type Row = [Cell; BOARD_WIDTH];

/// The game board
///
/// Boards are values: every transition returns a new board and leaves the
/// old one intact, so anyone holding a snapshot never sees a half-written
/// commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Grid stored as [row][col], row 0 is bottom, row increases upward
    cells: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a shape-local cell onto the board for an anchor at (x, y).
/// Local rows grow downward, board rows grow upward.
#[inline]
pub fn to_board(x: i32, y: i32, row: usize, col: usize) -> (i32, i32) {
    (y - row as i32, x + col as i32)
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    /// Get the cell at a position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        let row = row as usize;
        let col = col as usize;
        if row >= BOARD_HEIGHT || col >= BOARD_WIDTH {
            return None;
        }
        Some(self.cells[row][col])
    }

    /// Copy of this board with one cell replaced
    /// Out-of-bounds positions return the board unchanged
    pub fn with_cell(&self, row: i32, col: i32, cell: Cell) -> Board {
        let mut next = self.clone();
        next.set(row, col, cell);
        next
    }

    fn set(&mut self, row: i32, col: i32, cell: Cell) -> bool {
        if self.get(row, col).is_none() {
            return false;
        }
        self.cells[row as usize][col as usize] = cell;
        true
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.cells.get(row)
    }

    /// All rows, bottom first
    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.cells
    }

    pub(crate) fn from_rows(cells: [Row; BOARD_HEIGHT]) -> Self {
        Self { cells }
    }

    /// Whether every cell is empty
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|row| row.iter().all(|cell| cell.is_empty()))
    }

    /// Can `shape` sit with its anchor at (x, y)?
    ///
    /// Fails on negative columns or rows, columns past the right wall and
    /// filled cells. Rows above the top are allowed so a piece may poke
    /// out of the grid while it falls.
    pub fn is_occupiable(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.occupied().all(|(r, c, _)| {
            let (row, col) = to_board(x, y, r, c);
            if row < 0 || col < 0 || col >= BOARD_WIDTH as i32 {
                return false;
            }
            if row >= BOARD_HEIGHT as i32 {
                return true;
            }
            self.cells[row as usize][col as usize].is_empty()
        })
    }

    /// Write the shape's labels into a new board.
    ///
    /// Returns the new board and the distinct rows touched, ascending.
    pub fn commit(&self, shape: &Shape, x: i32, y: i32) -> (Board, Vec<usize>) {
        let mut next = self.clone();
        let mut touched = BTreeSet::new();

        for (r, c, piece_type) in shape.occupied() {
            let (row, col) = to_board(x, y, r, c);
            if next.set(row, col, Cell::Filled(piece_type)) {
                touched.insert(row as usize);
            } else {
                warn!(row, col, "commit skipped a cell outside the board");
            }
        }

        (next, touched.into_iter().collect())
    }

    /// Board with the shape drawn on top, for display only.
    /// Cells above the grid are dropped.
    pub fn overlay(&self, shape: &Shape, x: i32, y: i32) -> Board {
        let mut next = self.clone();
        for (r, c, piece_type) in shape.occupied() {
            let (row, col) = to_board(x, y, r, c);
            next.set(row, col, Cell::Filled(piece_type));
        }
        next
    }
}
