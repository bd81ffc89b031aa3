//! Tetromino definitions and shapes
//!
//! The 7 standard tetrominoes as small label matrices. Rotations are
//! computed from the matrix, never stored.

use serde::{Serialize, Serializer};

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoType {
    I, // long bar
    J,
    L,
    O, // square
    S,
    T,
    Z,
}

impl TetrominoType {
    /// Get all tetromino types, in label order
    pub fn all() -> [TetrominoType; 7] {
        [
            TetrominoType::I,
            TetrominoType::J,
            TetrominoType::L,
            TetrominoType::O,
            TetrominoType::S,
            TetrominoType::T,
            TetrominoType::Z,
        ]
    }

    /// Lowercase one-letter label, as handed to renderers
    pub fn label(&self) -> &'static str {
        match self {
            TetrominoType::I => "i",
            TetrominoType::J => "j",
            TetrominoType::L => "l",
            TetrominoType::O => "o",
            TetrominoType::S => "s",
            TetrominoType::T => "t",
            TetrominoType::Z => "z",
        }
    }

    /// Canonical spawn pattern, top row first. `.` is an empty cell.
    fn pattern(&self) -> &'static [&'static str] {
        match self {
            TetrominoType::I => &["....", "IIII", "....", "...."],
            TetrominoType::J => &["J..", "JJJ", "..."],
            TetrominoType::L => &["..L", "LLL", "..."],
            TetrominoType::O => &["OO", "OO"],
            TetrominoType::S => &[".SS", "SS.", "..."],
            TetrominoType::T => &[".T.", "TTT", "..."],
            TetrominoType::Z => &["ZZ.", ".ZZ", "..."],
        }
    }
}

/// A cell on the board or inside a shape - either empty or labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(TetrominoType),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    /// Label of the cell, `""` when empty
    pub fn label(&self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::Filled(t) => t.label(),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Direction for rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

/// A rectangular matrix of cells in its own coordinate space.
///
/// Local row 0 is the top of the shape and rows grow downward, which is
/// the opposite of board rows. See [`crate::board::Board::is_occupiable`]
/// for the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    cells: Vec<Vec<Cell>>,
}

impl Shape {
    fn from_pattern(piece_type: TetrominoType, pattern: &[&str]) -> Self {
        let cells = pattern
            .iter()
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        '.' => Cell::Empty,
                        _ => Cell::Filled(piece_type),
                    })
                    .collect()
            })
            .collect();
        Self { cells }
    }

    /// Build a shape from raw rows. All rows must share one length.
    pub fn from_rows(cells: Vec<Vec<Cell>>) -> Option<Self> {
        let width = cells.first()?.len();
        if width == 0 || cells.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self { cells })
    }

    /// Number of rows (N)
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Number of columns (M)
    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Iterate the filled cells as (local row, local col, type)
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, TetrominoType)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(col, cell)| match cell {
                Cell::Filled(t) => Some((row, col, *t)),
                Cell::Empty => None,
            })
        })
    }

    /// Rotate the matrix by 90 degrees.
    ///
    /// Clockwise maps `(row, col)` to `(col, N-1-row)`, counter-clockwise
    /// to `(M-1-col, row)`, so the result is M rows by N columns.
    pub fn rotated(&self, direction: RotationDirection) -> Shape {
        let n = self.height();
        let m = self.width();
        let mut cells = vec![vec![Cell::Empty; n]; m];

        for (row, line) in self.cells.iter().enumerate() {
            for (col, &cell) in line.iter().enumerate() {
                match direction {
                    RotationDirection::Clockwise => cells[col][n - 1 - row] = cell,
                    RotationDirection::CounterClockwise => cells[m - 1 - col][row] = cell,
                }
            }
        }

        Shape { cells }
    }
}

/// Fresh copy of the canonical matrix for a tetromino
pub fn shape_for(piece_type: TetrominoType) -> Shape {
    Shape::from_pattern(piece_type, piece_type.pattern())
}
