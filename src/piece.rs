//! Active falling piece logic

use crate::board::{Board, SPAWN_X, SPAWN_Y, to_board};
use crate::tetromino::{RotationDirection, Shape, TetrominoType, shape_for};
use tracing::trace;

/// One-cell translation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
    /// No offset, used to validate a placement in place
    None,
}

impl Direction {
    /// (dx, dy) in board coordinates; down lowers y
    fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
            Direction::None => (0, 0),
        }
    }
}

/// An active falling piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePiece {
    /// The type of tetromino
    pub piece_type: TetrominoType,
    /// Current matrix, already rotated
    pub shape: Shape,
    /// Anchor: board column of the shape's local column 0
    pub x: i32,
    /// Anchor: board row of the shape's local row 0
    pub y: i32,
}

impl ActivePiece {
    /// Create a new piece at the spawn anchor
    pub fn spawn(piece_type: TetrominoType) -> Self {
        Self {
            piece_type,
            shape: shape_for(piece_type),
            x: SPAWN_X,
            y: SPAWN_Y,
        }
    }

    /// Board positions (row, col) of the filled cells
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.shape
            .occupied()
            .map(|(r, c, _)| to_board(self.x, self.y, r, c))
    }

    /// Whether the piece fits where it is
    pub fn fits(&self, board: &Board) -> bool {
        self.can_move(board, Direction::None)
    }

    fn can_move(&self, board: &Board, direction: Direction) -> bool {
        let (dx, dy) = direction.offset();
        board.is_occupiable(&self.shape, self.x + dx, self.y + dy)
    }

    /// Try to move one cell, returns true if successful.
    /// A rejected move leaves the piece where it was.
    pub fn try_move(&mut self, board: &Board, direction: Direction) -> bool {
        if !self.can_move(board, direction) {
            trace!(?direction, x = self.x, y = self.y, "move rejected");
            return false;
        }
        let (dx, dy) = direction.offset();
        self.x += dx;
        self.y += dy;
        true
    }

    /// Try to rotate in place, returns true if successful.
    ///
    /// The anchor never moves and no kicks are tried: a rotation that
    /// would overlap or leave the board is dropped.
    pub fn rotate(&mut self, board: &Board, direction: RotationDirection) -> bool {
        let rotated = self.shape.rotated(direction);
        if !board.is_occupiable(&rotated, self.x, self.y) {
            trace!(?direction, x = self.x, y = self.y, "rotation rejected");
            return false;
        }
        self.shape = rotated;
        true
    }

    /// Lowest y the piece can fall to from where it is
    pub fn hard_drop_y(&self, board: &Board) -> i32 {
        let mut y = self.y;
        while board.is_occupiable(&self.shape, self.x, y - 1) {
            y -= 1;
        }
        y
    }

    /// Hard drop - move down as far as possible and return the final y
    pub fn hard_drop(&mut self, board: &Board) -> i32 {
        self.y = self.hard_drop_y(board);
        self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BOARD_HEIGHT;
    use crate::tetromino::Cell;

    const BLOCK: Cell = Cell::Filled(TetrominoType::O);

    #[test]
    fn test_spawn_position() {
        let piece = ActivePiece::spawn(TetrominoType::T);
        assert_eq!((piece.x, piece.y), (4, 19));
        assert_eq!(piece.shape, shape_for(TetrominoType::T));
    }

    #[test]
    fn test_cells_map_to_board() {
        let piece = ActivePiece::spawn(TetrominoType::O);
        let cells: Vec<_> = piece.cells().collect();
        assert_eq!(cells, vec![(19, 4), (19, 5), (18, 4), (18, 5)]);
    }

    #[test]
    fn test_move_directions() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::T);

        assert!(piece.try_move(&board, Direction::Left));
        assert_eq!((piece.x, piece.y), (3, 19));
        assert!(piece.try_move(&board, Direction::Right));
        assert!(piece.try_move(&board, Direction::Right));
        assert_eq!((piece.x, piece.y), (5, 19));
        assert!(piece.try_move(&board, Direction::Down));
        assert_eq!((piece.x, piece.y), (5, 18));
        assert!(piece.try_move(&board, Direction::None));
        assert_eq!((piece.x, piece.y), (5, 18));
    }

    #[test]
    fn test_left_wall_rejects() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::O);
        for _ in 0..4 {
            assert!(piece.try_move(&board, Direction::Left));
        }
        assert_eq!(piece.x, 0);
        assert!(!piece.try_move(&board, Direction::Left));
        assert_eq!(piece.x, 0);
    }

    #[test]
    fn test_right_wall_rejects() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::O);
        while piece.try_move(&board, Direction::Right) {}
        // O is two wide: anchor stops at column 8
        assert_eq!(piece.x, 8);
    }

    #[test]
    fn test_down_blocked_by_cell() {
        let board = Board::new().with_cell(17, 5, BLOCK);
        let mut piece = ActivePiece::spawn(TetrominoType::O);
        assert!(!piece.try_move(&board, Direction::Down));
        assert_eq!(piece.y, 19);
    }

    #[test]
    fn test_rotate_keeps_anchor() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::T);
        assert!(piece.rotate(&board, RotationDirection::Clockwise));
        assert_eq!((piece.x, piece.y), (4, 19));
        assert_eq!(piece.shape, shape_for(TetrominoType::T).rotated(RotationDirection::Clockwise));
    }

    #[test]
    fn test_rotate_four_times_returns_original() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::L);
        piece.try_move(&board, Direction::Down);
        piece.try_move(&board, Direction::Down);
        for _ in 0..4 {
            assert!(piece.rotate(&board, RotationDirection::CounterClockwise));
        }
        assert_eq!(piece.shape, shape_for(TetrominoType::L));
    }

    #[test]
    fn test_rotate_into_wall_rejected_without_kick() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::I);
        // vertical I: column 2 of the 4x4 matrix
        assert!(piece.rotate(&board, RotationDirection::Clockwise));
        while piece.try_move(&board, Direction::Right) {}
        // column 2 sits on the right wall, so x = 7
        assert_eq!(piece.x, 7);
        let before = piece.clone();
        assert!(!piece.rotate(&board, RotationDirection::Clockwise));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_rotate_rejected_by_floor() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::I);
        piece.hard_drop(&board);
        // horizontal I lying on row 0, anchor row 1
        assert_eq!(piece.y, 1);
        assert!(!piece.rotate(&board, RotationDirection::Clockwise));
        assert_eq!(piece.shape, shape_for(TetrominoType::I));
    }

    #[test]
    fn test_hard_drop_to_floor() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::O);
        assert_eq!(piece.hard_drop(&board), 1);
        assert_eq!(piece.cells().map(|(r, _)| r).min(), Some(0));
    }

    #[test]
    fn test_hard_drop_onto_obstruction() {
        // obstruction at row 3 under a piece whose lowest cell is at row 10
        let board = Board::new().with_cell(3, 4, BLOCK);
        let mut piece = ActivePiece::spawn(TetrominoType::O);
        piece.y = 11;
        assert_eq!(piece.cells().map(|(r, _)| r).min(), Some(10));

        assert_eq!(piece.hard_drop_y(&board), 5);
        piece.hard_drop(&board);
        assert_eq!(piece.cells().map(|(r, _)| r).min(), Some(4));
    }

    #[test]
    fn test_hard_drop_when_already_resting() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::T);
        piece.hard_drop(&board);
        let y = piece.y;
        assert_eq!(piece.hard_drop(&board), y);
    }

    #[test]
    fn test_piece_may_extend_above_top() {
        let board = Board::new();
        let mut piece = ActivePiece::spawn(TetrominoType::O);
        piece.y = BOARD_HEIGHT as i32;
        assert!(piece.fits(&board));
        assert!(piece.try_move(&board, Direction::Down));
    }
}
