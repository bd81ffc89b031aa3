//! Line clear detection and compaction
//!
//! Only the rows a commit touched are inspected: nothing else on the
//! board could have become full.

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board, Row};
use crate::tetromino::Cell;
use std::collections::BTreeSet;
use tracing::debug;

/// A row survives if any of its cells is still empty
fn keep_row(row: &Row) -> bool {
    row.iter().fold(false, |keep, cell| keep || cell.is_empty())
}

/// Remove the full rows among `rows` and compact the board.
///
/// `rows` may come in any order and with repeats; each distinct row is
/// checked once. Deletions run from the highest index down: the row is removed,
/// everything above drops by one and a fresh empty row is added at the
/// top. Returns the new board and how many rows were cleared.
pub fn check_rows_and_complete(board: &Board, rows: &[usize]) -> (Board, usize) {
    let mut cells = *board.rows();

    let candidates: BTreeSet<usize> = rows.iter().copied().collect();
    let to_delete: Vec<usize> = candidates
        .into_iter()
        .filter(|&r| r < BOARD_HEIGHT && !keep_row(&cells[r]))
        .collect();

    for &r in to_delete.iter().rev() {
        cells.copy_within(r + 1.., r);
        cells[BOARD_HEIGHT - 1] = [Cell::Empty; BOARD_WIDTH];
    }

    if !to_delete.is_empty() {
        debug!(rows = ?to_delete, "cleared rows");
    }

    (Board::from_rows(cells), to_delete.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::TetrominoType;

    const FULL: Cell = Cell::Filled(TetrominoType::I);
    const MARK: Cell = Cell::Filled(TetrominoType::T);

    fn fill_row(board: &Board, row: usize) -> Board {
        (0..BOARD_WIDTH).fold(board.clone(), |b, col| b.with_cell(row as i32, col as i32, FULL))
    }

    #[test]
    fn test_keep_row_any_gap() {
        let mut row = [FULL; BOARD_WIDTH];
        assert!(!keep_row(&row));
        row[9] = Cell::Empty;
        assert!(keep_row(&row));
        assert!(keep_row(&[Cell::Empty; BOARD_WIDTH]));
    }

    #[test]
    fn test_single_row_clear() {
        let mut board = fill_row(&Board::new(), 5);
        board = board.with_cell(4, 0, MARK); // below
        board = board.with_cell(6, 1, MARK); // above
        board = board.with_cell(19, 2, MARK); // top row

        let (next, cleared) = check_rows_and_complete(&board, &[5]);
        assert_eq!(cleared, 1);
        // below unchanged
        assert_eq!(next.get(4, 0), Some(MARK));
        // above shifted down one
        assert_eq!(next.get(5, 1), Some(MARK));
        assert_eq!(next.get(6, 1), Some(Cell::Empty));
        assert_eq!(next.get(18, 2), Some(MARK));
        // fresh empty top row
        assert!(next.row(BOARD_HEIGHT - 1).unwrap().iter().all(Cell::is_empty));
        // no full row left
        assert!(next.rows().iter().all(keep_row));
    }

    #[test]
    fn test_partial_row_kept() {
        let board = fill_row(&Board::new(), 0).with_cell(0, 3, Cell::Empty);
        let (next, cleared) = check_rows_and_complete(&board, &[0]);
        assert_eq!(cleared, 0);
        assert_eq!(next, board);
    }

    #[test]
    fn test_non_candidate_rows_not_inspected() {
        let board = fill_row(&fill_row(&Board::new(), 0), 2);
        let (next, cleared) = check_rows_and_complete(&board, &[2]);
        assert_eq!(cleared, 1);
        // row 0 was full but not a candidate
        assert!(!keep_row(next.row(0).unwrap()));
    }

    #[test]
    fn test_multiple_rows_descending_deletion() {
        // rows 1 and 3 full, row 2 has a marker that must land on row 1
        let mut board = fill_row(&fill_row(&Board::new(), 1), 3);
        board = board.with_cell(2, 7, MARK);
        board = board.with_cell(4, 8, MARK);

        let (next, cleared) = check_rows_and_complete(&board, &[1, 2, 3]);
        assert_eq!(cleared, 2);
        assert_eq!(next.get(1, 7), Some(MARK));
        assert_eq!(next.get(2, 8), Some(MARK));
        assert!(next.row(18).unwrap().iter().all(Cell::is_empty));
        assert!(next.row(19).unwrap().iter().all(Cell::is_empty));
    }

    #[test]
    fn test_repeated_candidates_clear_once() {
        let board = fill_row(&Board::new(), 2).with_cell(3, 0, MARK);
        let (next, cleared) = check_rows_and_complete(&board, &[2, 2]);
        assert_eq!(cleared, 1);
        // row 3 dropped into row 2 and survived
        assert_eq!(next.get(2, 0), Some(MARK));
        assert_eq!(next.get(3, 0), Some(Cell::Empty));
    }

    #[test]
    fn test_unsorted_candidates() {
        let mut board = fill_row(&fill_row(&Board::new(), 1), 3);
        board = board.with_cell(2, 7, MARK);
        board = board.with_cell(4, 8, MARK);

        let (next, cleared) = check_rows_and_complete(&board, &[3, 1, 2]);
        assert_eq!(cleared, 2);
        assert_eq!(next.get(1, 7), Some(MARK));
        assert_eq!(next.get(2, 8), Some(MARK));
    }

    #[test]
    fn test_four_rows_at_bottom() {
        let mut board = Board::new();
        for r in 0..4 {
            board = fill_row(&board, r);
        }
        let (next, cleared) = check_rows_and_complete(&board, &[0, 1, 2, 3]);
        assert_eq!(cleared, 4);
        assert!(next.is_empty());
    }

    #[test]
    fn test_top_row_clear() {
        let board = fill_row(&Board::new(), BOARD_HEIGHT - 1);
        let (next, cleared) = check_rows_and_complete(&board, &[BOARD_HEIGHT - 1]);
        assert_eq!(cleared, 1);
        assert!(next.is_empty());
    }

    #[test]
    fn test_out_of_range_candidates_ignored() {
        let board = fill_row(&Board::new(), 0);
        let (next, cleared) = check_rows_and_complete(&board, &[BOARD_HEIGHT, BOARD_HEIGHT + 5]);
        assert_eq!(cleared, 0);
        assert_eq!(next, board);
    }
}
