//! Win detection centered on the most recent move.

use tracing::instrument;

use super::super::types::{Board, Cell, Stone};

/// Run length required to win.
pub const WIN_LEN: usize = 5;

/// Steps scanned outward from the center in each direction.
///
/// A run reaching 5 must pass through the last placed stone within 4 cells
/// on either side; anything further would only be completable from a
/// different center and is covered by that move's own check. Bounding the
/// scan here keeps move application independent of board area.
const SCAN: isize = (WIN_LEN - 1) as isize;

/// The four axis directions: horizontal, vertical, both diagonals.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Checks whether the stone at `last` completed a run of five or more.
///
/// Counts contiguous same-color cells extending both ways from `last`
/// along each of the four axes. Returns the winning color, or `None` if no
/// axis reaches [`WIN_LEN`] or `last` is empty/out of range.
#[instrument(skip(board))]
pub fn line_through(board: &Board, last: usize) -> Option<Stone> {
    let stone = match board.get(last)? {
        Cell::Taken(stone) => stone,
        Cell::Empty => return None,
    };

    let n = board.size() as isize;
    let row = last as isize / n;
    let col = last as isize % n;

    for (dr, dc) in AXES {
        let mut run = 1;
        for sign in [1, -1] {
            for step in 1..=SCAN {
                let r = row + dr * sign * step;
                let c = col + dc * sign * step;
                if r < 0 || r >= n || c < 0 || c >= n {
                    break;
                }
                if board.get((r * n + c) as usize) == Some(Cell::Taken(stone)) {
                    run += 1;
                } else {
                    break;
                }
            }
        }
        if run >= WIN_LEN {
            return Some(stone);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(indices: &[usize], stone: Stone) -> Board {
        let mut board = Board::new(10);
        for &i in indices {
            board.place(i, stone).expect("Place failed");
        }
        board
    }

    #[test]
    fn test_no_line_empty_board() {
        let board = Board::new(10);
        assert_eq!(line_through(&board, 0), None);
    }

    #[test]
    fn test_horizontal_run_of_five() {
        let board = board_with(&[0, 1, 2, 3, 4], Stone::Black);
        // Detected from every cell of the run, not just the endpoints.
        for last in [0, 2, 4] {
            assert_eq!(line_through(&board, last), Some(Stone::Black));
        }
    }

    #[test]
    fn test_vertical_run_of_five() {
        let board = board_with(&[7, 17, 27, 37, 47], Stone::White);
        assert_eq!(line_through(&board, 27), Some(Stone::White));
    }

    #[test]
    fn test_diagonal_run_of_five() {
        // Down-right diagonal: step size 11 on a 10-wide board.
        let board = board_with(&[0, 11, 22, 33, 44], Stone::Black);
        assert_eq!(line_through(&board, 22), Some(Stone::Black));
    }

    #[test]
    fn test_anti_diagonal_run_of_five() {
        // Down-left diagonal: step size 9.
        let board = board_with(&[9, 18, 27, 36, 45], Stone::White);
        assert_eq!(line_through(&board, 36), Some(Stone::White));
    }

    #[test]
    fn test_run_of_six_detected() {
        let board = board_with(&[10, 11, 12, 13, 14, 15], Stone::Black);
        assert_eq!(line_through(&board, 12), Some(Stone::Black));
    }

    #[test]
    fn test_run_spanning_full_board_edge() {
        let board = board_with(&[90, 91, 92, 93, 94, 95, 96, 97, 98, 99], Stone::Black);
        assert_eq!(line_through(&board, 95), Some(Stone::Black));
    }

    #[test]
    fn test_run_of_four_not_a_line() {
        let board = board_with(&[0, 1, 2, 3], Stone::Black);
        assert_eq!(line_through(&board, 3), None);
    }

    #[test]
    fn test_broken_run_not_a_line() {
        let mut board = board_with(&[0, 1, 2, 4, 5], Stone::Black);
        board.place(3, Stone::White).expect("Place failed");
        assert_eq!(line_through(&board, 5), None);
    }

    #[test]
    fn test_rows_do_not_wrap() {
        // Cells 7,8,9 end row 0; 10,11 start row 1. Contiguous indices but
        // not a horizontal line.
        let board = board_with(&[7, 8, 9, 10, 11], Stone::Black);
        assert_eq!(line_through(&board, 9), None);
    }

    #[test]
    fn test_run_counted_both_ways_from_center() {
        // Last move fills the middle of the run.
        let mut board = board_with(&[50, 51, 53, 54], Stone::White);
        board.place(52, Stone::White).expect("Place failed");
        assert_eq!(line_through(&board, 52), Some(Stone::White));
    }
}
