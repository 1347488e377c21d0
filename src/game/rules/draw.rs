//! Draw detection.

use tracing::instrument;

use super::super::types::{Board, Cell};

/// Checks if the board is exhausted (all cells occupied).
///
/// A full board with no line through the final move is a draw.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Cell::Empty)
}
