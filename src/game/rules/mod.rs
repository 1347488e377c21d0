//! Game rules for five-in-a-row.
//!
//! Pure functions for evaluating board state. Rules are separated from
//! board storage so the session layer can compose them into transitions.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{WIN_LEN, line_through};

use tracing::instrument;

use super::types::{Board, Outcome};

/// Determines the outcome of the most recent move.
///
/// Line detection runs before draw detection, so filling the final empty
/// cell with a winning move reports the line, not a draw.
#[instrument(skip(board))]
pub fn detect_outcome(board: &Board, last: usize) -> Outcome {
    if let Some(stone) = line_through(board, last) {
        return Outcome::Line(stone);
    }
    if is_full(board) {
        return Outcome::Draw;
    }
    Outcome::Open
}
