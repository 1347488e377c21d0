//! Five-in-a-row board and rules.

mod types;

pub mod rules;

pub use rules::{WIN_LEN, detect_outcome, is_full, line_through};
pub use types::{Board, Cell, Outcome, Stone};
