//! Core domain types for the five-in-a-row board.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Stone color placed on the board. The host plays black, the guest white.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stone {
    /// Host's stone (moves first).
    Black,
    /// Guest's stone.
    White,
}

impl Stone {
    /// Returns the opposing color.
    pub fn opponent(self) -> Self {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }
}

/// A single cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    /// No stone placed.
    Empty,
    /// Cell holds a stone.
    Taken(Stone),
}

/// Square grid of cells in row-major order.
///
/// The side length is a parameter (10 under the current rules) so the board
/// stays reusable for other run-length variants. Invariant: `cells.len()`
/// is always exactly `size * size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board with the given side length.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Total cell count (`size * size`).
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Gets the cell at the given index.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if a cell exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Counts empty cells remaining.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }

    /// All cells as a slice.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Places a stone at the given index.
    ///
    /// The board is owned exclusively by whoever is computing the next
    /// session state, so this mutates in place.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidMove`] if the index is out of range or
    /// the cell is occupied.
    pub fn place(&mut self, index: usize, stone: Stone) -> Result<(), EngineError> {
        if !self.is_empty(index) {
            return Err(EngineError::InvalidMove { index });
        }
        self.cells[index] = Cell::Taken(stone);
        Ok(())
    }

    /// Formats the board as a human-readable grid for logs.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..self.size {
            for col in 0..self.size {
                let symbol = match self.cells[row * self.size + col] {
                    Cell::Empty => '.',
                    Cell::Taken(Stone::Black) => 'B',
                    Cell::Taken(Stone::White) => 'W',
                };
                result.push(symbol);
                if col < self.size - 1 {
                    result.push(' ');
                }
            }
            if row < self.size - 1 {
                result.push('\n');
            }
        }
        result
    }
}

/// Result of inspecting the board after a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Game continues.
    Open,
    /// The most recent move completed a run of five or more.
    Line(Stone),
    /// Board exhausted with no line.
    Draw,
}
