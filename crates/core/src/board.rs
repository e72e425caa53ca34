//! Board module - manages the game grid
//!
//! The board is an N×N grid where each cell is empty or covered by a colored piece cell.
//! Uses a flat vector in row-major order; the size is fixed when the board is created.
//! Coordinates: (x, y) where x ranges 0..N (left to right), y ranges 0..N (top to bottom).
//!
//! Only two mutators exist: [`Board::occupy`] (used by placement) and
//! [`Board::clear`] (used by line clearing). Both treat out-of-bounds access as a
//! caller bug and panic.

use crate::types::{Cell, Color, Coord, MAX_BOARD_SIZE};

/// The game board - `size` columns x `size` rows using flat storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: u8,
    /// Flat array of cells, row-major order (y * size + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty `size` x `size` board
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero or larger than [`MAX_BOARD_SIZE`].
    pub fn new(size: u8) -> Self {
        assert!(
            (1..=MAX_BOARD_SIZE).contains(&size),
            "board size {} outside 1..={}",
            size,
            MAX_BOARD_SIZE
        );
        let n = size as usize;
        Self {
            size,
            cells: vec![None; n * n],
        }
    }

    /// Build a board from an ASCII picture, one string per row.
    ///
    /// `.` is an empty cell, any other character is an occupied cell
    /// (colored [`Color::Blue`]). The picture must be square.
    pub fn from_rows(rows: &[&str]) -> Self {
        let mut board = Self::new(rows.len() as u8);
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(
                row.chars().count(),
                rows.len(),
                "row {} is not {} cells wide",
                y,
                rows.len()
            );
            for (x, ch) in row.chars().enumerate() {
                if ch != '.' {
                    board.occupy(x as i8, y as i8, Color::Blue);
                }
            }
        }
        board
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if !self.is_in_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.size as usize) + (x as usize))
    }

    /// Edge length of the board
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Check if position lies within `[0, size)` on both axes
    #[inline]
    pub fn is_in_bounds(&self, x: i8, y: i8) -> bool {
        x >= 0 && y >= 0 && (x as u8) < self.size && (y as u8) < self.size
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Check if position is valid (within bounds and empty)
    #[inline]
    pub fn is_valid(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    #[inline]
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Cover an empty cell with `color`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds or already occupied. Placement
    /// validates every target before committing, so hitting this is a bug.
    pub fn occupy(&mut self, x: i8, y: i8, color: Color) {
        let Some(idx) = self.index(x, y) else {
            panic!("occupy({}, {}) out of bounds on {}x{} board", x, y, self.size, self.size);
        };
        assert!(
            self.cells[idx].is_none(),
            "occupy({}, {}) on an occupied cell",
            x,
            y
        );
        self.cells[idx] = Some(color);
    }

    /// Reset a cell to empty. Clearing an empty cell is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds.
    pub fn clear(&mut self, x: i8, y: i8) {
        let Some(idx) = self.index(x, y) else {
            panic!("clear({}, {}) out of bounds on {}x{} board", x, y, self.size, self.size);
        };
        self.cells[idx] = None;
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: u8) -> bool {
        if y >= self.size {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Check if a column is completely filled
    pub fn is_column_full(&self, x: u8) -> bool {
        if x >= self.size {
            return false;
        }
        let width = self.size as usize;
        self.cells
            .iter()
            .skip(x as usize)
            .step_by(width)
            .all(|cell| cell.is_some())
    }

    /// Check if the `edge` x `edge` block with top-left corner (x, y) is completely filled.
    /// Blocks that do not fit on the board are never full.
    pub fn is_square_full(&self, x: u8, y: u8, edge: u8) -> bool {
        if edge == 0 || x as usize + edge as usize > self.size as usize {
            return false;
        }
        if y as usize + edge as usize > self.size as usize {
            return false;
        }
        let width = self.size as usize;
        (y as usize..(y + edge) as usize).all(|row| {
            let start = row * width + x as usize;
            self.cells[start..start + edge as usize]
                .iter()
                .all(|cell| cell.is_some())
        })
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// True when no cell is occupied
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_none())
    }

    /// Iterate over occupied coordinates in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = Coord> + '_ {
        let width = self.size as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some())
            .map(move |(idx, _)| ((idx % width) as u8, (idx / width) as u8))
    }

    /// Get a reference to the internal cells (row-major)
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Borrow one row. Panics if `y` is off the board.
    pub fn row(&self, y: u8) -> &[Cell] {
        let width = self.size as usize;
        let start = y as usize * width;
        &self.cells[start..start + width]
    }

    /// Write the board as palette indices (0 = empty) into `out`, row-major.
    pub fn write_u8_grid(&self, out: &mut Vec<u8>) {
        out.clear();
        out.extend(self.cells.iter().map(|cell| cell.map(|c| c.index()).unwrap_or(0)));
    }

    /// Empty the entire board
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Render as an ASCII picture (`#` occupied, `.` empty), one line per row
    pub fn to_ascii(&self) -> String {
        let width = self.size as usize;
        let mut out = String::with_capacity(self.cells.len() + width);
        for (idx, cell) in self.cells.iter().enumerate() {
            out.push(if cell.is_some() { '#' } else { '.' });
            if idx % width == width - 1 {
                out.push('\n');
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_BOARD_SIZE)
    }
}
