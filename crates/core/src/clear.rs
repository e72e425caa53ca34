//! Clear module - detecting and removing completed structures
//!
//! A scan looks at every row, every column and, when the ruleset clears
//! squares, every `edge` x `edge` window that fits on the board (windows may
//! overlap). The cells of all completed structures are merged into one
//! deduplicated, row-major set, so a cell shared by a row and a column is
//! cleared once.

use crate::board::Board;
use crate::types::{ClearCounts, Coord, RuleSet};

/// Result of a clear scan
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ClearOutcome {
    pub counts: ClearCounts,
    /// Union of all cells in completed structures, row-major, no duplicates
    pub cells: Vec<Coord>,
}

impl ClearOutcome {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Scan `board` for completed rows, columns and (per `rules`) squares
pub fn find_clears(board: &Board, rules: RuleSet) -> ClearOutcome {
    let n = board.size();
    let width = n as usize;
    let mut marked = vec![false; width * width];
    let mut counts = ClearCounts::default();

    for y in 0..n {
        if board.is_row_full(y) {
            counts.rows += 1;
            for x in 0..width {
                marked[y as usize * width + x] = true;
            }
        }
    }

    for x in 0..n {
        if board.is_column_full(x) {
            counts.cols += 1;
            for y in 0..width {
                marked[y * width + x as usize] = true;
            }
        }
    }

    if let Some(edge) = rules.square_size() {
        if edge <= n {
            for y in 0..=(n - edge) {
                for x in 0..=(n - edge) {
                    if !board.is_square_full(x, y, edge) {
                        continue;
                    }
                    counts.squares += 1;
                    for row in y..y + edge {
                        let start = row as usize * width + x as usize;
                        for flag in &mut marked[start..start + edge as usize] {
                            *flag = true;
                        }
                    }
                }
            }
        }
    }

    let cells = marked
        .iter()
        .enumerate()
        .filter(|(_, m)| **m)
        .map(|(idx, _)| ((idx % width) as u8, (idx / width) as u8))
        .collect();

    ClearOutcome { counts, cells }
}

/// Empty every cell in `cells`. Idempotent and order-independent.
pub fn apply_clear(board: &mut Board, cells: &[Coord]) {
    for &(x, y) in cells {
        board.clear(x as i8, y as i8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn empty_board_has_nothing_to_clear() {
        let outcome = find_clears(&Board::new(9), RuleSet::Blast);
        assert!(outcome.is_empty());
        assert!(outcome.counts.is_empty());
    }

    #[test]
    fn row_and_column_share_one_cell() {
        let mut board = Board::new(5);
        for i in 0..5 {
            board.occupy(i, 2, Color::Blue);
            if i != 2 {
                board.occupy(1, i, Color::Blue);
            }
        }
        let outcome = find_clears(&board, RuleSet::Classic);
        assert_eq!(outcome.counts, ClearCounts { rows: 1, cols: 1, squares: 0 });
        assert_eq!(outcome.cells.len(), 9);
        assert!(outcome.cells.contains(&(1, 2)));
    }

    #[test]
    fn squares_only_under_blast_rules() {
        let board = Board::from_rows(&[
            "###......",
            "###......",
            "###......",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        let blast = find_clears(&board, RuleSet::Blast);
        assert_eq!(blast.counts, ClearCounts { rows: 0, cols: 0, squares: 1 });
        assert_eq!(blast.cells.len(), 9);

        let classic = find_clears(&board, RuleSet::Classic);
        assert!(classic.is_empty());
    }

    #[test]
    fn overlapping_square_windows_each_count() {
        let board = Board::from_rows(&[
            "####.....",
            "####.....",
            "####.....",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
            ".........",
        ]);
        let outcome = find_clears(&board, RuleSet::Blast);
        assert_eq!(outcome.counts.squares, 2);
        assert_eq!(outcome.cells.len(), 12);
    }

    #[test]
    fn cells_are_row_major() {
        let mut board = Board::new(3);
        for x in 0..3 {
            board.occupy(x, 1, Color::Blue);
        }
        let outcome = find_clears(&board, RuleSet::Classic);
        assert_eq!(outcome.cells, vec![(0, 1), (1, 1), (2, 1)]);
    }

    #[test]
    fn apply_clear_twice_is_noop() {
        let mut board = Board::from_rows(&["###", "#..", "..."]);
        let outcome = find_clears(&board, RuleSet::Classic);
        apply_clear(&mut board, &outcome.cells);
        let once = board.clone();
        apply_clear(&mut board, &outcome.cells);
        assert_eq!(board, once);
        assert_eq!(board.occupied_count(), 1);
    }
}
