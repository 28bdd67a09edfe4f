//! Board tiles and the derived character grid.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::game::PlayerMove;

/// Character stored in an empty cell.
pub const EMPTY_CELL: char = '.';

/// A single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub value: char,
    /// Word multiplier, carried but not scored
    pub boost: u32,
    /// Letter multiplier, carried but not scored
    pub char_boost: u32,
}

impl Tile {
    /// An empty tile with neutral boosts.
    pub fn empty(row: usize, col: usize) -> Self {
        Self::with_value(row, col, EMPTY_CELL)
    }

    pub fn with_value(row: usize, col: usize, value: char) -> Self {
        Self {
            row,
            col,
            value,
            boost: 1,
            char_boost: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value == EMPTY_CELL
    }
}

/// One tile per cell, size x size, row-major.
pub fn initialize_tiles(size: usize) -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(size * size);
    for row in 0..size {
        for col in 0..size {
            tiles.push(Tile::empty(row, col));
        }
    }
    tiles
}

/// Tiles written by a word placement, one per letter.
pub fn tiles_for_move(mv: &PlayerMove) -> Vec<Tile> {
    mv.cells()
        .map(|(row, col, letter)| Tile::with_value(row, col, letter))
        .collect()
}

/// The tiles of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub tiles: Vec<Tile>,
}

impl Board {
    pub fn new(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    /// An all-empty board.
    pub fn empty(size: usize) -> Self {
        Self::new(initialize_tiles(size))
    }

    /// Build a board from text rows, `.` for empty cells.
    ///
    /// Rows shorter than the row count are padded with empty cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let size = rows.len();
        let mut tiles = initialize_tiles(size);
        for (row, text) in rows.iter().enumerate() {
            for (col, value) in text.chars().take(size).enumerate() {
                tiles[row * size + col].value = value;
            }
        }
        Self::new(tiles)
    }

    /// Edge length, derived from the tile count.
    pub fn size(&self) -> usize {
        let n = self.tiles.len();
        let mut size = (n as f64).sqrt() as usize;
        while size * size > n {
            size -= 1;
        }
        while (size + 1) * (size + 1) <= n {
            size += 1;
        }
        size
    }

    /// Write the letters of a placement onto existing tiles.
    ///
    /// Returns how many cells changed value. Boosts are kept.
    pub fn place(&mut self, mv: &PlayerMove) -> usize {
        let size = self.size();
        let mut changed = 0;
        for placed in tiles_for_move(mv) {
            if placed.row >= size || placed.col >= size {
                warn!(row = placed.row, col = placed.col, size, "placement outside board skipped");
                continue;
            }
            let Some(tile) = self
                .tiles
                .iter_mut()
                .find(|t| t.row == placed.row && t.col == placed.col)
            else {
                continue;
            };
            if tile.value != placed.value {
                tile.value = placed.value;
                changed += 1;
            }
        }
        changed
    }

    pub fn to_matrix(&self) -> BoardMatrix {
        to_matrix(self)
    }

    /// Rows as strings.
    pub fn to_json(&self) -> serde_json::Value {
        let matrix = self.to_matrix();
        let rows: Vec<serde_json::Value> = (0..matrix.size())
            .map(|row| serde_json::Value::String(matrix.row_string(row)))
            .collect();
        serde_json::Value::Array(rows)
    }
}

/// Project tiles into a size x size grid.
///
/// Cells without a tile stay empty. Tiles outside the grid are skipped.
pub fn to_matrix(board: &Board) -> BoardMatrix {
    let size = board.size();
    let mut matrix = BoardMatrix::empty(size);
    for tile in &board.tiles {
        if tile.row >= size || tile.col >= size {
            warn!(row = tile.row, col = tile.col, size, "malformed tile skipped");
            continue;
        }
        matrix.cells[tile.row * size + tile.col] = tile.value;
    }
    matrix
}

/// Read-only character grid used by validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardMatrix {
    size: usize,
    cells: Vec<char>,
}

impl BoardMatrix {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![EMPTY_CELL; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Character at a cell, `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col])
        } else {
            None
        }
    }

    /// Whether a cell holds a letter. Off-grid cells count as empty.
    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(c) if c != EMPTY_CELL)
    }

    pub fn row_string(&self, row: usize) -> String {
        (0..self.size)
            .filter_map(|col| self.get(row, col))
            .collect()
    }
}

impl fmt::Display for BoardMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let line: Vec<String> = (0..self.size)
                .filter_map(|col| self.get(row, col))
                .map(String::from)
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::{MoveDirection, Person, Player};
    use pretty_assertions::assert_eq;

    fn player() -> Player {
        Player::new(Person::new(1, "ann", "Ann", "Smith"), 1)
    }

    #[test]
    fn test_initialize_tiles() {
        let tiles = initialize_tiles(3);
        assert_eq!(tiles.len(), 9);
        assert!(tiles.iter().all(|t| t.is_empty() && t.boost == 1 && t.char_boost == 1));
        assert_eq!((tiles[5].row, tiles[5].col), (1, 2));
    }

    #[test]
    fn test_size_from_tile_count() {
        assert_eq!(Board::empty(15).size(), 15);
        assert_eq!(Board::empty(0).size(), 0);
        assert_eq!(Board::new(vec![Tile::empty(0, 0); 10]).size(), 3);
    }

    #[test]
    fn test_to_matrix_projects_tiles() {
        let board = Board::from_rows(&["cat", "...", "..x"]);
        let matrix = to_matrix(&board);
        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.get(0, 1), Some('a'));
        assert_eq!(matrix.get(2, 2), Some('x'));
        assert_eq!(matrix.get(1, 1), Some(EMPTY_CELL));
        assert_eq!(matrix.get(3, 0), None);
        assert!(matrix.is_occupied(0, 0));
        assert!(!matrix.is_occupied(1, 0));
        assert!(!matrix.is_occupied(9, 9));
    }

    #[test]
    fn test_to_matrix_skips_malformed_tiles() {
        let mut tiles = initialize_tiles(2);
        tiles[0] = Tile::with_value(0, 0, 'q');
        tiles[3] = Tile::with_value(5, 5, 'z');
        let matrix = to_matrix(&Board::new(tiles));
        assert_eq!(matrix.row_string(0), "q.");
        assert_eq!(matrix.row_string(1), "..");
    }

    #[test]
    fn test_to_matrix_is_pure() {
        let board = Board::from_rows(&["ab", "cd"]);
        assert_eq!(to_matrix(&board), to_matrix(&board));
    }

    #[test]
    fn test_place_move() {
        let mut board = Board::from_rows(&["c....", ".....", ".....", ".....", "....."]);
        let mv = PlayerMove::new("cat", 0, 0, MoveDirection::TopBottom, player());
        assert_eq!(board.place(&mv), 2);

        let matrix = board.to_matrix();
        assert_eq!(matrix.get(1, 0), Some('a'));
        assert_eq!(matrix.get(2, 0), Some('t'));
        assert_eq!(tiles_for_move(&mv).len(), 3);
    }

    #[test]
    fn test_display_renders_rows() {
        let matrix = Board::from_rows(&["ab", ".c"]).to_matrix();
        assert_eq!(matrix.to_string(), "a b\n. c\n");
    }
}
