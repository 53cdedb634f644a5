use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major index into a board of the given width.
    pub fn index(&self, width: usize) -> usize {
        self.row * width + self.col
    }

    pub fn is_orthogonal_to(&self, other: &Position) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr + dc == 1
    }

    #[cfg(test)]
    /// Parse a position from a string of the form "r2c5".
    pub fn parse(s: &str) -> Self {
        let rest = s.strip_prefix('r').unwrap();
        let (row, col) = rest.split_once('c').unwrap();
        Self {
            row: row.parse().unwrap(),
            col: col.parse().unwrap(),
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "r{}c{}", self.row, self.col)
    }
}
