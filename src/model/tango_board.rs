use std::rc::Rc;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{PairConstraint, Position, Symbol, TangoLayout};

/// An immutable snapshot of a balance-family board: one optional symbol per
/// cell over a shared fixed layout (givens + constraint list). Every edit
/// returns a new snapshot.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TangoBoard {
    cells: Vec<Option<Symbol>>,
    pub layout: Rc<TangoLayout>,
}

impl TangoBoard {
    /// A fresh board holding only the layout's given cells.
    pub fn new(layout: Rc<TangoLayout>) -> Self {
        let mut cells = vec![None; layout.size * layout.size];
        for (pos, symbol) in &layout.givens {
            cells[pos.index(layout.size)] = Some(*symbol);
        }
        Self { cells, layout }
    }

    pub fn size(&self) -> usize {
        self.layout.size
    }

    pub fn value(&self, pos: &Position) -> Option<Symbol> {
        self.cells[pos.index(self.layout.size)]
    }

    /// Assign a symbol, returning the resulting board.
    pub fn with_symbol(&self, pos: &Position, symbol: Symbol) -> Self {
        let mut next = self.clone();
        next.cells[pos.index(self.layout.size)] = Some(symbol);
        next
    }

    /// Clear a cell, returning the resulting board. Given cells are immutable
    /// during play; clearing one is a no-op.
    pub fn cleared(&self, pos: &Position) -> Self {
        if self.layout.is_given(pos) {
            return self.clone();
        }
        let mut next = self.clone();
        next.cells[pos.index(self.layout.size)] = None;
        next
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.layout.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    pub fn empty_positions(&self) -> Vec<Position> {
        self.positions()
            .filter(|pos| self.value(pos).is_none())
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    pub fn row_values(&self, row: usize) -> Vec<Option<Symbol>> {
        (0..self.layout.size)
            .map(|col| self.value(&Position::new(row, col)))
            .collect()
    }

    pub fn col_values(&self, col: usize) -> Vec<Option<Symbol>> {
        (0..self.layout.size)
            .map(|row| self.value(&Position::new(row, col)))
            .collect()
    }

    pub fn count_in_row(&self, row: usize, symbol: Symbol) -> usize {
        self.row_values(row)
            .iter()
            .filter(|v| **v == Some(symbol))
            .count()
    }

    pub fn count_in_col(&self, col: usize, symbol: Symbol) -> usize {
        self.col_values(col)
            .iter()
            .filter(|v| **v == Some(symbol))
            .count()
    }

    pub fn constraints(&self) -> &[PairConstraint] {
        &self.layout.constraints
    }

    /// Whether a line (row or column extraction) contains a run of three or
    /// more identical symbols.
    pub fn line_has_overlong_run(values: &[Option<Symbol>]) -> bool {
        values
            .iter()
            .dedup_with_count()
            .any(|(count, value)| value.is_some() && count >= 3)
    }

    /// Parse a board from the `Debug` rendering. Each line is `<row>|<cells>|`
    /// with one char per cell: '.' empty, 'A'/'B' filled, lowercase for given
    /// cells. Dashed separator lines are skipped. Intended for test fixtures.
    pub fn parse(input: &str, constraints: Vec<PairConstraint>) -> Self {
        let mut values: Vec<Option<Symbol>> = Vec::new();
        let mut givens = Vec::new();
        let mut size = 0;
        let mut row = 0;

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('-') {
                continue;
            }
            let cells: Vec<&str> = line
                .split('|')
                .skip(1) // row header
                .filter(|token| !token.is_empty())
                .collect();
            size = cells.len();
            for (col, cell) in cells.iter().enumerate() {
                let c = cell.chars().next().expect("empty cell token");
                let symbol = Symbol::from_char(c);
                if c.is_ascii_lowercase() {
                    givens.push((
                        Position::new(row, col),
                        symbol.expect("given cell must be a/b"),
                    ));
                }
                values.push(symbol);
            }
            row += 1;
        }
        assert_eq!(row, size, "parse fixture must be square");

        let layout = TangoLayout::new(size, givens, constraints).expect("invalid parse fixture");
        Self {
            cells: values,
            layout: Rc::new(layout),
        }
    }
}

impl std::fmt::Debug for TangoBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = String::new();
        output.push('\n');
        for row in 0..self.size() {
            output.push_str(&format!("{}|", row));
            for col in 0..self.size() {
                let pos = Position::new(row, col);
                let c = match self.value(&pos) {
                    None => '.',
                    Some(symbol) => {
                        if self.layout.is_given(&pos) {
                            symbol.to_char().to_ascii_lowercase()
                        } else {
                            symbol.to_char()
                        }
                    }
                };
                output.push(c);
                output.push('|');
            }
            output.push('\n');
        }
        if !self.layout.constraints.is_empty() {
            output.push_str(&format!("constraints: {:?}\n", self.layout.constraints));
        }
        write!(f, "{}", output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_givens_and_values() {
        let input = "\
0|a|.|B|.|
1|.|.|.|.|
2|.|b|.|.|
3|.|.|.|.|
";
        let board = TangoBoard::parse(input, vec![]);
        assert_eq!(board.size(), 4);
        assert_eq!(board.value(&Position::new(0, 0)), Some(Symbol::A));
        assert!(board.layout.is_given(&Position::new(0, 0)));
        assert_eq!(board.value(&Position::new(0, 2)), Some(Symbol::B));
        assert!(!board.layout.is_given(&Position::new(0, 2)));
        assert_eq!(board.value(&Position::new(1, 0)), None);
    }

    #[test]
    fn test_cleared_is_a_noop_on_givens() {
        let input = "\
0|a|.|B|.|
1|.|.|.|.|
2|.|.|.|.|
3|.|.|.|.|
";
        let board = TangoBoard::parse(input, vec![]);
        let cleared_given = board.cleared(&Position::new(0, 0));
        assert_eq!(cleared_given.value(&Position::new(0, 0)), Some(Symbol::A));

        let cleared_play = board.cleared(&Position::new(0, 2));
        assert_eq!(cleared_play.value(&Position::new(0, 2)), None);
        // original untouched
        assert_eq!(board.value(&Position::new(0, 2)), Some(Symbol::B));
    }

    #[test]
    fn test_counts_and_lines() {
        let input = "\
0|A|A|B|.|
1|.|B|.|.|
2|.|.|.|.|
3|.|A|.|.|
";
        let board = TangoBoard::parse(input, vec![]);
        assert_eq!(board.count_in_row(0, Symbol::A), 2);
        assert_eq!(board.count_in_row(0, Symbol::B), 1);
        assert_eq!(board.count_in_col(1, Symbol::A), 2);
        assert_eq!(board.count_in_col(1, Symbol::B), 1);
        assert_eq!(board.col_values(1)[1], Some(Symbol::B));
    }

    #[test]
    fn test_overlong_run_detection() {
        let a = Some(Symbol::A);
        let b = Some(Symbol::B);
        assert!(TangoBoard::line_has_overlong_run(&[a, a, a, b]));
        assert!(!TangoBoard::line_has_overlong_run(&[a, a, b, a]));
        // a gap breaks the run
        assert!(!TangoBoard::line_has_overlong_run(&[a, a, None, a]));
        // empty runs never count, however long
        assert!(!TangoBoard::line_has_overlong_run(&[None, None, None, None]));
    }
}
