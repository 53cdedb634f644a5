use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{Position, RegionId, RegionLayout};

/// A single cell of an exclusivity-family board. `pruned` is an elimination
/// mark derived during propagation: the cell can never hold the puzzle's mark
/// in any completion of the current state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct QueensCell {
    pub region: RegionId,
    pub marked: bool,
    pub pruned: bool,
}

/// An immutable snapshot of an exclusivity-family board: mark/prune overlays
/// on top of a shared, fixed region layout. Every edit returns a new snapshot;
/// a board pushed onto a search frontier never changes underneath the search.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct QueensBoard {
    marked: Vec<bool>,
    pruned: Vec<bool>,
    pub layout: Rc<RegionLayout>,
}

impl QueensBoard {
    pub fn new(layout: Rc<RegionLayout>) -> Self {
        let n_cells = layout.width * layout.height;
        Self {
            marked: vec![false; n_cells],
            pruned: vec![false; n_cells],
            layout,
        }
    }

    pub fn width(&self) -> usize {
        self.layout.width
    }

    pub fn height(&self) -> usize {
        self.layout.height
    }

    pub fn is_marked(&self, pos: &Position) -> bool {
        self.marked[pos.index(self.layout.width)]
    }

    pub fn is_pruned(&self, pos: &Position) -> bool {
        self.pruned[pos.index(self.layout.width)]
    }

    pub fn cell(&self, pos: &Position) -> QueensCell {
        QueensCell {
            region: self.layout.region_at(pos),
            marked: self.is_marked(pos),
            pruned: self.is_pruned(pos),
        }
    }

    /// Place a mark, returning the resulting board.
    pub fn with_mark(&self, pos: &Position) -> Self {
        let mut next = self.clone();
        next.marked[pos.index(self.layout.width)] = true;
        next
    }

    /// Clear a mark, returning the resulting board.
    pub fn without_mark(&self, pos: &Position) -> Self {
        let mut next = self.clone();
        next.marked[pos.index(self.layout.width)] = false;
        next
    }

    /// Record an elimination mark, returning the resulting board.
    pub fn with_pruned(&self, pos: &Position) -> Self {
        let mut next = self.clone();
        next.pruned[pos.index(self.layout.width)] = true;
        next
    }

    pub fn marks(&self) -> Vec<Position> {
        self.layout
            .positions()
            .filter(|pos| self.is_marked(pos))
            .collect()
    }

    pub fn mark_count(&self) -> usize {
        self.marked.iter().filter(|&&m| m).count()
    }

    pub fn row_mark_count(&self, row: usize) -> usize {
        self.layout
            .row_positions(row)
            .filter(|pos| self.is_marked(pos))
            .count()
    }

    pub fn col_mark_count(&self, col: usize) -> usize {
        self.layout
            .col_positions(col)
            .filter(|pos| self.is_marked(pos))
            .count()
    }

    pub fn region_mark_count(&self, region: RegionId) -> usize {
        self.layout
            .region_positions(region)
            .iter()
            .filter(|pos| self.is_marked(pos))
            .count()
    }

    pub fn has_marked_moore_neighbor(&self, pos: &Position) -> bool {
        self.layout
            .moore_neighbors(pos)
            .iter()
            .any(|n| self.is_marked(n))
    }

    /// Parse a board from the `Debug` rendering. Each line is
    /// `<row>|<cells>|` where a cell is a region letter followed by a state
    /// char: ' ' open, '*' marked, '.' pruned. Dashed separator lines are
    /// skipped. Intended for test fixtures.
    pub fn parse(input: &str) -> Self {
        let mut regions = Vec::new();
        let mut marked = Vec::new();
        let mut pruned = Vec::new();
        let mut height = 0;
        let mut width = 0;

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
            width = cells.len();
            height += 1;
            for cell in cells {
                let mut chars = cell.chars();
                let region_char = chars.next().expect("empty cell token");
                let state = chars.next().unwrap_or(' ');
                regions.push((region_char as u8 - b'a') as RegionId);
                marked.push(state == '*');
                pruned.push(state == '.');
            }
        }

        let layout = RegionLayout::new(width, height, regions).expect("invalid parse fixture");
        Self {
            marked,
            pruned,
            layout: Rc::new(layout),
        }
    }
}

impl std::fmt::Debug for QueensBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut output = String::new();
        output.push('\n');
        for row in 0..self.height() {
            output.push_str(&format!("{}|", row));
            for pos in self.layout.row_positions(row) {
                let cell = self.cell(&pos);
                let region_char = (b'a' + cell.region as u8) as char;
                let state = if cell.marked {
                    '*'
                } else if cell.pruned {
                    '.'
                } else {
                    ' '
                };
                output.push_str(&format!("{}{}|", region_char, state));
            }
            output.push('\n');
        }
        write!(f, "{}", output)
    }
}
