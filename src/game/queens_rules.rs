use itertools::Itertools;
use log::trace;

use super::{heuristic::SCORE_SCALE, puzzle::Puzzle};
use crate::model::{Position, QueensBoard, RegionId};

/// Whether placing a mark at `pos` violates no constraint in isolation: the
/// cell is open, its row, column and region are unoccupied, and no marked
/// cell sits in its 8-neighborhood. Pruned cells are excluded outright; the
/// elimination rules that set `pruned` are proof-backed (see DESIGN.md).
pub fn is_legal_mark(board: &QueensBoard, pos: &Position) -> bool {
    !board.is_marked(pos)
        && !board.is_pruned(pos)
        && board.row_mark_count(pos.row) == 0
        && board.col_mark_count(pos.col) == 0
        && board.region_mark_count(board.layout.region_at(pos)) == 0
        && !board.has_marked_moore_neighbor(pos)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Deduction {
    Mark(Position),
    Prune(Position),
}

/// The first deduction the three collapse rules can make on this state, if
/// any. Propagation applies deductions one at a time and rescans, so the
/// rules always see each other's results; the outcome is order-independent
/// because every rule only ever adds information.
fn next_deduction(board: &QueensBoard) -> Option<Deduction> {
    let legal: Vec<Position> = board
        .layout
        .positions()
        .filter(|pos| is_legal_mark(board, pos))
        .collect();

    // A row, column or region with exactly one legal placement left commits it.
    for row in 0..board.height() {
        if board.row_mark_count(row) == 0 {
            if let Ok(only) = legal.iter().filter(|p| p.row == row).exactly_one() {
                return Some(Deduction::Mark(*only));
            }
        }
    }
    for col in 0..board.width() {
        if board.col_mark_count(col) == 0 {
            if let Ok(only) = legal.iter().filter(|p| p.col == col).exactly_one() {
                return Some(Deduction::Mark(*only));
            }
        }
    }
    for region in 0..board.layout.n_regions {
        if board.region_mark_count(region) == 0 {
            if let Ok(only) = legal
                .iter()
                .filter(|p| board.layout.region_at(p) == region)
                .exactly_one()
            {
                return Some(Deduction::Mark(*only));
            }
        }
    }

    // Elimination: an unoccupied region whose remaining cells all lie on one
    // line must consume that line, so the rest of the line can be pruned.
    for region in 0..board.layout.n_regions {
        if board.region_mark_count(region) > 0 {
            continue;
        }
        let cells: Vec<&Position> = legal
            .iter()
            .filter(|p| board.layout.region_at(p) == region)
            .collect();
        if cells.is_empty() {
            continue;
        }
        if let Ok(row) = cells.iter().map(|p| p.row).all_equal_value() {
            for pos in board.layout.row_positions(row) {
                if board.layout.region_at(&pos) != region
                    && !board.is_pruned(&pos)
                    && !board.is_marked(&pos)
                {
                    return Some(Deduction::Prune(pos));
                }
            }
        }
        if let Ok(col) = cells.iter().map(|p| p.col).all_equal_value() {
            for pos in board.layout.col_positions(col) {
                if board.layout.region_at(&pos) != region
                    && !board.is_pruned(&pos)
                    && !board.is_marked(&pos)
                {
                    return Some(Deduction::Prune(pos));
                }
            }
        }
    }

    // Symmetrically: an unoccupied line confined to a single region pins that
    // region to the line, pruning the region's cells elsewhere.
    for row in 0..board.height() {
        if board.row_mark_count(row) > 0 {
            continue;
        }
        let cells: Vec<&Position> = legal.iter().filter(|p| p.row == row).collect();
        if cells.is_empty() {
            continue;
        }
        if let Ok(region) = cells
            .iter()
            .map(|p| board.layout.region_at(p))
            .all_equal_value()
        {
            if let Some(pos) = prunable_region_cell(board, region, |p| p.row != row) {
                return Some(Deduction::Prune(pos));
            }
        }
    }
    for col in 0..board.width() {
        if board.col_mark_count(col) > 0 {
            continue;
        }
        let cells: Vec<&Position> = legal.iter().filter(|p| p.col == col).collect();
        if cells.is_empty() {
            continue;
        }
        if let Ok(region) = cells
            .iter()
            .map(|p| board.layout.region_at(p))
            .all_equal_value()
        {
            if let Some(pos) = prunable_region_cell(board, region, |p| p.col != col) {
                return Some(Deduction::Prune(pos));
            }
        }
    }

    None
}

fn prunable_region_cell(
    board: &QueensBoard,
    region: RegionId,
    off_line: impl Fn(&Position) -> bool,
) -> Option<Position> {
    board
        .layout
        .region_positions(region)
        .into_iter()
        .find(|pos| off_line(pos) && !board.is_pruned(pos) && !board.is_marked(pos))
}

impl Puzzle for QueensBoard {
    type Move = Position;

    fn legal_moves(&self) -> Vec<Position> {
        self.layout
            .positions()
            .filter(|pos| is_legal_mark(self, pos))
            .collect()
    }

    fn apply(&self, mv: &Position) -> Self {
        self.with_mark(mv)
    }

    fn is_terminal(&self) -> bool {
        (0..self.height()).all(|row| self.row_mark_count(row) == 1)
            && (0..self.width()).all(|col| self.col_mark_count(col) == 1)
            && (0..self.layout.n_regions).all(|region| self.region_mark_count(region) == 1)
            && self
                .marks()
                .iter()
                .all(|pos| !self.has_marked_moore_neighbor(pos))
    }

    fn propagate(&self) -> Self {
        // Explicit worklist loop; commitments and pruning marks are only ever
        // added, so this terminates within one pass per cell.
        let mut state = self.clone();
        loop {
            match next_deduction(&state) {
                Some(Deduction::Mark(pos)) => {
                    trace!(target: "propagation", "forced mark at {:?}", pos);
                    state = state.with_mark(&pos);
                }
                Some(Deduction::Prune(pos)) => {
                    trace!(target: "propagation", "pruning {:?}", pos);
                    state = state.with_pruned(&pos);
                }
                None => return state,
            }
        }
    }

    fn canonical_key(&self) -> String {
        self.layout
            .positions()
            .map(|pos| {
                if self.is_marked(&pos) {
                    'Q'
                } else if self.is_pruned(&pos) {
                    'x'
                } else {
                    '.'
                }
            })
            .collect()
    }

    fn move_bonus(&self, mv: &Position) -> i64 {
        // Resolving a small region constrains the board more than a large one.
        let region_size = self.layout.region_size(self.layout.region_at(mv)) as i64;
        SCORE_SCALE / region_size.max(1)
    }
}

#[cfg(test)]
pub mod tests_support {
    use crate::model::QueensBoard;

    /// A 3x3 row-region board with all but `n` cells pruned; no marks, so the
    /// remaining open cells are exactly the legal moves.
    pub fn board_with_open_cells(n: usize) -> QueensBoard {
        let mut board = QueensBoard::parse(
            "\
0|a |a |a |
1|b |b |b |
2|c |c |c |
",
        );
        let positions: Vec<_> = board.layout.positions().collect();
        for pos in positions.iter().take(9 - n) {
            board = board.with_pruned(pos);
        }
        board
    }
}
