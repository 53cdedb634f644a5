use log::trace;

use super::{heuristic::SCORE_SCALE, puzzle::Puzzle};
use crate::model::{PairConstraint, PairKind, Position, Symbol, TangoBoard};

const CONSTRAINT_TOUCH_BONUS: i64 = 2 * SCORE_SCALE;
const CONSTRAINT_COMPLETE_BONUS: i64 = 3 * SCORE_SCALE;
const CONSTRAINT_FORCED_BONUS: i64 = SCORE_SCALE;

/// A symbol assignment to one empty cell.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TangoMove {
    pub pos: Position,
    pub symbol: Symbol,
}

impl std::fmt::Debug for TangoMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}={}", self.pos, self.symbol)
    }
}

/// Whether assigning `symbol` at `pos` violates no constraint in isolation:
/// the cell is empty, neither line exceeds its half-count cap or gains a run
/// of three, and every pair constraint touching the cell is still
/// satisfiable. A constraint whose far endpoint is unresolved is treated
/// optimistically (not yet known to violate).
pub fn is_legal_assignment(board: &TangoBoard, pos: &Position, symbol: Symbol) -> bool {
    if board.value(pos).is_some() {
        return false;
    }
    let half = board.size() / 2;
    if board.count_in_row(pos.row, symbol) + 1 > half {
        return false;
    }
    if board.count_in_col(pos.col, symbol) + 1 > half {
        return false;
    }
    let next = board.with_symbol(pos, symbol);
    if TangoBoard::line_has_overlong_run(&next.row_values(pos.row)) {
        return false;
    }
    if TangoBoard::line_has_overlong_run(&next.col_values(pos.col)) {
        return false;
    }
    for constraint in board.layout.constraints_touching(pos) {
        if let Some(other) = constraint.other_endpoint(pos) {
            if let Some(other_value) = board.value(&other) {
                if !constraint.holds(symbol, other_value) {
                    return false;
                }
            }
        }
    }
    true
}

fn legal_symbols(board: &TangoBoard, pos: &Position) -> Vec<Symbol> {
    Symbol::BOTH
        .iter()
        .copied()
        .filter(|symbol| is_legal_assignment(board, pos, *symbol))
        .collect()
}

/// Whether an equality constraint sits in line with an adjacent filled cell
/// whose value pins both endpoints through the no-three-run rule.
fn equality_flank_filled(board: &TangoBoard, constraint: &PairConstraint) -> bool {
    let (a, b) = (constraint.a, constraint.b);
    let mut flanks = Vec::with_capacity(2);
    if a.row == b.row {
        let (lo, hi) = (a.col.min(b.col), a.col.max(b.col));
        if lo > 0 {
            flanks.push(Position::new(a.row, lo - 1));
        }
        if hi + 1 < board.size() {
            flanks.push(Position::new(a.row, hi + 1));
        }
    } else {
        let (lo, hi) = (a.row.min(b.row), a.row.max(b.row));
        if lo > 0 {
            flanks.push(Position::new(lo - 1, a.col));
        }
        if hi + 1 < board.size() {
            flanks.push(Position::new(hi + 1, a.col));
        }
    }
    flanks.iter().any(|pos| board.value(pos).is_some())
}

/// Graduated reward for a line the move just touched: fuller lines and lines
/// at or near their half-count target are closer to resolved.
fn line_reward(size: usize, placed_count: usize, opposite_count: usize, filled: usize) -> i64 {
    let half = (size / 2) as i64;
    let mut reward = SCORE_SCALE * filled as i64 / size as i64;
    reward += SCORE_SCALE * placed_count as i64 / (2 * half);
    if opposite_count as i64 == half {
        reward += SCORE_SCALE / 2;
    }
    reward
}

impl Puzzle for TangoBoard {
    type Move = TangoMove;

    fn legal_moves(&self) -> Vec<TangoMove> {
        self.empty_positions()
            .into_iter()
            .flat_map(|pos| {
                legal_symbols(self, &pos)
                    .into_iter()
                    .map(move |symbol| TangoMove { pos, symbol })
            })
            .collect()
    }

    fn apply(&self, mv: &TangoMove) -> Self {
        self.with_symbol(&mv.pos, mv.symbol)
    }

    fn is_terminal(&self) -> bool {
        if !self.is_full() {
            return false;
        }
        let half = self.size() / 2;
        for line in 0..self.size() {
            if self.count_in_row(line, Symbol::A) != half
                || self.count_in_col(line, Symbol::A) != half
            {
                return false;
            }
            if TangoBoard::line_has_overlong_run(&self.row_values(line))
                || TangoBoard::line_has_overlong_run(&self.col_values(line))
            {
                return false;
            }
        }
        self.constraints().iter().all(|constraint| {
            match (self.value(&constraint.a), self.value(&constraint.b)) {
                (Some(value_a), Some(value_b)) => constraint.holds(value_a, value_b),
                _ => false,
            }
        })
    }

    fn propagate(&self) -> Self {
        // Explicit worklist loop: commit every cell whose set of legal values
        // has shrunk to one, rescanning after each commitment. A cell with no
        // legal value is left empty; the contradiction surfaces at the
        // terminal check.
        let mut state = self.clone();
        loop {
            let mut forced = None;
            for pos in state.empty_positions() {
                let symbols = legal_symbols(&state, &pos);
                if symbols.len() == 1 {
                    forced = Some(TangoMove {
                        pos,
                        symbol: symbols[0],
                    });
                    break;
                }
            }
            match forced {
                Some(mv) => {
                    trace!(target: "propagation", "forced {:?}", mv);
                    state = state.with_symbol(&mv.pos, mv.symbol);
                }
                None => return state,
            }
        }
    }

    fn canonical_key(&self) -> String {
        self.positions()
            .map(|pos| match self.value(&pos) {
                Some(symbol) => symbol.to_char(),
                None => '.',
            })
            .collect()
    }

    fn move_bonus(&self, mv: &TangoMove) -> i64 {
        let mut bonus = 0;
        for constraint in self.layout.constraints_touching(&mv.pos) {
            bonus += CONSTRAINT_TOUCH_BONUS;
            if let Some(other) = constraint.other_endpoint(&mv.pos) {
                if self.value(&other).is_some() {
                    bonus += CONSTRAINT_COMPLETE_BONUS;
                }
            }
            if constraint.kind == PairKind::Equal && equality_flank_filled(self, constraint) {
                bonus += CONSTRAINT_FORCED_BONUS;
            }
        }
        let row = mv.pos.row;
        let col = mv.pos.col;
        let row_filled = self.row_values(row).iter().flatten().count();
        let col_filled = self.col_values(col).iter().flatten().count();
        bonus += line_reward(
            self.size(),
            self.count_in_row(row, mv.symbol),
            self.count_in_row(row, mv.symbol.opposite()),
            row_filled,
        );
        bonus += line_reward(
            self.size(),
            self.count_in_col(col, mv.symbol),
            self.count_in_col(col, mv.symbol.opposite()),
            col_filled,
        );
        bonus
    }
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use super::*;
    use crate::tests::UsingLogger;

    #[test]
    fn test_run_rule_blocks_third_symbol() {
        let board = TangoBoard::parse(
            "\
0|A|A|.|.|
1|.|.|.|.|
2|.|.|.|.|
3|.|.|.|.|
",
            vec![],
        );
        assert!(!is_legal_assignment(&board, &Position::new(0, 2), Symbol::A));
        assert!(is_legal_assignment(&board, &Position::new(0, 2), Symbol::B));
        // placing between two symbols counts too
        let gap = TangoBoard::parse(
            "\
0|A|.|A|.|
1|.|.|.|.|
2|.|.|.|.|
3|.|.|.|.|
",
            vec![],
        );
        assert!(!is_legal_assignment(&gap, &Position::new(0, 1), Symbol::A));
    }

    #[test]
    fn test_half_count_cap_blocks_overfull_line() {
        let board = TangoBoard::parse(
            "\
0|A|.|A|.|
1|.|.|.|.|
2|.|.|.|.|
3|.|.|.|.|
",
            vec![],
        );
        // two A's in a 4-wide row is the cap
        assert!(!is_legal_assignment(&board, &Position::new(0, 3), Symbol::A));
        assert!(is_legal_assignment(&board, &Position::new(0, 3), Symbol::B));
    }

    #[test]
    fn test_constraint_with_filled_endpoint_restricts_other() {
        let constraint = PairConstraint::opposite(Position::new(0, 0), Position::new(0, 1));
        let board = TangoBoard::parse(
            "\
0|a|.|.|.|
1|.|.|.|.|
2|.|.|.|.|
3|.|.|.|.|
",
            vec![constraint],
        );
        assert!(!is_legal_assignment(&board, &Position::new(0, 1), Symbol::A));
        assert!(is_legal_assignment(&board, &Position::new(0, 1), Symbol::B));
    }

    #[test]
    fn test_constraint_with_unresolved_endpoint_is_optimistic() {
        // both symbols stay legal while neither endpoint is known
        let board = TangoBoard::parse(
            "\
0|.|.|.|.|
1|.|.|.|.|
2|.|.|.|.|
3|.|.|.|.|
",
            vec![PairConstraint::equal(
                Position::new(1, 0),
                Position::new(1, 1),
            )],
        );
        assert!(is_legal_assignment(&board, &Position::new(1, 0), Symbol::A));
        assert!(is_legal_assignment(&board, &Position::new(1, 0), Symbol::B));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_propagate_fills_line_at_cap(_: &mut UsingLogger) {
        // Symbol A is at the half-count cap for row 0, so every empty cell of
        // that row collapses to B without any search branching.
        let board = TangoBoard::parse(
            "\
0|A|A|B|A|.|.|
1|.|.|.|.|.|.|
2|.|.|.|.|.|.|
3|.|.|.|.|.|.|
4|.|.|.|.|.|.|
5|.|.|.|.|.|.|
",
            vec![],
        );
        let collapsed = board.propagate();
        assert_eq!(collapsed.value(&Position::new(0, 4)), Some(Symbol::B));
        assert_eq!(collapsed.value(&Position::new(0, 5)), Some(Symbol::B));
        // nothing else was decidable
        assert_eq!(collapsed.empty_positions().len(), 30);
    }

    #[test]
    fn test_propagate_is_idempotent() {
        let board = TangoBoard::parse(
            "\
0|A|A|B|A|.|.|
1|.|B|.|.|.|.|
2|.|.|.|.|.|.|
3|.|A|.|.|.|.|
4|.|.|.|.|.|.|
5|.|.|.|.|.|.|
",
            vec![],
        );
        let once = board.propagate();
        let twice = once.propagate();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_propagate_passes_contradiction_through() {
        // (0,2) has no legal value: A is capped in the row, B would close a
        // B-run. The cell is left empty and caught by the terminal check.
        let board = TangoBoard::parse(
            "\
0|A|A|.|B|B|A|
1|.|.|.|.|.|.|
2|.|.|.|.|.|.|
3|.|.|.|.|.|.|
4|.|.|.|.|.|.|
5|.|.|.|.|.|.|
",
            vec![],
        );
        assert!(legal_symbols(&board, &Position::new(0, 2)).is_empty());
        let collapsed = board.propagate();
        assert_eq!(collapsed.value(&Position::new(0, 2)), None);
        assert!(!collapsed.is_terminal());
    }

    #[test]
    fn test_is_terminal_on_valid_completion() {
        let board = TangoBoard::parse(
            "\
0|A|B|A|B|
1|B|A|B|A|
2|A|B|A|B|
3|B|A|B|A|
",
            vec![],
        );
        assert!(board.is_terminal());
    }

    #[test]
    fn test_violated_equal_constraint_is_never_terminal() {
        let constraint = PairConstraint::equal(Position::new(0, 0), Position::new(0, 1));
        let board = TangoBoard::parse(
            "\
0|A|B|A|B|
1|B|A|B|A|
2|A|B|A|B|
3|B|A|B|A|
",
            vec![constraint],
        );
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_move_bonus_prefers_constraint_completion() {
        let constraint = PairConstraint::opposite(Position::new(0, 0), Position::new(0, 1));
        let board = TangoBoard::parse(
            "\
0|a|.|.|.|
1|.|.|.|.|
2|.|.|.|.|
3|.|.|.|.|
",
            vec![constraint],
        );
        let completing = TangoMove {
            pos: Position::new(0, 1),
            symbol: Symbol::B,
        };
        let plain = TangoMove {
            pos: Position::new(3, 3),
            symbol: Symbol::B,
        };
        let after_completing = board.apply(&completing);
        let after_plain = board.apply(&plain);
        assert!(after_completing.move_bonus(&completing) > after_plain.move_bonus(&plain));
    }
}
