use std::collections::HashSet;

use log::{debug, trace};
use thiserror::Error;

use super::{heuristic, puzzle::Puzzle};

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Counted iteration budget; one iteration per expanded state. This is
    /// the only cancellation mechanism.
    pub max_iterations: usize,
    /// With the heuristic off every candidate scores the same; only the
    /// exploration order changes, never the result.
    pub use_heuristic: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100_000,
            use_heuristic: true,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// Ambiguous between "genuinely unsolvable" and "cap too low"; the
    /// engine does not distinguish the two.
    #[error("search exhausted after {iterations} iterations ({frontier_size} states left on the frontier)")]
    Exhausted {
        iterations: usize,
        frontier_size: usize,
    },
}

/// Bounded depth-first search over one puzzle state space: LIFO frontier,
/// per-invocation visited set, heuristic-ordered expansion, propagation to
/// fixpoint on every candidate. Satisficing: returns the first terminal
/// state found. Sound (every frontier state is reachable from `start` by a
/// chain of legal moves) and complete up to the iteration cap.
pub fn solve<P: Puzzle>(start: &P, options: &SolveOptions) -> Result<P, SolveError> {
    let mut frontier: Vec<P> = Vec::new();
    let mut visited: HashSet<String> = HashSet::new();

    visited.insert(start.canonical_key());
    frontier.push(start.clone());

    let mut iterations = 0usize;
    loop {
        if iterations >= options.max_iterations {
            debug!(
                target: "search",
                "iteration budget spent ({} states frontiered)",
                frontier.len()
            );
            return Err(SolveError::Exhausted {
                iterations,
                frontier_size: frontier.len(),
            });
        }
        let Some(state) = frontier.pop() else {
            debug!(target: "search", "frontier exhausted after {} iterations", iterations);
            return Err(SolveError::Exhausted {
                iterations,
                frontier_size: 0,
            });
        };
        iterations += 1;

        if state.is_terminal() {
            debug!(target: "search", "solved in {} iterations", iterations);
            return Ok(state);
        }

        let mut candidates: Vec<(i64, P)> = Vec::new();
        for mv in state.legal_moves() {
            let candidate = state.apply(&mv);
            if visited.contains(&candidate.canonical_key()) {
                trace!(target: "search", "already visited, dropping {:?}", mv);
                continue;
            }
            let score = if options.use_heuristic {
                heuristic::score_candidate(&candidate, &mv)
            } else {
                0
            };
            candidates.push((score, candidate));
        }

        // Ascending push order onto the LIFO frontier: the highest-scoring
        // candidate is popped next.
        candidates.sort_by_key(|(score, _)| *score);
        for (score, candidate) in candidates {
            let collapsed = candidate.propagate();
            let key = collapsed.canonical_key();
            if visited.contains(&key) {
                trace!(target: "search", "propagated form already visited");
                continue;
            }
            trace!(target: "search", "pushing candidate with score {}", score);
            visited.insert(key);
            frontier.push(collapsed);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use test_context::test_context;

    use super::*;
    use crate::model::{Position, QueensBoard, TangoBoard};
    use crate::tests::UsingLogger;

    /// 8x8 board carved into eight 2x4 blocks; solvable (e.g. marks at
    /// columns 0,4,2,6,1,5,3,7 for rows 0..8).
    fn eight_by_eight_blocks() -> QueensBoard {
        QueensBoard::parse(
            "\
0|a |a |a |a |b |b |b |b |
1|a |a |a |a |b |b |b |b |
2|c |c |c |c |d |d |d |d |
3|c |c |c |c |d |d |d |d |
4|e |e |e |e |f |f |f |f |
5|e |e |e |e |f |f |f |f |
6|g |g |g |g |h |h |h |h |
7|g |g |g |g |h |h |h |h |
",
        )
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_solve_eight_by_eight_exclusivity(_: &mut UsingLogger) {
        let board = eight_by_eight_blocks();
        let solved = solve(&board, &SolveOptions::default()).expect("known-solvable board");

        assert!(solved.is_terminal());
        assert_eq!(solved.mark_count(), 8);
        for line in 0..8 {
            assert_eq!(solved.row_mark_count(line), 1);
            assert_eq!(solved.col_mark_count(line), 1);
        }
        for region in 0..8 {
            assert_eq!(solved.region_mark_count(region), 1);
        }
        for mark in solved.marks() {
            assert!(!solved.has_marked_moore_neighbor(&mark));
        }
    }

    #[test]
    fn test_solve_without_heuristic_still_succeeds() {
        let board = QueensBoard::parse(
            "\
0|a |a |b |b |b |
1|a |c |c |b |b |
2|a |c |c |c |d |
3|e |e |c |d |d |
4|e |e |e |d |d |
",
        );
        let options = SolveOptions {
            use_heuristic: false,
            ..Default::default()
        };
        let solved = solve(&board, &options).expect("solvable without heuristic");
        assert!(solved.is_terminal());
    }

    #[test]
    fn test_solve_tango_from_empty_board() {
        let board = TangoBoard::parse(
            "\
0|.|.|.|.|
1|.|.|.|.|
2|.|.|.|.|
3|.|.|.|.|
",
            vec![],
        );
        let solved = solve(&board, &SolveOptions::default()).expect("empty 4x4 is solvable");
        assert!(solved.is_terminal());
        assert!(solved.is_full());
    }

    #[test]
    fn test_zero_budget_reports_exhaustion() {
        let board = eight_by_eight_blocks();
        let options = SolveOptions {
            max_iterations: 0,
            ..Default::default()
        };
        let result = solve(&board, &options);
        assert_eq!(
            result,
            Err(SolveError::Exhausted {
                iterations: 0,
                frontier_size: 1
            })
        );
    }

    #[test]
    fn test_unsolvable_board_exhausts_frontier() {
        // 2x2 exclusivity: any two marks are Moore-adjacent, so no terminal
        // state exists and the frontier drains.
        let board = QueensBoard::parse(
            "\
0|a |a |
1|b |b |
",
        );
        let result = solve(&board, &SolveOptions::default());
        assert!(matches!(
            result,
            Err(SolveError::Exhausted {
                frontier_size: 0,
                ..
            })
        ));
    }

    /// Wrapper that records the canonical key of every expanded state.
    #[derive(Clone)]
    struct Recorded {
        inner: QueensBoard,
        expanded: Rc<RefCell<Vec<String>>>,
    }

    impl Puzzle for Recorded {
        type Move = Position;

        fn legal_moves(&self) -> Vec<Position> {
            self.inner.legal_moves()
        }

        fn apply(&self, mv: &Position) -> Self {
            Self {
                inner: self.inner.apply(mv),
                expanded: Rc::clone(&self.expanded),
            }
        }

        fn is_terminal(&self) -> bool {
            // called exactly once per popped state
            self.expanded.borrow_mut().push(self.inner.canonical_key());
            self.inner.is_terminal()
        }

        fn propagate(&self) -> Self {
            Self {
                inner: self.inner.propagate(),
                expanded: Rc::clone(&self.expanded),
            }
        }

        fn canonical_key(&self) -> String {
            self.inner.canonical_key()
        }

        fn move_bonus(&self, mv: &Position) -> i64 {
            self.inner.move_bonus(mv)
        }
    }

    #[test]
    fn test_no_state_is_expanded_twice() {
        let expanded = Rc::new(RefCell::new(Vec::new()));
        let start = Recorded {
            inner: QueensBoard::parse(
                "\
0|a |a |b |b |b |
1|a |c |c |b |b |
2|a |c |c |c |d |
3|e |e |c |d |d |
4|e |e |e |d |d |
",
            ),
            expanded: Rc::clone(&expanded),
        };
        let _ = solve(&start, &SolveOptions::default());
        let keys = expanded.borrow();
        let unique: std::collections::HashSet<&String> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len(), "a state was expanded twice");
    }
}
