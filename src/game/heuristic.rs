use super::puzzle::Puzzle;

/// All heuristic components are integers scaled by this factor so the
/// inverse terms stay meaningful without floating point.
pub const SCORE_SCALE: i64 = 1000;

/// Score a candidate expansion: the state reached after playing `mv`, plus
/// the move itself. Higher is explored first. The sum of a
/// most-constrained-first term (more-constrained resulting states are closer
/// to done) and the family's own bonus for the move.
pub fn score_candidate<P: Puzzle>(after: &P, mv: &P::Move) -> i64 {
    let remaining = after.legal_moves().len().max(1) as i64;
    SCORE_SCALE / remaining + after.move_bonus(mv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::queens_rules::tests_support::board_with_open_cells;

    #[test]
    fn test_more_constrained_states_score_higher() {
        // A state with fewer legal continuations gets a larger inverse term.
        let tight = board_with_open_cells(1);
        let loose = board_with_open_cells(6);
        let mv = tight.legal_moves()[0];
        let mv_loose = loose.legal_moves()[0];
        assert!(score_candidate(&tight, &mv) > score_candidate(&loose, &mv_loose));
    }
}
