use std::fmt::Debug;

/// The capability seam between one puzzle family and the shared search
/// engine. Implementations must be pure: none of these methods mutate the
/// receiver, and repeated calls on the same state return the same results.
pub trait Puzzle: Clone {
    type Move: Clone + Debug;

    /// Exhaustive enumeration of moves that do not immediately violate any
    /// constraint when applied in isolation.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// The state after playing `mv`, as a fresh structural copy.
    fn apply(&self, mv: &Self::Move) -> Self;

    /// Whether this state is a completed, fully valid solution.
    fn is_terminal(&self) -> bool;

    /// Deduce forced assignments (and any elimination marks) to a fixpoint.
    /// Never fails: a contradictory state is returned as-is and caught later
    /// by `is_terminal` or by running out of descendants.
    fn propagate(&self) -> Self;

    /// Total, order-preserving serialization of the cell contents. Two states
    /// serialize identically iff they are identical for dedup purposes.
    fn canonical_key(&self) -> String;

    /// Family-specific heuristic reward for having just played `mv` into this
    /// state. Used only to order candidate expansions, never to prune.
    fn move_bonus(&self, mv: &Self::Move) -> i64;
}
