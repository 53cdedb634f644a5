use serde::{Deserialize, Serialize};

use super::{PairConstraint, Position, SpecError, Symbol};

/// The fixed part of a balance-family puzzle: board size, pre-filled given
/// cells, and the explicit pair-constraint list. Shared immutably (via `Rc`)
/// between all board snapshots of the same puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TangoLayout {
    pub size: usize,
    pub givens: Vec<(Position, Symbol)>,
    pub constraints: Vec<PairConstraint>,
}

impl TangoLayout {
    pub fn new(
        size: usize,
        givens: Vec<(Position, Symbol)>,
        constraints: Vec<PairConstraint>,
    ) -> Result<Self, SpecError> {
        if size == 0 {
            return Err(SpecError::BadDimensions {
                width: size,
                height: size,
            });
        }
        if size % 2 != 0 {
            return Err(SpecError::OddBoardSize { size });
        }
        let in_range = |pos: &Position| pos.row < size && pos.col < size;
        for (pos, _) in &givens {
            if !in_range(pos) {
                return Err(SpecError::PositionOutOfRange {
                    position: *pos,
                    width: size,
                    height: size,
                });
            }
        }
        for constraint in &constraints {
            for pos in [&constraint.a, &constraint.b] {
                if !in_range(pos) {
                    return Err(SpecError::PositionOutOfRange {
                        position: *pos,
                        width: size,
                        height: size,
                    });
                }
            }
            if !constraint.a.is_orthogonal_to(&constraint.b) {
                return Err(SpecError::NonAdjacentConstraint {
                    a: constraint.a,
                    b: constraint.b,
                });
            }
        }
        // A constraint between two givens must already hold.
        let given_value = |pos: &Position| {
            givens
                .iter()
                .find(|(given, _)| given == pos)
                .map(|(_, symbol)| *symbol)
        };
        for constraint in &constraints {
            if let (Some(value_a), Some(value_b)) =
                (given_value(&constraint.a), given_value(&constraint.b))
            {
                if !constraint.holds(value_a, value_b) {
                    return Err(SpecError::ContradictoryGivens {
                        position: constraint.a,
                    });
                }
            }
        }
        Ok(Self {
            size,
            givens,
            constraints,
        })
    }

    pub fn is_given(&self, pos: &Position) -> bool {
        self.givens.iter().any(|(given, _)| given == pos)
    }

    pub fn constraints_touching(&self, pos: &Position) -> Vec<&PairConstraint> {
        self.constraints.iter().filter(|c| c.touches(pos)).collect()
    }
}
