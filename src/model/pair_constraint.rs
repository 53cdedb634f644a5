use serde::{Deserialize, Serialize};

use super::{Position, Symbol};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize, Serialize)]
pub enum PairKind {
    Equal,
    Opposite,
}

/// A typed relation between two cell positions, fixed at construction time.
#[derive(Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PairConstraint {
    pub kind: PairKind,
    pub a: Position,
    pub b: Position,
}

impl PairConstraint {
    pub fn equal(a: Position, b: Position) -> Self {
        Self {
            kind: PairKind::Equal,
            a,
            b,
        }
    }

    pub fn opposite(a: Position, b: Position) -> Self {
        Self {
            kind: PairKind::Opposite,
            a,
            b,
        }
    }

    pub fn touches(&self, pos: &Position) -> bool {
        self.a == *pos || self.b == *pos
    }

    /// The endpoint paired with `pos`, if `pos` is one of the two endpoints.
    pub fn other_endpoint(&self, pos: &Position) -> Option<Position> {
        if self.a == *pos {
            Some(self.b)
        } else if self.b == *pos {
            Some(self.a)
        } else {
            None
        }
    }

    /// Whether the relation holds for two committed endpoint values.
    pub fn holds(&self, value_a: Symbol, value_b: Symbol) -> bool {
        match self.kind {
            PairKind::Equal => value_a == value_b,
            PairKind::Opposite => value_a != value_b,
        }
    }

    /// The value one endpoint must take, given the other endpoint's value.
    pub fn implied_value(&self, other_value: Symbol) -> Symbol {
        match self.kind {
            PairKind::Equal => other_value,
            PairKind::Opposite => other_value.opposite(),
        }
    }
}

impl std::fmt::Debug for PairConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = match self.kind {
            PairKind::Equal => "=",
            PairKind::Opposite => "x",
        };
        write!(f, "{:?}{}{:?}", self.a, sign, self.b)
    }
}
