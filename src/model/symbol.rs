use serde::{Deserialize, Serialize};

/// One of the two symbols of the balance family.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Deserialize, Serialize)]
pub enum Symbol {
    A,
    B,
}

impl Symbol {
    pub const BOTH: [Symbol; 2] = [Symbol::A, Symbol::B];

    pub fn opposite(&self) -> Symbol {
        match self {
            Symbol::A => Symbol::B,
            Symbol::B => Symbol::A,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Symbol::A => 'A',
            Symbol::B => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<Symbol> {
        match c.to_ascii_uppercase() {
            'A' => Some(Symbol::A),
            'B' => Some(Symbol::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
