use thiserror::Error;

use super::Position;

/// Rejection reasons for a malformed puzzle specification. All of these are
/// raised at board-construction time, before any search begins.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("board dimensions {width}x{height} are invalid")]
    BadDimensions { width: usize, height: usize },

    #[error("region grid has {actual} cells, expected {expected}")]
    RegionGridSizeMismatch { expected: usize, actual: usize },

    #[error("region {region} has no cells")]
    EmptyRegion { region: usize },

    #[error("balance boards must have an even size, got {size}")]
    OddBoardSize { size: usize },

    #[error("position {position} is outside the {width}x{height} board")]
    PositionOutOfRange {
        position: Position,
        width: usize,
        height: usize,
    },

    #[error("constraint endpoints {a} and {b} are not orthogonally adjacent")]
    NonAdjacentConstraint { a: Position, b: Position },

    #[error("given cell {position} contradicts one of the pair constraints")]
    ContradictoryGivens { position: Position },
}
