mod pair_constraint;
mod position;
mod queens_board;
mod region_layout;
mod spec_error;
mod symbol;
mod tango_board;
mod tango_layout;

pub use pair_constraint::{PairConstraint, PairKind};
pub use position::Position;
pub use queens_board::{QueensBoard, QueensCell};
pub use region_layout::{RegionId, RegionLayout};
pub use spec_error::SpecError;
pub use symbol::Symbol;
pub use tango_board::TangoBoard;
pub use tango_layout::TangoLayout;
