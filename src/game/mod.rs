pub mod generator;
pub mod heuristic;
pub mod puzzle;
pub mod queens_rules;
pub mod search;
pub mod tango_rules;

pub use generator::{generate_queens, generate_tango, GenerateError, GenerateOptions};
pub use puzzle::Puzzle;
pub use search::{solve, SolveError, SolveOptions};
pub use tango_rules::TangoMove;
