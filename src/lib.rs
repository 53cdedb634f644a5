pub mod game;
pub mod model;
