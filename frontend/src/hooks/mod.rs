pub mod use_game;

pub use use_game::*;
