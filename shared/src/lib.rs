pub mod api;
pub mod constants;
pub mod game_session;
pub mod prize;
pub mod rate_limit;
pub mod validation;
