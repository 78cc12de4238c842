pub mod actions;
pub mod catalog;
pub mod combat;
pub mod conditions;
pub mod entity;
pub mod game_state;
pub mod matchmaking;
pub mod rng;
pub mod session;
pub mod triggers;
