pub mod client_requests;
pub mod game_action;
pub mod settings;
pub mod views;
