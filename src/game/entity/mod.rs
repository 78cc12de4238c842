pub mod card;
pub mod deck;
pub mod hero;
pub mod player;
