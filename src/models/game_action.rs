use serde::{Deserialize, Serialize};

use crate::game::entity::card::CardId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameAction {
    PlayResource,
    PlayCard,
    Attack,
    AttackProtection,
    EndTurn,
    UserSelect,
    Win,
    Forfeit,
    HeroCharge,
    HeroPlay,
    /// Anything the server does not know; ignored.
    #[serde(other)]
    Unknown,
}

/// Message a player sends during a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientMessage {
    pub action: GameAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<CardId>,
}

impl ClientMessage {
    pub fn new(action: GameAction, target: Option<CardId>) -> Self {
        Self { action, target }
    }
}
