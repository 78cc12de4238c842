use serde::Serialize;
use thiserror::Error;

/// Expected, user-facing reasons an action was refused. The match carries on unchanged and
/// only the acting player is told.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionFail {
    #[error("It is not your turn")]
    NotYourTurn,
    #[error("Not enough resource to pay for this")]
    NotEnoughResource,
    #[error("A resource was already played this turn")]
    HasPlayedResource,
    #[error("The hero was already charged this turn")]
    HasChargedHero,
    #[error("The hero does not have enough charges")]
    NotEnoughCharges,
    #[error("No card is selected")]
    NoCardSelected,
    #[error("A hand card cannot be selected while attackers are selected")]
    NotTargetingFieldCard,
    #[error("The selected attackers are not powerful enough")]
    NotEnoughPower,
    #[error("The opponent still has protection")]
    OpponentHasProtection,
    #[error("The opponent still has creatures on the field")]
    OpponentHasField,
    #[error("This creature has already attacked this turn")]
    HasAttackedAlready,
    #[error("A brave creature must be attacked first")]
    BravePriority,
    #[error("A cowardly creature cannot be attacked while others stand")]
    CowardlyPriority,
}

/// Unexpected request shapes or targets that no longer exist. A well-behaved client never
/// triggers these, so they are logged as anomalies.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicFail {
    #[error("Player not found in this match")]
    PlayerNotFound,
    #[error("Card not found")]
    CardNotFound,
    #[error("Target not found")]
    TargetNotFound,
    #[error("Spells cannot attack or be attacked")]
    AttackWithSpell,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GameError {
    #[error(transparent)]
    Condition(#[from] ConditionFail),
    #[error(transparent)]
    Logic(#[from] LogicFail),
}

impl GameError {
    pub fn is_logic(&self) -> bool {
        matches!(self, GameError::Logic(_))
    }
}

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid protocol header: {0}")]
    InvalidHeaderError(String),
    #[error("Invalid packet: {0}")]
    InvalidPacketError(String),
    #[error("Connection closed: {0}")]
    ConnectionClosed(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Unable to send package through client stream: {0}")]
    PackageWriteError(String),
    #[error("Unable to encode message: {0}")]
    EncodeError(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PlayerConnectionError {
    #[error("Invalid player payload: {0}")]
    InvalidPlayerPayload(String),
    #[error("Unknown hero `{0}`")]
    UnknownHero(String),
    #[error(transparent)]
    Deck(#[from] DeckRequestError),
}

#[derive(Error, Debug)]
pub enum DeckRequestError {
    #[error("Deck server refused the player token")]
    UnauthorizedDeckError,
    #[error("Deck `{0}` not found")]
    DeckNotFound(String),
    #[error("Deck response could not be parsed")]
    InvalidDeckFormat,
    #[error("Deck contains unknown card `{0}`")]
    UnknownCard(String),
    #[error("Unexpected deck server error: {0}")]
    UnexpectedDeckError(String),
}
