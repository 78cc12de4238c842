use serde::{Serialize, Serializer};

use crate::game::catalog::cards::PAWN;
use crate::game::entity::card::{CardDefinition, CardId, GameCard, Keyword};
use crate::game::entity::player::{Player, PlayerInfo, Zone};
use crate::game::rng::{draw, SeededRng};
use crate::game::triggers::{Trigger, TriggerKind};
use crate::utils::errors::{GameError, LogicFail};

/// Seconds a player has before their turn is ended for them.
pub const GAME_TURN_TIME: u32 = 90;
/// Total attacker power needed to break a protection card.
pub const GAME_PROTECTION_POWER: i32 = 30;
/// Resource spent to put one charge on a hero.
pub const HERO_CHARGE_COST: u32 = 2;

pub const OPENING_HAND: usize = 5;
pub const OPENING_PROTECTION: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Player1,
    Player2,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player1 => Side::Player2,
            Side::Player2 => Side::Player1,
        }
    }
}

/// Who caused, or who reacts to, a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Card(CardId),
    Hero(Side),
    /// The game rules themselves, e.g. the turn change.
    Mechanic,
}

impl Serialize for Source {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Source::Card(id) => id.serialize(serializer),
            Source::Hero(Side::Player1) => serializer.serialize_str("player1Hero"),
            Source::Hero(Side::Player2) => serializer.serialize_str("player2Hero"),
            Source::Mechanic => serializer.serialize_str("gameMechanic"),
        }
    }
}

/// A trigger as it was resolved, kept for client presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerEvent {
    /// Unique within the match.
    pub id: u64,
    /// Cascade depth; reactions at the same depth happened "at the same time".
    pub beat: u32,
    pub trigger: Trigger,
}

/// The single authoritative snapshot of a match.
///
/// Handlers work on an owned copy and the session only commits it once the whole action,
/// cascades included, succeeded.
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: i64,
    pub rng: SeededRng,
    /// Every card of the match, indexed by `CardId`.
    pub cards: Vec<GameCard>,
    pub player1: Player,
    pub player2: Player,
    pub turn: Side,
    pub turn_timer: u32,
    pub winner: Option<Side>,
    /// Triggers resolved during the most recent action.
    pub triggers: Vec<TriggerEvent>,
    next_event_id: u64,
}

impl GameState {
    /// Builds the opening position: both decks are instantiated and shuffled into hand and
    /// protection, a starting player is picked and the other player gets a Pawn.
    pub fn new_match(player1: PlayerInfo, player2: PlayerInfo, seed: i64) -> Self {
        let mut rng = SeededRng::new(seed);
        let mut cards = Vec::new();

        let (p1, p2) = {
            let mut p1 = Player::new(player1.id, player1.hero);
            p1.deck = instantiate(&mut cards, &player1.starting_deck);
            p1.hand = draw(&mut p1.deck, OPENING_HAND, &mut rng);
            p1.protection = draw(&mut p1.deck, OPENING_PROTECTION, &mut rng);

            let mut p2 = Player::new(player2.id, player2.hero);
            p2.deck = instantiate(&mut cards, &player2.starting_deck);
            p2.hand = draw(&mut p2.deck, OPENING_HAND, &mut rng);
            p2.protection = draw(&mut p2.deck, OPENING_PROTECTION, &mut rng);
            (p1, p2)
        };

        let turn = if rng.next_f64() >= 0.5 {
            Side::Player1
        } else {
            Side::Player2
        };

        let mut state = Self {
            seed,
            rng,
            cards,
            player1: p1,
            player2: p2,
            turn,
            turn_timer: GAME_TURN_TIME,
            winner: None,
            triggers: Vec::new(),
            next_event_id: 0,
        };

        let pawn = state.spawn(&PAWN);
        state.player_mut(turn.opponent()).field.push(pawn);
        state
    }

    pub fn player(&self, side: Side) -> &Player {
        match side {
            Side::Player1 => &self.player1,
            Side::Player2 => &self.player2,
        }
    }

    pub fn player_mut(&mut self, side: Side) -> &mut Player {
        match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        }
    }

    /// Resolves a player id to the side it plays.
    pub fn side_of(&self, player_id: &str) -> Result<Side, GameError> {
        if self.player1.id == player_id {
            Ok(Side::Player1)
        } else if self.player2.id == player_id {
            Ok(Side::Player2)
        } else {
            Err(LogicFail::PlayerNotFound.into())
        }
    }

    pub fn card(&self, id: CardId) -> Result<&GameCard, GameError> {
        self.cards
            .get(id.0 as usize)
            .ok_or(GameError::Logic(LogicFail::CardNotFound))
    }

    pub fn card_mut(&mut self, id: CardId) -> Result<&mut GameCard, GameError> {
        self.cards
            .get_mut(id.0 as usize)
            .ok_or(GameError::Logic(LogicFail::CardNotFound))
    }

    /// Creates a new card in the card table. The caller places it in a zone.
    pub fn spawn(&mut self, definition: &'static CardDefinition) -> CardId {
        let id = CardId(self.cards.len() as u32);
        self.cards.push(GameCard::instantiate(definition, id));
        id
    }

    /// Finds which side holds `card` and in which zone.
    pub fn locate(&self, card: CardId) -> Option<(Side, Zone)> {
        [Side::Player1, Side::Player2]
            .into_iter()
            .find_map(|side| self.player(side).zone_of(card).map(|zone| (side, zone)))
    }

    /// Sends a creature from the field to its owner's graveyard, or out of the game when it
    /// was already revived once. Returns the `cardDied` trigger to cascade.
    pub fn kill(&mut self, side: Side, card: CardId) -> Result<Trigger, GameError> {
        let destination = if self.card(card)?.has_keyword(Keyword::Revived) {
            Zone::Removed
        } else {
            Zone::Graveyard
        };
        if !self.player_mut(side).move_card(card, Zone::Field, destination) {
            return Err(LogicFail::TargetNotFound.into());
        }
        Ok(Trigger::new(
            TriggerKind::CardDied,
            side,
            Source::Card(card),
            Source::Card(card),
        ))
    }

    /// Draws `amount` random cards from the side's deck into its hand.
    pub fn draw_cards(&mut self, side: Side, amount: usize) -> Vec<CardId> {
        let player = match side {
            Side::Player1 => &mut self.player1,
            Side::Player2 => &mut self.player2,
        };
        let drawn = draw(&mut player.deck, amount, &mut self.rng);
        player.hand.extend_from_slice(&drawn);
        drawn
    }

    /// Starts a fresh trigger log for the next action.
    pub fn clear_triggers(&mut self) {
        self.triggers.clear();
    }

    pub fn record_trigger(&mut self, trigger: Trigger, beat: u32) {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.triggers.push(TriggerEvent { id, beat, trigger });
    }

    pub fn is_concluded(&self) -> bool {
        self.winner.is_some()
    }
}

fn instantiate(cards: &mut Vec<GameCard>, deck: &[&'static CardDefinition]) -> Vec<CardId> {
    deck.iter()
        .map(|definition| {
            let id = CardId(cards.len() as u32);
            cards.push(GameCard::instantiate(definition, id));
            id
        })
        .collect()
}
