use serde::Serialize;
use uuid::Uuid;

use crate::game::entity::card::{CardId, CardKind, GameCard, Keyword};
use crate::game::entity::player::{Player, Selection};
use crate::game::game_state::{GameState, Side, Source, TriggerEvent};
use crate::game::triggers::TriggerKind;
use crate::utils::errors::GameError;

/// Everything the server ever says to a player during a match.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "message", rename_all = "camelCase")]
pub enum ServerMessage {
    GameState { state: GameStateView },
    GameError { error: GameError },
}

/// Payload of the `MatchPending` and `MatchFound` packets.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchNotice {
    pub match_id: Uuid,
    pub player_id: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub seed: i64,
    pub player1: PlayerView,
    pub player2: PlayerView,
    /// Id of the player holding the turn.
    pub turn: String,
    pub turn_timer: u32,
    pub winner: Option<String>,
    pub triggers: Vec<TriggerEventView>,
}

impl GameStateView {
    pub fn create_view(state: &GameState) -> Self {
        let player_id = |side: Side| state.player(side).id.clone();
        Self {
            seed: state.seed,
            player1: PlayerView::create_view(state, &state.player1),
            player2: PlayerView::create_view(state, &state.player2),
            turn: player_id(state.turn),
            turn_timer: state.turn_timer,
            winner: state.winner.map(player_id),
            triggers: state
                .triggers
                .iter()
                .map(TriggerEventView::create_view)
                .collect(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeroView {
    pub name: String,
    pub description: String,
    pub required_charges: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: String,
    pub hero: HeroView,
    pub hero_charges: u32,

    pub deck: Vec<CardView>,
    pub hand: Vec<CardView>,
    pub protection: Vec<CardView>,
    pub resource: Vec<CardView>,
    pub field: Vec<CardView>,
    pub graveyard: Vec<CardView>,
    pub removed: Vec<CardView>,

    pub has_played_resource: bool,
    pub has_charged_hero: bool,
    pub resource_spent: u32,
    pub attacked_this_turn: Vec<CardId>,
    pub user_selection: Option<SelectionView>,
}

impl PlayerView {
    fn create_view(state: &GameState, player: &Player) -> Self {
        let cards = |zone: &[CardId]| -> Vec<CardView> {
            zone.iter()
                .filter_map(|id| state.card(*id).ok())
                .map(CardView::create_view)
                .collect()
        };

        Self {
            id: player.id.clone(),
            hero: HeroView {
                name: player.hero.name.to_string(),
                description: player.hero.description.to_string(),
                required_charges: player.hero.required_charges,
            },
            hero_charges: player.hero_charges,
            deck: cards(&player.deck),
            hand: cards(&player.hand),
            protection: cards(&player.protection),
            resource: cards(&player.resource),
            field: cards(&player.field),
            graveyard: cards(&player.graveyard),
            removed: cards(&player.removed),
            has_played_resource: player.has_played_resource,
            has_charged_hero: player.has_charged_hero,
            resource_spent: player.resource_spent,
            attacked_this_turn: player.attacked_this_turn.clone(),
            user_selection: SelectionView::create_view(&player.user_selection),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CardType {
    Creature,
    Spell,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: CardId,
    pub name: String,
    pub cost: u32,
    pub description: String,
    #[serde(rename = "type")]
    pub card_type: CardType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<i32>,
    pub keywords: Vec<Keyword>,
}

impl CardView {
    pub fn create_view(card: &GameCard) -> Self {
        let (card_type, power) = match card.definition.kind {
            CardKind::Creature { .. } => (CardType::Creature, Some(card.power)),
            CardKind::Spell => (CardType::Spell, None),
        };
        Self {
            id: card.id,
            name: card.name().to_string(),
            cost: card.cost(),
            description: card.definition.description.to_string(),
            card_type,
            power,
            keywords: card.keywords.clone(),
        }
    }
}

/// A single hand card, or the list of selected attackers.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum SelectionView {
    Hand(CardId),
    Field(Vec<CardId>),
}

impl SelectionView {
    fn create_view(selection: &Selection) -> Option<Self> {
        match selection {
            Selection::None => None,
            Selection::Hand(card) => Some(SelectionView::Hand(*card)),
            Selection::Field(cards) => Some(SelectionView::Field(cards.clone())),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEventView {
    pub id: u64,
    pub beat: u32,
    #[serde(rename = "trigger")]
    pub kind: TriggerKind,
    /// Side that raised the trigger.
    #[serde(rename = "player")]
    pub side: Side,
    pub origin: Source,
    #[serde(rename = "self")]
    pub self_id: Source,
}

impl TriggerEventView {
    fn create_view(event: &TriggerEvent) -> Self {
        Self {
            id: event.id,
            beat: event.beat,
            kind: event.trigger.kind,
            side: event.trigger.side,
            origin: event.trigger.origin,
            self_id: event.trigger.self_id,
        }
    }
}
