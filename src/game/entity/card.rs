use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::game_state::{GameState, Side, Source};
use crate::game::triggers::{Trigger, TriggerKind};
use crate::utils::errors::GameError;

/// Identity of one physical card within a match. Assigned once, when a definition is
/// instantiated, and doubles as the card's index in the state's card table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Keyword {
    /// Returned from the graveyard; removed from the game instead of dying again.
    Revived,
    /// Cannot be attacked while a non-cowardly ally stands.
    Cowardly,
    /// Must be attacked before any other creature.
    Brave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    Creature { power: i32 },
    Spell,
}

/// Everything a card effect needs to know about why it is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectContext {
    /// Side that owns the reacting card or hero.
    pub side: Side,
    /// What caused the effect.
    pub origin: Source,
    /// The card or hero whose effect is running.
    pub this: Source,
    /// Optional target chosen by the player.
    pub target: Option<CardId>,
}

/// Triggers emitted by an effect, to be cascaded by the caller.
pub type EffectResult = Result<Vec<Trigger>, GameError>;

/// Behaviour attached to a card or hero definition.
///
/// Both hooks default to doing nothing. A card only receives `on_trigger` for the kinds it
/// declares through `reacts_to`.
pub trait Effectful: Send + Sync {
    fn on_play(&self, _state: &mut GameState, _ctx: &EffectContext) -> EffectResult {
        Ok(Vec::new())
    }

    fn reacts_to(&self, _kind: TriggerKind) -> bool {
        false
    }

    fn on_trigger(
        &self,
        _kind: TriggerKind,
        _state: &mut GameState,
        _ctx: &EffectContext,
    ) -> EffectResult {
        Ok(Vec::new())
    }
}

/// Vanilla cards.
pub struct NoEffect;

impl Effectful for NoEffect {}

/// Static description of a card, shared by every copy of it.
pub struct CardDefinition {
    pub name: &'static str,
    pub cost: u32,
    pub description: &'static str,
    pub kind: CardKind,
    pub keywords: &'static [Keyword],
    pub effect: &'static dyn Effectful,
}

impl fmt::Debug for CardDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDefinition")
            .field("name", &self.name)
            .field("cost", &self.cost)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A card instantiated into a match.
#[derive(Debug, Clone)]
pub struct GameCard {
    pub id: CardId,
    pub definition: &'static CardDefinition,
    /// Current power. Only meaningful for creatures; effects may raise it.
    pub power: i32,
    pub keywords: Vec<Keyword>,
}

impl GameCard {
    pub fn instantiate(definition: &'static CardDefinition, id: CardId) -> Self {
        let power = match definition.kind {
            CardKind::Creature { power } => power,
            CardKind::Spell => 0,
        };

        Self {
            id,
            definition,
            power,
            keywords: definition.keywords.to_vec(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.definition.name
    }

    pub fn cost(&self) -> u32 {
        self.definition.cost
    }

    pub fn is_creature(&self) -> bool {
        matches!(self.definition.kind, CardKind::Creature { .. })
    }

    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    /// Adds a keyword unless the card already has it.
    pub fn grant(&mut self, keyword: Keyword) {
        if !self.has_keyword(keyword) {
            self.keywords.push(keyword);
        }
    }
}
