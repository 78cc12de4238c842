use super::card::{CardDefinition, CardId};
use super::deck::Deck;
use super::hero::HeroDefinition;
use crate::game::catalog::{default_hero, hero_by_name};
use crate::logger;
use crate::models::client_requests::ConnectionRequest;
use crate::models::settings::Settings;
use crate::utils::errors::PlayerConnectionError;

/// What a player brings to a match: an authenticated identity, a hero and a starting deck.
#[derive(Debug, Clone)]
pub struct PlayerInfo {
    pub id: String,
    pub hero: &'static HeroDefinition,
    pub starting_deck: Vec<&'static CardDefinition>,
}

impl PlayerInfo {
    /// Builds a player from the CBOR payload of a `Connect` packet.
    ///
    /// The deck is fetched from the deck service when one is configured and the request names
    /// a deck; otherwise the starter deck is used. The hero defaults to the King.
    ///
    /// # Returns
    /// * `Ok(PlayerInfo)` - The player, ready for matchmaking.
    /// * `Err(PlayerConnectionError)` - The payload is invalid, the hero is unknown or the deck
    ///   could not be loaded.
    pub async fn from_connection(payload: &[u8]) -> Result<Self, PlayerConnectionError> {
        let request = serde_cbor::from_slice::<ConnectionRequest>(payload)
            .map_err(|error| PlayerConnectionError::InvalidPlayerPayload(error.to_string()))?;
        if request.player_id.is_empty() {
            return Err(PlayerConnectionError::InvalidPlayerPayload(
                "missing player id".to_string(),
            ));
        }

        let hero = match &request.hero {
            Some(name) => hero_by_name(name)
                .ok_or_else(|| PlayerConnectionError::UnknownHero(name.clone()))?,
            None => default_hero(),
        };

        let deck = match (&request.deck_id, &Settings::current().deck_server) {
            (Some(deck_id), Some(deck_server)) => {
                Deck::request(deck_server, deck_id, &request.auth_token).await?
            }
            _ => Deck::starter(),
        };
        let starting_deck = deck.expand()?;
        logger!(
            INFO,
            "[DECK] `{}` plays `{}` ({} cards) with {}",
            request.player_id,
            deck.name,
            starting_deck.len(),
            hero.name
        );

        Ok(Self {
            id: request.player_id,
            hero,
            starting_deck,
        })
    }
}

/// The player's cursor.
///
/// A single hand card means "about to play a card"; a set of field creatures means "about to
/// attack". The two modes never mix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Hand(CardId),
    Field(Vec<CardId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Deck,
    Hand,
    Protection,
    Resource,
    Field,
    Graveyard,
    /// Out of the match for good (revived creatures that died again, revived spells).
    Removed,
}

impl Zone {
    pub const ALL: [Zone; 7] = [
        Zone::Deck,
        Zone::Hand,
        Zone::Protection,
        Zone::Resource,
        Zone::Field,
        Zone::Graveyard,
        Zone::Removed,
    ];
}

/// One side of the match. Zones hold card ids; the cards themselves live in the state's
/// card table.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: String,
    pub hero: &'static HeroDefinition,
    pub hero_charges: u32,

    pub deck: Vec<CardId>,
    pub hand: Vec<CardId>,
    pub protection: Vec<CardId>,
    pub resource: Vec<CardId>,
    pub field: Vec<CardId>,
    pub graveyard: Vec<CardId>,
    pub removed: Vec<CardId>,

    pub has_played_resource: bool,
    pub has_charged_hero: bool,
    pub resource_spent: u32,
    pub user_selection: Selection,
    pub attacked_this_turn: Vec<CardId>,
}

impl Player {
    pub fn new(id: String, hero: &'static HeroDefinition) -> Self {
        Self {
            id,
            hero,
            hero_charges: 0,
            deck: Vec::new(),
            hand: Vec::new(),
            protection: Vec::new(),
            resource: Vec::new(),
            field: Vec::new(),
            graveyard: Vec::new(),
            removed: Vec::new(),
            has_played_resource: false,
            has_charged_hero: false,
            resource_spent: 0,
            user_selection: Selection::None,
            attacked_this_turn: Vec::new(),
        }
    }

    pub fn zone(&self, zone: Zone) -> &Vec<CardId> {
        match zone {
            Zone::Deck => &self.deck,
            Zone::Hand => &self.hand,
            Zone::Protection => &self.protection,
            Zone::Resource => &self.resource,
            Zone::Field => &self.field,
            Zone::Graveyard => &self.graveyard,
            Zone::Removed => &self.removed,
        }
    }

    pub fn zone_mut(&mut self, zone: Zone) -> &mut Vec<CardId> {
        match zone {
            Zone::Deck => &mut self.deck,
            Zone::Hand => &mut self.hand,
            Zone::Protection => &mut self.protection,
            Zone::Resource => &mut self.resource,
            Zone::Field => &mut self.field,
            Zone::Graveyard => &mut self.graveyard,
            Zone::Removed => &mut self.removed,
        }
    }

    /// Zone currently holding `card`, if this player holds it at all.
    pub fn zone_of(&self, card: CardId) -> Option<Zone> {
        Zone::ALL
            .into_iter()
            .find(|zone| self.zone(*zone).contains(&card))
    }

    /// Moves `card` from one zone to the end of another. Returns false, leaving every zone
    /// untouched, when `card` is not in `from`.
    pub fn move_card(&mut self, card: CardId, from: Zone, to: Zone) -> bool {
        let source = self.zone_mut(from);
        match source.iter().position(|c| *c == card) {
            Some(index) => {
                source.remove(index);
                self.zone_mut(to).push(card);
                true
            }
            None => false,
        }
    }

    /// Resource not yet spent this turn.
    pub fn available_resource(&self) -> u32 {
        (self.resource.len() as u32).saturating_sub(self.resource_spent)
    }

    pub fn has_attacked(&self, card: CardId) -> bool {
        self.attacked_this_turn.contains(&card)
    }

    /// Per-turn bookkeeping reset for the player whose turn begins.
    pub fn start_turn(&mut self) {
        self.has_played_resource = false;
        self.has_charged_hero = false;
        self.resource_spent = 0;
        self.attacked_this_turn.clear();
    }

    /// Every card id this player holds, across all zones.
    pub fn all_cards(&self) -> impl Iterator<Item = CardId> + '_ {
        Zone::ALL
            .into_iter()
            .flat_map(move |zone| self.zone(zone).iter().copied())
    }
}
