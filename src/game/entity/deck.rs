use reqwest::{header::AUTHORIZATION, StatusCode};
use serde::{Deserialize, Serialize};

use crate::game::catalog::{card_by_name, cards};
use crate::game::entity::card::CardDefinition;
use crate::logger;
use crate::utils::errors::DeckRequestError;

/// Copies per card in the starter deck.
const STARTER_COPIES: u32 = 10;

/// A deck as the deck service stores it: card names with copy counts.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub cards: Vec<DeckEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DeckEntry {
    pub name: String,
    pub amount: u32,
}

impl Deck {
    /// The deck handed to players that did not pick one.
    pub fn starter() -> Self {
        let cards = [&cards::ZOMBIE, &cards::NECROMANCER, &cards::CHORT, &cards::SIREN]
            .into_iter()
            .map(|definition| DeckEntry {
                name: definition.name.to_string(),
                amount: STARTER_COPIES,
            })
            .collect();

        Self {
            id: "starter".to_string(),
            name: "Starter".to_string(),
            cards,
        }
    }

    /// Resolves every entry against the catalog, one definition per copy.
    pub fn expand(&self) -> Result<Vec<&'static CardDefinition>, DeckRequestError> {
        let mut definitions = Vec::new();
        for entry in &self.cards {
            let definition = card_by_name(&entry.name)
                .ok_or_else(|| DeckRequestError::UnknownCard(entry.name.clone()))?;
            definitions.extend(std::iter::repeat(definition).take(entry.amount as usize));
        }
        Ok(definitions)
    }

    /// Fetches a player's deck from the deck service.
    ///
    /// # Arguments
    /// * `deck_server` - Base url of the deck service.
    /// * `deck_id` - The ID of the deck to fetch.
    /// * `token` - The player's bearer token.
    pub async fn request(
        deck_server: &str,
        deck_id: &str,
        token: &str,
    ) -> Result<Deck, DeckRequestError> {
        let api_url = format!("{deck_server}/api/deck/{deck_id}");
        let reqwest_client = reqwest::Client::new();

        match reqwest_client
            .get(api_url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
        {
            Err(error) => Err(DeckRequestError::UnexpectedDeckError(error.to_string())),
            Ok(response) => match response.status() {
                StatusCode::OK => response.json::<Deck>().await.map_err(|error| {
                    logger!(ERROR, "[DECK] Malformed deck `{deck_id}` ({error})");
                    DeckRequestError::InvalidDeckFormat
                }),
                StatusCode::UNAUTHORIZED => Err(DeckRequestError::UnauthorizedDeckError),
                StatusCode::NOT_FOUND => Err(DeckRequestError::DeckNotFound(deck_id.to_string())),
                status => {
                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "NO MESSAGE".to_string());
                    Err(DeckRequestError::UnexpectedDeckError(format!(
                        "{status}: {message}"
                    )))
                }
            },
        }
    }
}
