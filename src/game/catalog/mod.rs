//! Static card and hero registry.
//!
//! Definitions are plain statics; the maps below only exist so decks and connection requests
//! can name them.

pub mod cards;
pub mod heroes;
pub mod keywords;

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::game::entity::card::CardDefinition;
use crate::game::entity::hero::HeroDefinition;

static CARDS: LazyLock<HashMap<&'static str, &'static CardDefinition>> = LazyLock::new(|| {
    [
        &cards::PAWN,
        &cards::ZOMBIE,
        &cards::SIREN,
        &cards::NECROMANCER,
        &cards::CHORT,
        &cards::FIRE_LASH,
        &cards::IMP,
    ]
    .into_iter()
    .map(|definition| (definition.name, definition))
    .collect()
});

static HEROES: LazyLock<HashMap<&'static str, &'static HeroDefinition>> = LazyLock::new(|| {
    [&heroes::KING, &heroes::WARLOCK]
        .into_iter()
        .map(|definition| (definition.name, definition))
        .collect()
});

/// Looks a card up by its display name, ignoring case.
pub fn card_by_name(name: &str) -> Option<&'static CardDefinition> {
    CARDS.get(name).copied().or_else(|| {
        CARDS
            .values()
            .copied()
            .find(|definition| definition.name.eq_ignore_ascii_case(name))
    })
}

pub fn hero_by_name(name: &str) -> Option<&'static HeroDefinition> {
    HEROES.get(name).copied().or_else(|| {
        HEROES
            .values()
            .copied()
            .find(|definition| definition.name.eq_ignore_ascii_case(name))
    })
}

pub fn default_hero() -> &'static HeroDefinition {
    &heroes::KING
}
