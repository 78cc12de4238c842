//! Guards checked before an action touches the state.
//!
//! Each guard is a pure predicate over the state and the acting side. Actions list their
//! guards in order and the first one that fails is the one reported.

use crate::game::entity::card::{CardId, Keyword};
use crate::game::entity::player::Selection;
use crate::game::game_state::{GameState, Side, HERO_CHARGE_COST};
use crate::utils::errors::{ConditionFail, GameError};

pub type Condition = fn(&GameState, Side) -> Result<(), GameError>;

pub const PLAY_RESOURCE: &[Condition] = &[
    is_your_turn,
    has_hand_card_selected,
    has_not_played_resource,
];

pub const PLAY_CARD: &[Condition] = &[
    is_your_turn,
    has_hand_card_selected,
    selected_card_affordable,
];

pub const ATTACK: &[Condition] = &[is_your_turn, has_field_cards_selected];

pub const ATTACK_PROTECTION: &[Condition] = &[
    is_your_turn,
    has_field_cards_selected,
    opponent_field_empty,
];

pub const WIN: &[Condition] = &[
    is_your_turn,
    has_field_cards_selected,
    opponent_protection_empty,
    opponent_field_empty,
];

pub const HERO_CHARGE: &[Condition] = &[
    is_your_turn,
    has_not_charged_hero,
    hero_charge_affordable,
];

pub const HERO_PLAY: &[Condition] = &[is_your_turn, hero_charges_met];

pub const END_TURN: &[Condition] = &[is_your_turn];

/// Runs `conditions` in order, stopping at the first failure.
pub fn check(state: &GameState, side: Side, conditions: &[Condition]) -> Result<(), GameError> {
    conditions
        .iter()
        .try_for_each(|condition| condition(state, side))
}

fn fail(condition: bool, kind: ConditionFail) -> Result<(), GameError> {
    if condition {
        Ok(())
    } else {
        Err(kind.into())
    }
}

pub fn is_your_turn(state: &GameState, side: Side) -> Result<(), GameError> {
    fail(state.turn == side, ConditionFail::NotYourTurn)
}

pub fn has_hand_card_selected(state: &GameState, side: Side) -> Result<(), GameError> {
    fail(
        matches!(state.player(side).user_selection, Selection::Hand(_)),
        ConditionFail::NoCardSelected,
    )
}

pub fn has_field_cards_selected(state: &GameState, side: Side) -> Result<(), GameError> {
    fail(
        matches!(&state.player(side).user_selection, Selection::Field(cards) if !cards.is_empty()),
        ConditionFail::NoCardSelected,
    )
}

pub fn has_not_played_resource(state: &GameState, side: Side) -> Result<(), GameError> {
    fail(
        !state.player(side).has_played_resource,
        ConditionFail::HasPlayedResource,
    )
}

pub fn selected_card_affordable(state: &GameState, side: Side) -> Result<(), GameError> {
    let player = state.player(side);
    let Selection::Hand(card) = player.user_selection else {
        return Err(ConditionFail::NoCardSelected.into());
    };
    let cost = state.card(card)?.cost();
    fail(
        player.available_resource() >= cost,
        ConditionFail::NotEnoughResource,
    )
}

pub fn opponent_field_empty(state: &GameState, side: Side) -> Result<(), GameError> {
    fail(
        state.player(side.opponent()).field.is_empty(),
        ConditionFail::OpponentHasField,
    )
}

pub fn opponent_protection_empty(state: &GameState, side: Side) -> Result<(), GameError> {
    fail(
        state.player(side.opponent()).protection.is_empty(),
        ConditionFail::OpponentHasProtection,
    )
}

pub fn has_not_charged_hero(state: &GameState, side: Side) -> Result<(), GameError> {
    fail(
        !state.player(side).has_charged_hero,
        ConditionFail::HasChargedHero,
    )
}

pub fn hero_charge_affordable(state: &GameState, side: Side) -> Result<(), GameError> {
    fail(
        state.player(side).available_resource() >= HERO_CHARGE_COST,
        ConditionFail::NotEnoughResource,
    )
}

pub fn hero_charges_met(state: &GameState, side: Side) -> Result<(), GameError> {
    let player = state.player(side);
    fail(
        player.hero_charges >= player.hero.required_charges,
        ConditionFail::NotEnoughCharges,
    )
}

/// Brave defenders must be attacked first; cowardly ones only once nothing else stands.
pub fn attack_priority(state: &GameState, side: Side, target: CardId) -> Result<(), GameError> {
    let defenders = &state.player(side.opponent()).field;
    let target_card = state.card(target)?;

    let mut any_brave = false;
    let mut any_bold = false;
    for card in defenders {
        let card = state.card(*card)?;
        any_brave |= card.has_keyword(Keyword::Brave);
        any_bold |= !card.has_keyword(Keyword::Cowardly);
    }

    if any_brave && !target_card.has_keyword(Keyword::Brave) {
        return Err(ConditionFail::BravePriority.into());
    }
    if target_card.has_keyword(Keyword::Cowardly) && any_bold {
        return Err(ConditionFail::CowardlyPriority.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::cards::ZOMBIE;
    use crate::game::game_state::tests::new_test_match;

    #[test]
    fn test_first_failure_is_reported() {
        let state = new_test_match(40);
        let idle = state.turn.opponent();
        // Both the turn and the selection are wrong; the turn comes first.
        assert_eq!(
            check(&state, idle, PLAY_CARD).unwrap_err(),
            GameError::Condition(ConditionFail::NotYourTurn)
        );
        assert_eq!(
            check(&state, state.turn, PLAY_CARD).unwrap_err(),
            GameError::Condition(ConditionFail::NoCardSelected)
        );
    }

    #[test]
    fn test_field_selection_does_not_count_as_hand_selection() {
        let mut state = new_test_match(41);
        let side = state.turn;
        let card = state.spawn(&ZOMBIE);
        state.player_mut(side).field.push(card);
        state.player_mut(side).user_selection = Selection::Field(vec![card]);

        assert!(has_field_cards_selected(&state, side).is_ok());
        assert_eq!(
            has_hand_card_selected(&state, side).unwrap_err(),
            GameError::Condition(ConditionFail::NoCardSelected)
        );
    }

    #[test]
    fn test_affordability() {
        let mut state = new_test_match(42);
        let side = state.turn;
        let card = state.spawn(&ZOMBIE);
        let player = state.player_mut(side);
        player.hand.push(card);
        player.user_selection = Selection::Hand(card);

        assert_eq!(
            selected_card_affordable(&state, side).unwrap_err(),
            GameError::Condition(ConditionFail::NotEnoughResource)
        );
        let resources: Vec<_> = state.player(side).hand[..2].to_vec();
        state.player_mut(side).resource.extend(resources);
        assert!(selected_card_affordable(&state, side).is_ok());
    }

    #[test]
    fn test_hero_conditions() {
        let mut state = new_test_match(43);
        let side = state.turn;
        assert_eq!(
            check(&state, side, HERO_CHARGE).unwrap_err(),
            GameError::Condition(ConditionFail::NotEnoughResource)
        );
        state.player_mut(side).has_charged_hero = true;
        assert_eq!(
            check(&state, side, HERO_CHARGE).unwrap_err(),
            GameError::Condition(ConditionFail::HasChargedHero)
        );
        assert_eq!(
            check(&state, side, HERO_PLAY).unwrap_err(),
            GameError::Condition(ConditionFail::NotEnoughCharges)
        );
        let required = state.player(side).hero.required_charges;
        state.player_mut(side).hero_charges = required;
        assert!(check(&state, side, HERO_PLAY).is_ok());
    }

    #[test]
    fn test_attack_priority() {
        let mut state = new_test_match(44);
        let side = state.turn;
        let defender = side.opponent();
        let plain = state.spawn(&ZOMBIE);
        let brave = state.spawn(&ZOMBIE);
        let coward = state.spawn(&ZOMBIE);
        state.card_mut(brave).unwrap().grant(Keyword::Brave);
        state.card_mut(coward).unwrap().grant(Keyword::Cowardly);
        state.player_mut(defender).field = vec![plain, coward];

        assert!(attack_priority(&state, side, plain).is_ok());
        assert_eq!(
            attack_priority(&state, side, coward).unwrap_err(),
            GameError::Condition(ConditionFail::CowardlyPriority)
        );

        state.player_mut(defender).field = vec![plain, brave];
        assert_eq!(
            attack_priority(&state, side, plain).unwrap_err(),
            GameError::Condition(ConditionFail::BravePriority)
        );
        assert!(attack_priority(&state, side, brave).is_ok());

        state.player_mut(defender).field = vec![coward];
        assert!(attack_priority(&state, side, coward).is_ok());
    }
}
