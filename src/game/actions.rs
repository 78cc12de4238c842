//! Player actions and the turn timer.
//!
//! Every handler validates its conditions before touching the state. Handlers mutate the
//! state they are given; callers hand them a scratch copy and only keep it when the handler
//! returns `Ok`, so a failure half-way through a cascade never leaks.

use crate::game::combat::resolve_combat;
use crate::game::conditions::{self, attack_priority, check};
use crate::game::entity::card::{CardId, EffectContext, Keyword};
use crate::game::entity::player::{Selection, Zone};
use crate::game::game_state::{GameState, Side, Source, GAME_PROTECTION_POWER, GAME_TURN_TIME, HERO_CHARGE_COST};
use crate::game::triggers::{process_trigger, process_triggers, Trigger, TriggerKind};
use crate::models::game_action::GameAction;
use crate::utils::errors::{ConditionFail, GameError, LogicFail};

/// Applies one player action to `state`.
///
/// Concluded matches ignore every action. `Unknown` actions are no-ops.
pub fn handle_player_action(
    state: &mut GameState,
    player_id: &str,
    action: GameAction,
    target: Option<CardId>,
) -> Result<(), GameError> {
    let side = state.side_of(player_id)?;
    if state.is_concluded() {
        return Ok(());
    }
    // A refused action keeps the previous trigger log.
    let previous = std::mem::take(&mut state.triggers);
    if let Err(error) = dispatch(state, side, action, target) {
        state.triggers = previous;
        return Err(error);
    }

    prune_selections(state);
    Ok(())
}

fn dispatch(
    state: &mut GameState,
    side: Side,
    action: GameAction,
    target: Option<CardId>,
) -> Result<(), GameError> {
    match action {
        GameAction::PlayResource => play_resource(state, side),
        GameAction::PlayCard => play_card(state, side, target),
        GameAction::Attack => attack(state, side, target),
        GameAction::AttackProtection => attack_protection(state, side, target),
        GameAction::EndTurn => end_turn(state, side),
        GameAction::UserSelect => user_select(state, side, target),
        GameAction::Win => win(state, side),
        GameAction::Forfeit => {
            forfeit(state, side);
            Ok(())
        }
        GameAction::HeroCharge => hero_charge(state, side),
        GameAction::HeroPlay => hero_play(state, side, target),
        GameAction::Unknown => Ok(()),
    }
}

/// One second of the turn clock. At zero the current turn is ended for its owner.
pub fn turn_tick(state: &mut GameState) -> Result<(), GameError> {
    if state.is_concluded() {
        return Ok(());
    }
    state.clear_triggers();

    if state.turn_timer == 0 {
        end_turn(state, state.turn)?;
        prune_selections(state);
    } else {
        state.turn_timer -= 1;
    }
    Ok(())
}

/// Forfeits on behalf of `player_id`. Used when a player's connection drops.
pub fn forfeit_player(state: &mut GameState, player_id: &str) -> Result<(), GameError> {
    let side = state.side_of(player_id)?;
    forfeit(state, side);
    Ok(())
}

fn selected_hand_card(state: &GameState, side: Side) -> Result<CardId, GameError> {
    match state.player(side).user_selection {
        Selection::Hand(card) => Ok(card),
        _ => Err(ConditionFail::NoCardSelected.into()),
    }
}

/// Selected attackers with their power. Every attacker must still be a creature on the
/// field that has not attacked yet this turn.
fn selected_attackers(state: &GameState, side: Side) -> Result<Vec<(CardId, i32)>, GameError> {
    let player = state.player(side);
    let Selection::Field(cards) = &player.user_selection else {
        return Err(ConditionFail::NoCardSelected.into());
    };

    cards
        .iter()
        .map(|id| {
            let card = state.card(*id)?;
            if !player.field.contains(id) {
                return Err(LogicFail::CardNotFound.into());
            }
            if !card.is_creature() {
                return Err(LogicFail::AttackWithSpell.into());
            }
            if player.has_attacked(*id) {
                return Err(ConditionFail::HasAttackedAlready.into());
            }
            Ok((*id, card.power))
        })
        .collect()
}

/// Clears the selection and marks every attacker as having attacked.
fn spend_attackers(state: &mut GameState, side: Side, attackers: &[(CardId, i32)]) {
    let player = state.player_mut(side);
    player.user_selection = Selection::None;
    player
        .attacked_this_turn
        .extend(attackers.iter().map(|(card, _)| *card));
}

fn play_resource(state: &mut GameState, side: Side) -> Result<(), GameError> {
    check(state, side, conditions::PLAY_RESOURCE)?;
    let card = selected_hand_card(state, side)?;

    let player = state.player_mut(side);
    if !player.move_card(card, Zone::Hand, Zone::Resource) {
        return Err(LogicFail::CardNotFound.into());
    }
    player.has_played_resource = true;
    player.user_selection = Selection::None;

    process_trigger(
        state,
        Trigger::for_card(TriggerKind::PlayedResource, side, card),
    )
}

fn play_card(state: &mut GameState, side: Side, target: Option<CardId>) -> Result<(), GameError> {
    check(state, side, conditions::PLAY_CARD)?;
    let card = selected_hand_card(state, side)?;
    if state.player(side).zone_of(card) != Some(Zone::Hand) {
        return Err(LogicFail::CardNotFound.into());
    }

    let definition = state.card(card)?.definition;
    let ctx = EffectContext {
        side,
        origin: Source::Card(card),
        this: Source::Card(card),
        target,
    };
    let triggers = definition.effect.on_play(state, &ctx)?;
    process_triggers(state, triggers)?;

    let played = state.card(card)?;
    let is_creature = played.is_creature();
    let destination = if is_creature {
        Zone::Field
    } else if played.has_keyword(Keyword::Revived) {
        Zone::Removed
    } else {
        Zone::Graveyard
    };
    let cost = played.cost();

    let player = state.player_mut(side);
    if !player.move_card(card, Zone::Hand, destination) {
        return Err(LogicFail::CardNotFound.into());
    }
    player.resource_spent += cost;
    player.user_selection = Selection::None;
    if is_creature {
        // Creatures cannot attack on the turn they arrive.
        player.attacked_this_turn.push(card);
    }

    process_trigger(state, Trigger::for_card(TriggerKind::CardPlayed, side, card))
}

fn attack(state: &mut GameState, side: Side, target: Option<CardId>) -> Result<(), GameError> {
    check(state, side, conditions::ATTACK)?;
    let target = target.ok_or(LogicFail::TargetNotFound)?;
    let opponent = side.opponent();
    if !state.player(opponent).field.contains(&target) {
        return Err(LogicFail::TargetNotFound.into());
    }
    let defender = state.card(target)?;
    if !defender.is_creature() {
        return Err(LogicFail::AttackWithSpell.into());
    }
    let defender_power = defender.power;
    attack_priority(state, side, target)?;

    let attackers = selected_attackers(state, side)?;
    let outcome = resolve_combat(&attackers, defender_power);

    spend_attackers(state, side, &attackers);
    let mut deaths = Vec::new();
    for card in &outcome.dying_attackers {
        deaths.push(state.kill(side, *card)?);
    }
    if outcome.defender_dies {
        deaths.push(state.kill(opponent, target)?);
    }

    for (card, _) in &attackers {
        process_trigger(state, Trigger::for_card(TriggerKind::CardAttacked, side, *card))?;
    }
    process_triggers(state, deaths)
}

fn attack_protection(
    state: &mut GameState,
    side: Side,
    target: Option<CardId>,
) -> Result<(), GameError> {
    check(state, side, conditions::ATTACK_PROTECTION)?;
    let target = target.ok_or(LogicFail::TargetNotFound)?;
    let opponent = side.opponent();
    if !state.player(opponent).protection.contains(&target) {
        return Err(LogicFail::TargetNotFound.into());
    }

    let attackers = selected_attackers(state, side)?;
    let power: i32 = attackers.iter().map(|(_, power)| power).sum();
    if power < GAME_PROTECTION_POWER {
        return Err(ConditionFail::NotEnoughPower.into());
    }

    spend_attackers(state, side, &attackers);
    state
        .player_mut(opponent)
        .move_card(target, Zone::Protection, Zone::Hand);

    for (card, _) in &attackers {
        process_trigger(state, Trigger::for_card(TriggerKind::CardAttacked, side, *card))?;
    }
    process_trigger(
        state,
        Trigger::for_card(TriggerKind::ProtectionDestroyed, side, target),
    )
}

fn end_turn(state: &mut GameState, side: Side) -> Result<(), GameError> {
    check(state, side, conditions::END_TURN)?;
    let next = side.opponent();

    state.turn = next;
    state.turn_timer = GAME_TURN_TIME;
    state.player_mut(next).start_turn();
    state.player_mut(side).user_selection = Selection::None;

    let drawn = state.draw_cards(next, 1);
    let triggers = drawn
        .into_iter()
        .map(|card| Trigger::for_card(TriggerKind::CardDrawn, next, card))
        .collect();
    process_triggers(state, triggers)
}

fn user_select(state: &mut GameState, side: Side, target: Option<CardId>) -> Result<(), GameError> {
    let Some(target) = target else {
        state.player_mut(side).user_selection = Selection::None;
        return Ok(());
    };

    match state.player(side).zone_of(target) {
        Some(Zone::Hand) => {
            let player = state.player_mut(side);
            if matches!(player.user_selection, Selection::Field(_)) {
                return Err(ConditionFail::NotTargetingFieldCard.into());
            }
            player.user_selection = Selection::Hand(target);
            Ok(())
        }
        Some(Zone::Field) => {
            conditions::is_your_turn(state, side)?;
            let player = state.player_mut(side);
            if player.has_attacked(target) {
                return Err(ConditionFail::HasAttackedAlready.into());
            }

            let mut selected = match std::mem::take(&mut player.user_selection) {
                Selection::Field(cards) => cards,
                _ => Vec::new(),
            };
            match selected.iter().position(|card| *card == target) {
                Some(index) => {
                    selected.remove(index);
                }
                None => selected.push(target),
            }

            player.user_selection = if selected.is_empty() {
                Selection::None
            } else {
                Selection::Field(selected)
            };
            Ok(())
        }
        _ => Err(LogicFail::CardNotFound.into()),
    }
}

fn win(state: &mut GameState, side: Side) -> Result<(), GameError> {
    check(state, side, conditions::WIN)?;
    state.winner = Some(side);
    Ok(())
}

fn forfeit(state: &mut GameState, side: Side) {
    if state.winner.is_none() {
        state.winner = Some(side.opponent());
    }
}

fn hero_charge(state: &mut GameState, side: Side) -> Result<(), GameError> {
    check(state, side, conditions::HERO_CHARGE)?;

    let player = state.player_mut(side);
    player.resource_spent += HERO_CHARGE_COST;
    player.hero_charges += 1;
    player.has_charged_hero = true;

    process_trigger(
        state,
        Trigger::new(
            TriggerKind::HeroCharged,
            side,
            Source::Hero(side),
            Source::Hero(side),
        ),
    )
}

fn hero_play(state: &mut GameState, side: Side, target: Option<CardId>) -> Result<(), GameError> {
    check(state, side, conditions::HERO_PLAY)?;

    let hero = state.player(side).hero;
    let ctx = EffectContext {
        side,
        origin: Source::Hero(side),
        this: Source::Hero(side),
        target,
    };
    let triggers = hero.effect.on_play(state, &ctx)?;
    state.player_mut(side).hero_charges = 0;
    process_triggers(state, triggers)
}

/// Drops selected cards that an effect moved out of the hand or field.
fn prune_selections(state: &mut GameState) {
    for side in [Side::Player1, Side::Player2] {
        let player = state.player_mut(side);
        player.user_selection = match std::mem::take(&mut player.user_selection) {
            Selection::Hand(card) if player.hand.contains(&card) => Selection::Hand(card),
            Selection::Field(cards) => {
                let kept: Vec<_> = cards
                    .into_iter()
                    .filter(|card| player.field.contains(card))
                    .collect();
                if kept.is_empty() {
                    Selection::None
                } else {
                    Selection::Field(kept)
                }
            }
            _ => Selection::None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::cards::{CHORT, FIRE_LASH, IMP, SIREN, ZOMBIE};
    use crate::game::entity::card::CardDefinition;
    use crate::game::game_state::tests::{assert_cards_conserved, new_test_match};
    use crate::models::views::GameStateView;

    /// Match where "alice" (player 1) always starts, with an empty board.
    fn alice_to_play() -> GameState {
        let mut state = new_test_match(1_234);
        state.turn = Side::Player1;
        for side in [Side::Player1, Side::Player2] {
            let player = state.player_mut(side);
            let field = std::mem::take(&mut player.field);
            player.graveyard.extend(field);
        }
        state
    }

    fn put(state: &mut GameState, side: Side, definition: &'static CardDefinition, zone: Zone) -> CardId {
        let id = state.spawn(definition);
        state.player_mut(side).zone_mut(zone).push(id);
        id
    }

    fn give_resource(state: &mut GameState, side: Side, amount: usize) {
        for _ in 0..amount {
            put(state, side, &ZOMBIE, Zone::Resource);
        }
    }

    fn act(state: &mut GameState, player: &str, action: GameAction, target: Option<CardId>) -> Result<(), GameError> {
        handle_player_action(state, player, action, target)
    }

    fn select(state: &mut GameState, player: &str, cards: &[CardId]) {
        for card in cards {
            act(state, player, GameAction::UserSelect, Some(*card)).unwrap();
        }
    }

    fn kinds(state: &GameState) -> Vec<TriggerKind> {
        state.triggers.iter().map(|event| event.trigger.kind).collect()
    }

    #[test]
    fn test_play_resource() {
        let mut state = alice_to_play();
        let card = state.player1.hand[0];
        select(&mut state, "alice", &[card]);

        act(&mut state, "alice", GameAction::PlayResource, None).unwrap();

        assert_eq!(state.player1.resource, vec![card]);
        assert!(!state.player1.hand.contains(&card));
        assert!(state.player1.has_played_resource);
        assert_eq!(state.player1.user_selection, Selection::None);
        assert_eq!(kinds(&state), vec![TriggerKind::PlayedResource]);

        let second = state.player1.hand[0];
        select(&mut state, "alice", &[second]);
        assert_eq!(
            act(&mut state, "alice", GameAction::PlayResource, None).unwrap_err(),
            GameError::Condition(ConditionFail::HasPlayedResource)
        );
        assert_cards_conserved(&state);
    }

    #[test]
    fn test_resource_gate() {
        let mut state = alice_to_play();
        give_resource(&mut state, Side::Player1, 2);
        let siren = put(&mut state, Side::Player1, &SIREN, Zone::Hand);
        assert_eq!(state.card(siren).unwrap().cost(), 3);
        select(&mut state, "alice", &[siren]);
        let before = state.clone();

        assert_eq!(
            act(&mut state, "alice", GameAction::PlayCard, None).unwrap_err(),
            GameError::Condition(ConditionFail::NotEnoughResource)
        );
        assert_eq!(state.player1.hand, before.player1.hand);
        assert_eq!(state.player1.field, before.player1.field);
        assert_eq!(state.player1.resource, before.player1.resource);
        assert_eq!(state.player1.resource_spent, 0);
        assert_eq!(state.player1.user_selection, Selection::Hand(siren));
    }

    #[test]
    fn test_resource_spent_never_exceeds_resource() {
        let mut state = alice_to_play();
        give_resource(&mut state, Side::Player1, 5);
        let zombies: Vec<_> = (0..4)
            .map(|_| put(&mut state, Side::Player1, &ZOMBIE, Zone::Hand))
            .collect();

        let mut played = 0;
        for zombie in zombies {
            select(&mut state, "alice", &[zombie]);
            if act(&mut state, "alice", GameAction::PlayCard, None).is_ok() {
                played += 1;
            }
            let player = &state.player1;
            assert!(player.resource_spent as usize <= player.resource.len());
        }
        assert_eq!(played, 2);
        assert_eq!(state.player1.resource_spent, 4);
    }

    #[test]
    fn test_play_creature() {
        let mut state = alice_to_play();
        give_resource(&mut state, Side::Player1, 3);
        let zombie = put(&mut state, Side::Player1, &ZOMBIE, Zone::Hand);
        select(&mut state, "alice", &[zombie]);

        act(&mut state, "alice", GameAction::PlayCard, None).unwrap();

        assert_eq!(state.player1.field, vec![zombie]);
        assert_eq!(state.player1.resource_spent, 2);
        assert!(state.player1.has_attacked(zombie));
        assert_eq!(state.player1.user_selection, Selection::None);
        assert_eq!(kinds(&state), vec![TriggerKind::CardPlayed]);
        assert_eq!(
            act(&mut state, "alice", GameAction::UserSelect, Some(zombie)).unwrap_err(),
            GameError::Condition(ConditionFail::HasAttackedAlready)
        );
        assert_cards_conserved(&state);
    }

    #[test]
    fn test_play_effect_cascades_before_card_enters() {
        let mut state = alice_to_play();
        give_resource(&mut state, Side::Player1, 5);
        let siren = put(&mut state, Side::Player2, &SIREN, Zone::Field);
        let victim = put(&mut state, Side::Player2, &ZOMBIE, Zone::Field);
        let chort = put(&mut state, Side::Player1, &CHORT, Zone::Hand);
        let bob_hand = state.player2.hand.len();
        select(&mut state, "alice", &[chort]);

        act(&mut state, "alice", GameAction::PlayCard, Some(victim)).unwrap();

        assert_eq!(state.player2.field, vec![siren]);
        assert!(state.player2.graveyard.contains(&victim));
        assert_eq!(state.player2.hand.len(), bob_hand + 1);
        assert_eq!(state.player1.field, vec![chort]);
        assert_eq!(
            kinds(&state),
            vec![
                TriggerKind::CardDied,
                TriggerKind::CardDrawn,
                TriggerKind::CardPlayed
            ]
        );
        assert_cards_conserved(&state);
    }

    #[test]
    fn test_spell_goes_to_graveyard() {
        let mut state = alice_to_play();
        give_resource(&mut state, Side::Player1, 3);
        let lash = put(&mut state, Side::Player1, &FIRE_LASH, Zone::Hand);
        let shield = state.player2.protection[0];
        select(&mut state, "alice", &[lash]);

        act(&mut state, "alice", GameAction::PlayCard, Some(shield)).unwrap();

        assert!(state.player1.graveyard.contains(&lash));
        assert!(!state.player1.field.contains(&lash));
        assert!(state.player2.hand.contains(&shield));
        assert_cards_conserved(&state);
    }

    #[test]
    fn test_failed_effect_is_reported() {
        let mut state = alice_to_play();
        give_resource(&mut state, Side::Player1, 3);
        let lash = put(&mut state, Side::Player1, &FIRE_LASH, Zone::Hand);
        select(&mut state, "alice", &[lash]);

        assert_eq!(
            act(&mut state, "alice", GameAction::PlayCard, Some(CardId(5_000))).unwrap_err(),
            GameError::Logic(LogicFail::TargetNotFound)
        );
    }

    #[test]
    fn test_attack_resolution() {
        let mut state = alice_to_play();
        let a = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        let b = put(&mut state, Side::Player1, &SIREN, Zone::Field);
        let defender = put(&mut state, Side::Player2, &SIREN, Zone::Field);
        select(&mut state, "alice", &[a, b]);

        act(&mut state, "alice", GameAction::Attack, Some(defender)).unwrap();

        // 10 + 20 against 20: the defender and both attackers (<= 20) die.
        assert!(state.player1.field.is_empty());
        assert!(state.player2.field.is_empty());
        assert!(state.player1.graveyard.ends_with(&[a, b]));
        assert!(state.player2.graveyard.contains(&defender));
        assert_eq!(state.player1.attacked_this_turn, vec![a, b]);
        assert_eq!(state.player1.user_selection, Selection::None);
        assert_eq!(
            kinds(&state),
            vec![
                TriggerKind::CardAttacked,
                TriggerKind::CardAttacked,
                TriggerKind::CardDied,
                TriggerKind::CardDied,
                TriggerKind::CardDied,
            ]
        );
        assert_cards_conserved(&state);
    }

    #[test]
    fn test_attack_defender_survives_one_short() {
        let mut state = alice_to_play();
        let a = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        let b = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        state.card_mut(b).unwrap().power = 19;
        let defender = put(&mut state, Side::Player2, &ZOMBIE, Zone::Field);
        state.card_mut(defender).unwrap().power = 30;
        select(&mut state, "alice", &[a, b]);

        act(&mut state, "alice", GameAction::Attack, Some(defender)).unwrap();

        assert_eq!(state.player2.field, vec![defender]);
        assert!(state.player1.field.is_empty());
    }

    #[test]
    fn test_revived_attacker_leaves_the_game() {
        let mut state = alice_to_play();
        let revived = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        state.card_mut(revived).unwrap().grant(Keyword::Revived);
        let defender = put(&mut state, Side::Player2, &SIREN, Zone::Field);
        select(&mut state, "alice", &[revived]);

        act(&mut state, "alice", GameAction::Attack, Some(defender)).unwrap();

        assert_eq!(state.player1.removed, vec![revived]);
        assert!(!state.player1.graveyard.contains(&revived));
        assert_cards_conserved(&state);
    }

    #[test]
    fn test_imp_becomes_cowardly_after_attacking() {
        let mut state = alice_to_play();
        let imp = put(&mut state, Side::Player1, &IMP, Zone::Field);
        let defender = put(&mut state, Side::Player2, &ZOMBIE, Zone::Field);
        state.card_mut(defender).unwrap().power = 5;
        select(&mut state, "alice", &[imp]);

        act(&mut state, "alice", GameAction::Attack, Some(defender)).unwrap();

        assert_eq!(state.player1.field, vec![imp]);
        assert!(state.card(imp).unwrap().has_keyword(Keyword::Cowardly));
    }

    #[test]
    fn test_attack_needs_a_creature_target() {
        let mut state = alice_to_play();
        let a = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        select(&mut state, "alice", &[a]);
        let before = state.player2.clone();

        assert_eq!(
            act(&mut state, "alice", GameAction::Attack, None).unwrap_err(),
            GameError::Logic(LogicFail::TargetNotFound)
        );
        let shield = state.player2.protection[0];
        assert_eq!(
            act(&mut state, "alice", GameAction::Attack, Some(shield)).unwrap_err(),
            GameError::Logic(LogicFail::TargetNotFound)
        );
        assert_eq!(state.player2.field, before.field);
    }

    #[test]
    fn test_protection_break() {
        let mut state = alice_to_play();
        let a = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        let b = put(&mut state, Side::Player1, &SIREN, Zone::Field);
        let shield = state.player2.protection[2];
        select(&mut state, "alice", &[a, b]);

        act(&mut state, "alice", GameAction::AttackProtection, Some(shield)).unwrap();

        assert!(state.player2.hand.contains(&shield));
        assert!(!state.player2.protection.contains(&shield));
        assert_eq!(state.player1.attacked_this_turn, vec![a, b]);
        assert_eq!(state.player1.field, vec![a, b]);
        assert_eq!(
            kinds(&state),
            vec![
                TriggerKind::CardAttacked,
                TriggerKind::CardAttacked,
                TriggerKind::ProtectionDestroyed
            ]
        );
        assert_cards_conserved(&state);
    }

    #[test]
    fn test_protection_break_needs_power() {
        let mut state = alice_to_play();
        let a = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        let b = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        state.card_mut(b).unwrap().power = 19;
        let shield = state.player2.protection[0];
        select(&mut state, "alice", &[a, b]);

        assert_eq!(
            act(&mut state, "alice", GameAction::AttackProtection, Some(shield)).unwrap_err(),
            GameError::Condition(ConditionFail::NotEnoughPower)
        );
        assert!(state.player2.protection.contains(&shield));
        assert!(state.player1.attacked_this_turn.is_empty());
    }

    #[test]
    fn test_protection_break_needs_empty_field() {
        let mut state = alice_to_play();
        let a = put(&mut state, Side::Player1, &SIREN, Zone::Field);
        let b = put(&mut state, Side::Player1, &SIREN, Zone::Field);
        put(&mut state, Side::Player2, &ZOMBIE, Zone::Field);
        let shield = state.player2.protection[0];
        select(&mut state, "alice", &[a, b]);

        assert_eq!(
            act(&mut state, "alice", GameAction::AttackProtection, Some(shield)).unwrap_err(),
            GameError::Condition(ConditionFail::OpponentHasField)
        );
    }

    #[test]
    fn test_end_turn() {
        let mut state = alice_to_play();
        let a = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        select(&mut state, "alice", &[a]);
        state.player2.has_played_resource = true;
        state.player2.resource_spent = 1;
        state.turn_timer = 12;
        let bob_hand = state.player2.hand.len();
        let bob_deck = state.player2.deck.len();

        act(&mut state, "alice", GameAction::EndTurn, None).unwrap();

        assert_eq!(state.turn, Side::Player2);
        assert_eq!(state.turn_timer, GAME_TURN_TIME);
        assert_eq!(state.player1.user_selection, Selection::None);
        assert!(!state.player2.has_played_resource);
        assert_eq!(state.player2.resource_spent, 0);
        assert_eq!(state.player2.hand.len(), bob_hand + 1);
        assert_eq!(state.player2.deck.len(), bob_deck - 1);
        assert_eq!(kinds(&state), vec![TriggerKind::CardDrawn]);
        assert_cards_conserved(&state);
    }

    #[test]
    fn test_end_turn_with_empty_deck() {
        let mut state = alice_to_play();
        let deck = std::mem::take(&mut state.player2.deck);
        state.player2.graveyard.extend(deck);
        let bob_hand = state.player2.hand.len();

        act(&mut state, "alice", GameAction::EndTurn, None).unwrap();

        assert_eq!(state.player2.hand.len(), bob_hand);
        assert!(state.triggers.is_empty());
    }

    #[test]
    fn test_turn_timer() {
        let mut state = alice_to_play();
        state.turn_timer = 2;
        turn_tick(&mut state).unwrap();
        assert_eq!(state.turn_timer, 1);
        turn_tick(&mut state).unwrap();
        assert_eq!(state.turn_timer, 0);
        assert_eq!(state.turn, Side::Player1);
        turn_tick(&mut state).unwrap();
        assert_eq!(state.turn, Side::Player2);
        assert_eq!(state.turn_timer, GAME_TURN_TIME);
    }

    #[test]
    fn test_user_select_hand_and_field() {
        let mut state = alice_to_play();
        let hand_card = state.player1.hand[0];
        let a = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        let b = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);

        select(&mut state, "alice", &[hand_card]);
        assert_eq!(state.player1.user_selection, Selection::Hand(hand_card));

        select(&mut state, "alice", &[a, b]);
        assert_eq!(state.player1.user_selection, Selection::Field(vec![a, b]));
        assert_eq!(
            act(&mut state, "alice", GameAction::UserSelect, Some(hand_card)).unwrap_err(),
            GameError::Condition(ConditionFail::NotTargetingFieldCard)
        );

        select(&mut state, "alice", &[a]);
        assert_eq!(state.player1.user_selection, Selection::Field(vec![b]));
        select(&mut state, "alice", &[b]);
        assert_eq!(state.player1.user_selection, Selection::None);

        select(&mut state, "alice", &[a]);
        act(&mut state, "alice", GameAction::UserSelect, None).unwrap();
        assert_eq!(state.player1.user_selection, Selection::None);
    }

    #[test]
    fn test_user_select_rejects_foreign_cards() {
        let mut state = alice_to_play();
        let theirs = state.player2.hand[0];
        let shield = state.player1.protection[0];
        for target in [theirs, shield] {
            assert_eq!(
                act(&mut state, "alice", GameAction::UserSelect, Some(target)).unwrap_err(),
                GameError::Logic(LogicFail::CardNotFound)
            );
        }
    }

    #[test]
    fn test_idle_player_may_browse_hand() {
        let mut state = alice_to_play();
        let card = state.player2.hand[0];
        act(&mut state, "bob", GameAction::UserSelect, Some(card)).unwrap();
        assert_eq!(state.player2.user_selection, Selection::Hand(card));
    }

    #[test]
    fn test_win() {
        let mut state = alice_to_play();
        let a = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);
        select(&mut state, "alice", &[a]);
        assert_eq!(
            act(&mut state, "alice", GameAction::Win, None).unwrap_err(),
            GameError::Condition(ConditionFail::OpponentHasProtection)
        );

        let protection = std::mem::take(&mut state.player2.protection);
        state.player2.hand.extend(protection);
        act(&mut state, "alice", GameAction::Win, None).unwrap();
        assert_eq!(state.winner, Some(Side::Player1));

        // Terminal: a forfeit afterwards changes nothing.
        act(&mut state, "alice", GameAction::Forfeit, None).unwrap();
        assert_eq!(state.winner, Some(Side::Player1));
    }

    #[test]
    fn test_forfeit_any_time() {
        let mut state = alice_to_play();
        act(&mut state, "bob", GameAction::Forfeit, None).unwrap();
        assert_eq!(state.winner, Some(Side::Player1));

        let mut state = alice_to_play();
        forfeit_player(&mut state, "alice").unwrap();
        assert_eq!(state.winner, Some(Side::Player2));
    }

    #[test]
    fn test_hero_charge_and_play() {
        let mut state = alice_to_play();
        give_resource(&mut state, Side::Player1, 4);
        let a = put(&mut state, Side::Player1, &ZOMBIE, Zone::Field);

        act(&mut state, "alice", GameAction::HeroCharge, None).unwrap();
        assert_eq!(state.player1.hero_charges, 1);
        assert_eq!(state.player1.resource_spent, HERO_CHARGE_COST);
        assert_eq!(kinds(&state), vec![TriggerKind::HeroCharged]);
        assert_eq!(
            act(&mut state, "alice", GameAction::HeroCharge, None).unwrap_err(),
            GameError::Condition(ConditionFail::HasChargedHero)
        );
        assert_eq!(
            act(&mut state, "alice", GameAction::HeroPlay, None).unwrap_err(),
            GameError::Condition(ConditionFail::NotEnoughCharges)
        );

        // King needs four charges.
        state.player1.hero_charges = 4;
        act(&mut state, "alice", GameAction::HeroPlay, None).unwrap();
        assert_eq!(state.player1.hero_charges, 0);
        assert_eq!(state.card(a).unwrap().power, 20);
        assert_eq!(kinds(&state), vec![TriggerKind::HeroPowerUsed]);
    }

    #[test]
    fn test_turn_exclusivity() {
        let mut state = alice_to_play();
        give_resource(&mut state, Side::Player2, 6);
        let bobs_creature = put(&mut state, Side::Player2, &ZOMBIE, Zone::Field);
        let bobs_card = state.player2.hand[0];
        act(&mut state, "bob", GameAction::UserSelect, Some(bobs_card)).unwrap();
        state.player2.hero_charges = 10;
        let target = state.player1.protection[0];
        act(&mut state, "alice", GameAction::UserSelect, None).unwrap();
        let resource = state.player1.hand[0];
        act(&mut state, "alice", GameAction::UserSelect, Some(resource)).unwrap();
        act(&mut state, "alice", GameAction::PlayResource, None).unwrap();
        assert_eq!(kinds(&state), vec![TriggerKind::PlayedResource]);
        let before = GameStateView::create_view(&state);

        let actions = [
            (GameAction::PlayResource, None),
            (GameAction::PlayCard, None),
            (GameAction::Attack, Some(bobs_creature)),
            (GameAction::AttackProtection, Some(target)),
            (GameAction::EndTurn, None),
            (GameAction::Win, None),
            (GameAction::HeroCharge, None),
            (GameAction::HeroPlay, None),
            (GameAction::UserSelect, Some(bobs_creature)),
        ];
        for (action, target) in actions {
            let mut attempt = state.clone();
            assert_eq!(
                act(&mut attempt, "bob", action, target).unwrap_err(),
                GameError::Condition(ConditionFail::NotYourTurn),
                "{action:?}"
            );
            assert_eq!(GameStateView::create_view(&attempt), before, "{action:?}");
            assert_eq!(attempt.rng, state.rng, "{action:?}");
        }
    }

    #[test]
    fn test_unknown_player() {
        let mut state = alice_to_play();
        assert_eq!(
            act(&mut state, "mallory", GameAction::EndTurn, None).unwrap_err(),
            GameError::Logic(LogicFail::PlayerNotFound)
        );
    }

    #[test]
    fn test_unknown_action_is_noop() {
        let mut state = alice_to_play();
        let turn = state.turn;
        act(&mut state, "bob", GameAction::Unknown, None).unwrap();
        assert_eq!(state.turn, turn);
        assert!(state.triggers.is_empty());
    }
}
