use crate::game::entity::card::{CardId, Keyword};
use crate::game::entity::player::Zone;
use crate::game::game_state::{GameState, Side, Source};
use crate::game::triggers::{Trigger, TriggerKind};
use crate::utils::errors::GameError;

/// `[revive] n`: the last `n` cards of the side's graveyard return to its hand, tagged
/// `revived`. Emits one `revivedCard` per returned card.
pub fn revive(
    state: &mut GameState,
    side: Side,
    origin: Source,
    amount: usize,
) -> Result<Vec<Trigger>, GameError> {
    let graveyard = &state.player(side).graveyard;
    let revived: Vec<CardId> = graveyard[graveyard.len().saturating_sub(amount)..].to_vec();

    let mut triggers = Vec::with_capacity(revived.len());
    for card in revived {
        state.card_mut(card)?.grant(Keyword::Revived);
        state
            .player_mut(side)
            .move_card(card, Zone::Graveyard, Zone::Hand);
        triggers.push(Trigger::new(
            TriggerKind::RevivedCard,
            side,
            origin,
            Source::Card(card),
        ));
    }

    Ok(triggers)
}
