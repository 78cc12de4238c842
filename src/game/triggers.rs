use serde::Serialize;

use crate::game::entity::card::{CardId, EffectContext};
use crate::game::game_state::{GameState, Side, Source};
use crate::logger;
use crate::utils::errors::GameError;

/// Cascades deeper than this are cut off.
pub const MAX_CASCADE_DEPTH: u32 = 64;
/// Upper bound on triggers resolved for a single action.
pub const MAX_TRIGGERS_PER_ACTION: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerKind {
    PlayedResource,
    CardDied,
    CardAttacked,
    CardPlayed,
    CardDrawn,
    RevivedCard,
    ProtectionDestroyed,
    HeroCharged,
    HeroPowerUsed,
}

/// Something that happened and that cards on the field may react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub kind: TriggerKind,
    /// Side the trigger is anchored on; its field reacts first.
    pub side: Side,
    /// The cause.
    pub origin: Source,
    /// The card (or hero) the trigger is about.
    pub self_id: Source,
}

impl Trigger {
    pub fn new(kind: TriggerKind, side: Side, origin: Source, self_id: Source) -> Self {
        Self {
            kind,
            side,
            origin,
            self_id,
        }
    }

    /// Trigger caused by and about a single card.
    pub fn for_card(kind: TriggerKind, side: Side, card: CardId) -> Self {
        Self::new(kind, side, Source::Card(card), Source::Card(card))
    }
}

/// Resolves `trigger` across the whole board, then recursively resolves whatever the
/// reactions emitted.
///
/// Creatures on the anchoring side's field react first, then the opponent's, in field
/// order. Each reaction sees the state left by the previous one. Only once the whole board
/// has answered are the emitted triggers resolved, one after the other.
pub fn process_trigger(state: &mut GameState, trigger: Trigger) -> Result<(), GameError> {
    resolve(state, trigger, 0)
}

/// Resolves several root triggers in order.
pub fn process_triggers(state: &mut GameState, triggers: Vec<Trigger>) -> Result<(), GameError> {
    for trigger in triggers {
        process_trigger(state, trigger)?;
    }
    Ok(())
}

fn resolve(state: &mut GameState, trigger: Trigger, depth: u32) -> Result<(), GameError> {
    if depth > MAX_CASCADE_DEPTH || state.triggers.len() >= MAX_TRIGGERS_PER_ACTION {
        logger!(
            WARN,
            "[MATCH] Trigger cascade cut off at depth {depth} ({} triggers resolved)",
            state.triggers.len()
        );
        return Ok(());
    }
    state.record_trigger(trigger, depth);

    let board: Vec<(Side, CardId)> = [trigger.side, trigger.side.opponent()]
        .into_iter()
        .flat_map(|side| {
            state
                .player(side)
                .field
                .iter()
                .map(move |card| (side, *card))
        })
        .collect();

    let mut emitted = Vec::new();
    for (owner, card) in board {
        let effect = state.card(card)?.definition.effect;
        if !effect.reacts_to(trigger.kind) {
            continue;
        }
        let ctx = EffectContext {
            side: owner,
            origin: trigger.origin,
            this: Source::Card(card),
            target: None,
        };
        emitted.extend(effect.on_trigger(trigger.kind, state, &ctx)?);
    }

    for next in emitted {
        resolve(state, next, depth + 1)?;
    }
    Ok(())
}
