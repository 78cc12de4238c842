use crate::game::entity::card::{EffectContext, EffectResult, Effectful};
use crate::game::entity::hero::HeroDefinition;
use crate::game::game_state::GameState;
use crate::game::triggers::{Trigger, TriggerKind};

use super::keywords::revive;

pub static KING: HeroDefinition = HeroDefinition {
    name: "King",
    description: "Give all your creatures +10 power.",
    required_charges: 4,
    effect: &KingPower,
};

pub static WARLOCK: HeroDefinition = HeroDefinition {
    name: "Warlock",
    description: "[revive] 2",
    required_charges: 2,
    effect: &WarlockPower,
};

struct KingPower;

impl Effectful for KingPower {
    fn on_play(&self, state: &mut GameState, ctx: &EffectContext) -> EffectResult {
        for card in state.player(ctx.side).field.clone() {
            state.card_mut(card)?.power += 10;
        }
        Ok(vec![Trigger::new(
            TriggerKind::HeroPowerUsed,
            ctx.side,
            ctx.this,
            ctx.this,
        )])
    }
}

struct WarlockPower;

impl Effectful for WarlockPower {
    fn on_play(&self, state: &mut GameState, ctx: &EffectContext) -> EffectResult {
        let mut triggers = vec![Trigger::new(
            TriggerKind::HeroPowerUsed,
            ctx.side,
            ctx.this,
            ctx.this,
        )];
        triggers.extend(revive(state, ctx.side, ctx.this, 2)?);
        Ok(triggers)
    }
}
