use crate::game::entity::card::{
    CardDefinition, CardKind, EffectContext, EffectResult, Effectful, Keyword, NoEffect,
};
use crate::game::entity::player::Zone;
use crate::game::game_state::{GameState, Source};
use crate::game::triggers::{Trigger, TriggerKind};
use crate::utils::errors::{ConditionFail, LogicFail};

use super::keywords::revive;

pub static PAWN: CardDefinition = CardDefinition {
    name: "Pawn",
    cost: 1,
    description: "A simple pawn, the great equalizer.",
    kind: CardKind::Creature { power: 10 },
    keywords: &[],
    effect: &NoEffect,
};

pub static ZOMBIE: CardDefinition = CardDefinition {
    name: "Zombie",
    cost: 2,
    description: "It keeps coming.",
    kind: CardKind::Creature { power: 10 },
    keywords: &[],
    effect: &NoEffect,
};

pub static SIREN: CardDefinition = CardDefinition {
    name: "Siren",
    cost: 3,
    description: "Whenever a creature dies, draw a card.",
    kind: CardKind::Creature { power: 20 },
    keywords: &[],
    effect: &SirenEffect,
};

pub static NECROMANCER: CardDefinition = CardDefinition {
    name: "Necromancer",
    cost: 4,
    description: "[revive] 1",
    kind: CardKind::Creature { power: 20 },
    keywords: &[],
    effect: &NecromancerEffect,
};

pub static CHORT: CardDefinition = CardDefinition {
    name: "Chort",
    cost: 5,
    description: "Destroy a creature.",
    kind: CardKind::Creature { power: 20 },
    keywords: &[],
    effect: &ChortEffect,
};

pub static FIRE_LASH: CardDefinition = CardDefinition {
    name: "Fire Lash",
    cost: 3,
    description: "Deal 30",
    kind: CardKind::Spell,
    keywords: &[],
    effect: &FireLashEffect,
};

pub static IMP: CardDefinition = CardDefinition {
    name: "Imp",
    cost: 2,
    description: "Whenever this creature attacks, gain [cowardly].",
    kind: CardKind::Creature { power: 10 },
    keywords: &[],
    effect: &ImpEffect,
};

struct SirenEffect;

impl Effectful for SirenEffect {
    fn reacts_to(&self, kind: TriggerKind) -> bool {
        kind == TriggerKind::CardDied
    }

    fn on_trigger(
        &self,
        _kind: TriggerKind,
        state: &mut GameState,
        ctx: &EffectContext,
    ) -> EffectResult {
        // Its own death does not count.
        if ctx.origin == ctx.this {
            return Ok(Vec::new());
        }
        state.draw_cards(ctx.side, 1);
        Ok(vec![Trigger::new(
            TriggerKind::CardDrawn,
            ctx.side,
            ctx.this,
            ctx.this,
        )])
    }
}

struct NecromancerEffect;

impl Effectful for NecromancerEffect {
    fn on_play(&self, state: &mut GameState, ctx: &EffectContext) -> EffectResult {
        revive(state, ctx.side, ctx.this, 1)
    }
}

struct ChortEffect;

impl Effectful for ChortEffect {
    fn on_play(&self, state: &mut GameState, ctx: &EffectContext) -> EffectResult {
        let Some(target) = ctx.target else {
            return Ok(Vec::new());
        };
        match state.locate(target) {
            Some((side, Zone::Field)) => Ok(vec![state.kill(side, target)?]),
            _ => Ok(Vec::new()),
        }
    }
}

const FIRE_LASH_POWER: i32 = 30;

struct FireLashEffect;

impl Effectful for FireLashEffect {
    fn on_play(&self, state: &mut GameState, ctx: &EffectContext) -> EffectResult {
        let Some(target) = ctx.target else {
            return Ok(Vec::new());
        };
        match state.locate(target) {
            Some((side, Zone::Protection)) => {
                state
                    .player_mut(side)
                    .move_card(target, Zone::Protection, Zone::Hand);
                Ok(vec![Trigger::new(
                    TriggerKind::ProtectionDestroyed,
                    side,
                    Source::Card(target),
                    Source::Card(target),
                )])
            }
            Some((side, Zone::Field)) => {
                if state.card(target)?.power > FIRE_LASH_POWER {
                    return Err(ConditionFail::NotEnoughPower.into());
                }
                Ok(vec![state.kill(side, target)?])
            }
            _ => Err(LogicFail::TargetNotFound.into()),
        }
    }
}

struct ImpEffect;

impl Effectful for ImpEffect {
    fn reacts_to(&self, kind: TriggerKind) -> bool {
        kind == TriggerKind::CardAttacked
    }

    fn on_trigger(
        &self,
        _kind: TriggerKind,
        state: &mut GameState,
        ctx: &EffectContext,
    ) -> EffectResult {
        if ctx.origin != ctx.this {
            return Ok(Vec::new());
        }
        if let Source::Card(id) = ctx.this {
            state.card_mut(id)?.grant(Keyword::Cowardly);
        }
        Ok(Vec::new())
    }
}
