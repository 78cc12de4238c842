use crate::game::entity::card::CardId;

/// Result of a group of creatures attacking a single defending creature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatOutcome {
    pub attack_power: i32,
    /// Attackers that die, in selection order.
    pub dying_attackers: Vec<CardId>,
    pub defender_dies: bool,
}

/// Every attacker no stronger than the defender dies. The defender only survives when it is
/// strictly stronger than the attackers' combined power.
pub fn resolve_combat(attackers: &[(CardId, i32)], defender_power: i32) -> CombatOutcome {
    let attack_power: i32 = attackers.iter().map(|(_, power)| power).sum();
    let dying_attackers = attackers
        .iter()
        .filter(|(_, power)| *power <= defender_power)
        .map(|(card, _)| *card)
        .collect();

    CombatOutcome {
        attack_power,
        dying_attackers,
        defender_dies: defender_power <= attack_power,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_kills_defender() {
        let outcome = resolve_combat(&[(CardId(1), 10), (CardId(2), 20)], 30);
        assert_eq!(outcome.attack_power, 30);
        assert!(outcome.defender_dies);
        assert_eq!(outcome.dying_attackers, vec![CardId(1), CardId(2)]);
    }

    #[test]
    fn test_one_short_defender_survives() {
        let outcome = resolve_combat(&[(CardId(1), 10), (CardId(2), 19)], 30);
        assert_eq!(outcome.attack_power, 29);
        assert!(!outcome.defender_dies);
        assert_eq!(outcome.dying_attackers, vec![CardId(1), CardId(2)]);
    }

    #[test]
    fn test_strong_attacker_survives_weak_defender() {
        let outcome = resolve_combat(&[(CardId(1), 20), (CardId(2), 10)], 10);
        assert!(outcome.defender_dies);
        assert_eq!(outcome.dying_attackers, vec![CardId(2)]);
    }

    #[test]
    fn test_defender_can_win_and_lose_attackers() {
        let outcome = resolve_combat(&[(CardId(1), 10), (CardId(2), 40)], 20);
        assert!(outcome.defender_dies);
        assert_eq!(outcome.dying_attackers, vec![CardId(1)]);

        let outcome = resolve_combat(&[(CardId(1), 10)], 40);
        assert!(!outcome.defender_dies);
        assert_eq!(outcome.dying_attackers, vec![CardId(1)]);
    }
}
