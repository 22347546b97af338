//! Earned XP: what defeating the roster is worth to a party of a given level.

use serde::{Deserialize, Serialize};
use tm_core::CreatureId;
use tracing::warn;

use crate::roster::Roster;

/// XP for a single creature whose level differs from the party's by `delta`.
///
/// Returns `None` outside the `-4..=4` window the table covers.
pub fn xp_for_level_delta(delta: i32) -> Option<i64> {
    let xp = match delta {
        -4 => 10,
        -3 => 15,
        -2 => 20,
        -1 => 30,
        0 => 40,
        1 => 60,
        2 => 80,
        3 => 120,
        4 => 160,
        _ => return None,
    };
    Some(xp)
}

/// One roster entry's share of the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    /// Catalog id of the creature.
    pub id: CreatureId,
    /// Creature name.
    pub name: String,
    /// Creature level minus party level.
    pub level_delta: i32,
    /// How many of it.
    pub quantity: u32,
    /// XP for one creature; zero when the delta is out of range.
    pub xp_each: i64,
    /// `xp_each * quantity`.
    pub xp: i64,
}

impl Contribution {
    /// Whether the level delta fell outside the XP table.
    pub fn is_out_of_range(&self) -> bool {
        xp_for_level_delta(self.level_delta).is_none()
    }
}

/// Earned XP for a roster, with per-entry detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpBreakdown {
    /// Earned XP over all entries.
    pub total: i64,
    /// One contribution per roster entry, in roster order.
    pub contributions: Vec<Contribution>,
    /// Entries whose level delta fell outside the table. They count for zero.
    pub out_of_range: Vec<Contribution>,
}

impl XpBreakdown {
    /// Whether any creature was too weak or too strong to be scored.
    pub fn has_out_of_range(&self) -> bool {
        !self.out_of_range.is_empty()
    }
}

/// Compute earned XP for every entry of `roster` against `party_level`.
pub fn compute_xp(roster: &Roster, party_level: i32) -> XpBreakdown {
    let mut breakdown = XpBreakdown::default();

    for entry in roster.iter() {
        let creature = entry.creature();
        let level_delta = creature.level.saturating_sub(party_level);
        let xp_each = match xp_for_level_delta(level_delta) {
            Some(xp) => xp,
            None => {
                warn!(
                    creature = %creature.name,
                    level = creature.level,
                    party_level,
                    level_delta,
                    "level difference outside XP table, counting as 0 XP"
                );
                0
            }
        };
        let xp = xp_each * i64::from(entry.quantity());
        let contribution = Contribution {
            id: entry.id(),
            name: creature.name.clone(),
            level_delta,
            quantity: entry.quantity(),
            xp_each,
            xp,
        };

        breakdown.total += xp;
        if contribution.is_out_of_range() {
            breakdown.out_of_range.push(contribution.clone());
        }
        breakdown.contributions.push(contribution);
    }

    breakdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tm_core::Creature;

    fn roster_of(creatures: &[(u64, i32, u32)]) -> Roster {
        let mut roster = Roster::new();
        for &(id, level, quantity) in creatures {
            let creature = Arc::new(Creature::new(id, format!("Creature {id}"), level));
            for _ in 0..quantity {
                roster.add(Arc::clone(&creature));
            }
        }
        roster
    }

    #[test]
    fn table_values() {
        let expected = [
            (-4, 10),
            (-3, 15),
            (-2, 20),
            (-1, 30),
            (0, 40),
            (1, 60),
            (2, 80),
            (3, 120),
            (4, 160),
        ];
        for (delta, xp) in expected {
            assert_eq!(xp_for_level_delta(delta), Some(xp), "delta {delta}");
        }
        assert_eq!(xp_for_level_delta(-5), None);
        assert_eq!(xp_for_level_delta(5), None);
    }

    #[test]
    fn three_equal_level_creatures() {
        let roster = roster_of(&[(1, 1, 3)]);
        let breakdown = compute_xp(&roster, 1);
        assert_eq!(breakdown.total, 120);
        assert_eq!(breakdown.contributions[0].xp_each, 40);
        assert_eq!(breakdown.contributions[0].quantity, 3);
    }

    #[test]
    fn single_creature_four_levels_up() {
        let roster = roster_of(&[(1, 5, 1)]);
        assert_eq!(compute_xp(&roster, 1).total, 160);
    }

    #[test]
    fn mixed_roster_sums() {
        let roster = roster_of(&[(1, -1, 2), (2, 3, 1)]);
        // Party level 2: deltas -3 and +1.
        let breakdown = compute_xp(&roster, 2);
        assert_eq!(breakdown.total, 2 * 15 + 60);
        assert_eq!(breakdown.contributions.len(), 2);
        assert!(!breakdown.has_out_of_range());
    }

    #[test]
    fn out_of_range_counts_zero_and_is_reported() {
        let roster = roster_of(&[(1, 10, 2), (2, 1, 1)]);
        let breakdown = compute_xp(&roster, 1);
        assert_eq!(breakdown.total, 40);
        assert_eq!(breakdown.out_of_range.len(), 1);
        assert_eq!(breakdown.out_of_range[0].id, CreatureId(1));
        assert_eq!(breakdown.out_of_range[0].level_delta, 9);
        assert_eq!(breakdown.out_of_range[0].xp, 0);
    }

    #[test]
    fn empty_roster_is_zero() {
        let breakdown = compute_xp(&Roster::new(), 3);
        assert_eq!(breakdown.total, 0);
        assert!(breakdown.contributions.is_empty());
    }
}
