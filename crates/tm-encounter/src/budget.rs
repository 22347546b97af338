//! XP budget: the thresholds that separate threat tiers for a party.

use serde::{Deserialize, Serialize};

use crate::difficulty::Tier;
use crate::error::{EncounterError, EncounterResult};

/// Party size the base thresholds are written for.
const BASE_PARTY_SIZE: i64 = 4;

/// XP thresholds for each threat tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpBudget {
    /// Lowest threshold; anything below `low` is trivial.
    pub trivial: i64,
    /// XP at which the encounter becomes low threat.
    pub low: i64,
    /// XP at which it becomes moderate.
    pub moderate: i64,
    /// XP at which it becomes severe.
    pub severe: i64,
    /// XP at which it becomes extreme.
    pub extreme: i64,
}

impl XpBudget {
    /// Threshold for a tier.
    pub fn threshold(&self, tier: Tier) -> i64 {
        match tier {
            Tier::Trivial => self.trivial,
            Tier::Low => self.low,
            Tier::Moderate => self.moderate,
            Tier::Severe => self.severe,
            Tier::Extreme => self.extreme,
        }
    }

    /// (tier, threshold) pairs from trivial to extreme.
    pub fn tiers(&self) -> impl Iterator<Item = (Tier, i64)> + '_ {
        Tier::ALL.into_iter().map(|t| (t, self.threshold(t)))
    }
}

/// Compute the XP budget for a party.
///
/// Above one member the thresholds grow linearly from the four-member
/// baseline. A lone character gets a fixed table, because the linear formula
/// collapses trivial and low at that size.
pub fn compute_budget(party_size: u32) -> EncounterResult<XpBudget> {
    match party_size {
        0 => Err(EncounterError::InvalidPartySize(party_size)),
        1 => Ok(XpBudget {
            trivial: 5,
            low: 10,
            moderate: 20,
            severe: 30,
            extreme: 40,
        }),
        n => {
            let adjustment = i64::from(n) - BASE_PARTY_SIZE;
            Ok(XpBudget {
                trivial: 40 + 10 * adjustment,
                low: 60 + 20 * adjustment,
                moderate: 80 + 20 * adjustment,
                severe: 120 + 30 * adjustment,
                extreme: 160 + 40 * adjustment,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn party_of_four_is_baseline() {
        let budget = compute_budget(4).unwrap();
        assert_eq!(
            budget,
            XpBudget {
                trivial: 40,
                low: 60,
                moderate: 80,
                severe: 120,
                extreme: 160,
            }
        );
    }

    #[test]
    fn larger_and_smaller_parties() {
        let five = compute_budget(5).unwrap();
        assert_eq!(
            (five.trivial, five.low, five.moderate, five.severe, five.extreme),
            (50, 80, 100, 150, 200)
        );

        let two = compute_budget(2).unwrap();
        assert_eq!(
            (two.trivial, two.low, two.moderate, two.severe, two.extreme),
            (20, 20, 40, 60, 80)
        );
    }

    #[test]
    fn solo_uses_fixed_table() {
        let solo = compute_budget(1).unwrap();
        assert_eq!(
            solo.tiers().map(|(_, xp)| xp).collect::<Vec<_>>(),
            vec![5, 10, 20, 30, 40]
        );
    }

    #[test]
    fn zero_rejected() {
        assert!(matches!(
            compute_budget(0),
            Err(EncounterError::InvalidPartySize(0))
        ));
    }

    #[test]
    fn threshold_lookup() {
        let budget = compute_budget(6).unwrap();
        assert_eq!(budget.threshold(Tier::Moderate), 120);
        assert_eq!(budget.threshold(Tier::Extreme), 240);
    }

    #[test]
    fn thresholds_never_decrease_with_severity() {
        for size in 1..=12 {
            let budget = compute_budget(size).unwrap();
            let values: Vec<i64> = budget.tiers().map(|(_, xp)| xp).collect();
            assert!(values.windows(2).all(|w| w[0] <= w[1]), "size {size}: {values:?}");
        }
    }
}
