//! Derived values and the order they are recomputed in.
//!
//! ```text
//! party size ──► budget ──┐
//!                         ├──► difficulty
//! roster ──┐              │
//!          ├──► earned XP ┘
//! party level
//! ```
//!
//! A mutation reports what it touched through [`Changes`]; only the
//! downstream nodes are recomputed, and difficulty always reads the latest
//! budget and XP.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::budget::{XpBudget, compute_budget};
use crate::difficulty::{Tier, classify};
use crate::error::EncounterResult;
use crate::party::PartyConfig;
use crate::roster::Roster;
use crate::xp::{XpBreakdown, compute_xp};

/// Which inputs a completed mutation changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    /// Party size changed.
    pub party_size: bool,
    /// Party level changed.
    pub party_level: bool,
    /// Roster contents changed.
    pub roster: bool,
}

impl Changes {
    /// Nothing changed.
    pub const NONE: Changes = Changes {
        party_size: false,
        party_level: false,
        roster: false,
    };

    /// Every input changed.
    pub const ALL: Changes = Changes {
        party_size: true,
        party_level: true,
        roster: true,
    };

    /// Only the roster.
    pub fn roster() -> Self {
        Self {
            roster: true,
            ..Self::NONE
        }
    }

    /// Only the party size.
    pub fn party_size() -> Self {
        Self {
            party_size: true,
            ..Self::NONE
        }
    }

    /// Only the party level.
    pub fn party_level() -> Self {
        Self {
            party_level: true,
            ..Self::NONE
        }
    }

    /// Both party inputs, as when switching between saved and manual party.
    pub fn party() -> Self {
        Self {
            party_size: true,
            party_level: true,
            roster: false,
        }
    }

    /// Whether no input changed.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

impl std::ops::BitOr for Changes {
    type Output = Changes;

    fn bitor(self, rhs: Self) -> Self::Output {
        Changes {
            party_size: self.party_size || rhs.party_size,
            party_level: self.party_level || rhs.party_level,
            roster: self.roster || rhs.roster,
        }
    }
}

/// A consistent snapshot of every derived value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// XP thresholds for the party size.
    pub budget: XpBudget,
    /// Earned XP for the roster at the party level.
    pub xp: XpBreakdown,
    /// Tier of the earned XP against the budget.
    pub difficulty: Tier,
}

impl Assessment {
    /// Earned XP total.
    pub fn total_xp(&self) -> i64 {
        self.xp.total
    }
}

/// Compute an assessment from scratch.
pub fn assess(roster: &Roster, party: &PartyConfig) -> EncounterResult<Assessment> {
    let budget = compute_budget(party.effective_size())?;
    let xp = compute_xp(roster, party.effective_level());
    let difficulty = classify(xp.total, &budget);
    Ok(Assessment {
        budget,
        xp,
        difficulty,
    })
}

/// Cached derived values, recomputed selectively.
#[derive(Debug, Clone)]
pub struct Derived {
    current: Assessment,
}

impl Derived {
    /// Compute every node.
    pub fn new(roster: &Roster, party: &PartyConfig) -> EncounterResult<Self> {
        Ok(Self {
            current: assess(roster, party)?,
        })
    }

    /// The latest snapshot.
    pub fn current(&self) -> &Assessment {
        &self.current
    }

    /// Recompute the nodes downstream of `changes`.
    ///
    /// A failed budget computation leaves the previous snapshot untouched.
    /// Returns whether the difficulty node was recomputed.
    pub fn recompute(
        &mut self,
        changes: Changes,
        roster: &Roster,
        party: &PartyConfig,
    ) -> EncounterResult<bool> {
        let budget = if changes.party_size {
            Some(compute_budget(party.effective_size())?)
        } else {
            None
        };
        let xp = if changes.roster || changes.party_level {
            Some(compute_xp(roster, party.effective_level()))
        } else {
            None
        };

        if budget.is_none() && xp.is_none() {
            return Ok(false);
        }
        if let Some(budget) = budget {
            debug!(party_size = party.effective_size(), "budget recomputed");
            self.current.budget = budget;
        }
        if let Some(xp) = xp {
            debug!(total = xp.total, "earned xp recomputed");
            self.current.xp = xp;
        }
        self.current.difficulty = classify(self.current.xp.total, &self.current.budget);
        debug!(difficulty = %self.current.difficulty, "difficulty recomputed");
        Ok(true)
    }
}
