//! Threat tiers and classification of earned XP against a budget.

use serde::{Deserialize, Serialize};

use crate::budget::XpBudget;

/// How threatening an encounter is, from least to most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Below the low threshold.
    Trivial,
    /// At least the low threshold.
    Low,
    /// At least the moderate threshold.
    Moderate,
    /// At least the severe threshold.
    Severe,
    /// At least the extreme threshold.
    Extreme,
}

impl Tier {
    /// All tiers in ascending order of threat.
    pub const ALL: [Tier; 5] = [
        Tier::Trivial,
        Tier::Low,
        Tier::Moderate,
        Tier::Severe,
        Tier::Extreme,
    ];

    /// Title-case name for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trivial => "Trivial",
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
            Self::Extreme => "Extreme",
        }
    }

    /// What running an encounter of this tier is like for the party.
    pub fn description(self) -> &'static str {
        match self {
            Self::Trivial => {
                "Trivial-threat encounters are so easy that the characters have almost no \
                 chance of losing and rarely spend significant resources unless wasteful; \
                 they work best as warm-ups, palate cleansers, or reminders of the \
                 characters' power."
            }
            Self::Low => {
                "Low-threat encounters offer a surface-level challenge that may use some of \
                 the party's resources but rarely endanger the entire group unless they use \
                 very poor tactics."
            }
            Self::Moderate => {
                "Moderate-threat encounters pose a serious challenge that requires sound \
                 tactics and resource management, though the characters are still unlikely \
                 to be completely overpowered."
            }
            Self::Severe => {
                "Severe-threat encounters are among the toughest battles a group can win, \
                 suited for major story moments like boss fights, where poor tactics or bad \
                 luck could easily lead to death or retreat."
            }
            Self::Extreme => {
                "Extreme-threat encounters are nearly even matches for the characters and \
                 should be used sparingly, typically for climactic finales or highly skilled \
                 groups, since they carry a real risk of a total party defeat."
            }
        }
    }

    /// Parse a tier name (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trivial" => Some(Self::Trivial),
            "low" => Some(Self::Low),
            "moderate" => Some(Self::Moderate),
            "severe" => Some(Self::Severe),
            "extreme" => Some(Self::Extreme),
            _ => None,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trivial => write!(f, "trivial"),
            Self::Low => write!(f, "low"),
            Self::Moderate => write!(f, "moderate"),
            Self::Severe => write!(f, "severe"),
            Self::Extreme => write!(f, "extreme"),
        }
    }
}

/// Classify earned XP against a budget.
///
/// Each tier is a half-open interval starting at its own threshold. The
/// trivial threshold itself is never consulted: anything below `low` is
/// trivial, including zero.
pub fn classify(xp: i64, budget: &XpBudget) -> Tier {
    if xp < budget.low {
        Tier::Trivial
    } else if xp < budget.moderate {
        Tier::Low
    } else if xp < budget.severe {
        Tier::Moderate
    } else if xp < budget.extreme {
        Tier::Severe
    } else {
        Tier::Extreme
    }
}
