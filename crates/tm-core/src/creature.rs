use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Resistance key meaning the creature resists every damage type.
pub const ALL_DAMAGE: &str = "all-damage";

/// Unique identifier for a creature template, assigned by the catalog owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreatureId(pub u64);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for CreatureId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Saving throw modifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Saves {
    /// Fortitude save modifier.
    pub fortitude: i32,
    /// Reflex save modifier.
    pub reflex: i32,
    /// Will save modifier.
    pub will: i32,
}

/// Armor class and saves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Defenses {
    /// Armor class.
    pub armor_class: i32,
    /// Saving throw modifiers.
    #[serde(default)]
    pub saves: Saves,
}

/// A weapon or natural attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attack {
    /// Attack name, e.g. `"Jaws"`.
    pub name: String,
    /// Bonus added to the attack roll.
    #[serde(rename = "attackBonus")]
    pub attack_bonus: i32,
    /// Damage expression, e.g. `"1d8+4"`.
    pub damage: String,
    /// Damage type dealt, e.g. `"piercing"`.
    #[serde(rename = "damageType")]
    pub damage_type: String,
}

/// A damaging spell the creature can cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    /// Spell name.
    pub name: String,
    /// Spell rank. Defaults to 0 for cantrips.
    #[serde(default)]
    pub level: u32,
    /// Damage expression, if the spell deals damage.
    #[serde(default)]
    pub damage_roll: Option<String>,
    /// Damage type, if the spell deals damage.
    #[serde(default)]
    pub damage_type: Option<String>,
    /// The save the target rolls against, if any (e.g. `"reflex"`).
    #[serde(default)]
    pub save: Option<String>,
}

/// Everything a creature can do on its turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actions {
    /// Weapon and natural attacks.
    #[serde(default)]
    pub attacks: Vec<Attack>,
    /// Damaging spells.
    #[serde(default)]
    pub spells: Vec<Spell>,
}

/// An immutable creature template from the catalog.
///
/// Templates are shared between the catalog and any number of roster entries
/// (usually behind an `Arc`), so nothing about an encounter is ever stored
/// here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    /// Unique identifier for this creature.
    pub id: CreatureId,
    /// Display name.
    pub name: String,
    /// Creature level. Can be negative for very weak creatures.
    pub level: i32,
    /// Traits in the order the source lists them (size, type, family, ...).
    #[serde(default)]
    pub traits: Vec<String>,
    /// Damage types and conditions the creature ignores.
    #[serde(default)]
    pub immunities: BTreeSet<String>,
    /// Damage type to extra damage taken.
    #[serde(default)]
    pub weaknesses: BTreeMap<String, i32>,
    /// Damage type to damage reduction. [`ALL_DAMAGE`] covers every type.
    #[serde(default)]
    pub resistances: BTreeMap<String, i32>,
    /// Perception modifier.
    #[serde(default)]
    pub perception: i32,
    /// Hit points at full health.
    #[serde(default)]
    pub max_hit_points: i32,
    /// Land speed in feet.
    #[serde(default)]
    pub speed: i32,
    /// Armor class and saves.
    #[serde(default)]
    pub defenses: Defenses,
    /// Skill name to modifier.
    #[serde(default)]
    pub skills: BTreeMap<String, i32>,
    /// Attribute name to modifier.
    #[serde(default)]
    pub attribute_modifiers: BTreeMap<String, i32>,
    /// Attacks and spells.
    #[serde(default)]
    pub actions: Actions,
}

impl Creature {
    /// Create a bare template with the given identity and level.
    pub fn new(id: impl Into<CreatureId>, name: impl Into<String>, level: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            traits: Vec::new(),
            immunities: BTreeSet::new(),
            weaknesses: BTreeMap::new(),
            resistances: BTreeMap::new(),
            perception: 0,
            max_hit_points: 0,
            speed: 0,
            defenses: Defenses::default(),
            skills: BTreeMap::new(),
            attribute_modifiers: BTreeMap::new(),
            actions: Actions::default(),
        }
    }

    /// Replace the trait list. Duplicates are dropped, first occurrence wins.
    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits.clear();
        for t in traits {
            let t = t.into();
            if !self.traits.contains(&t) {
                self.traits.push(t);
            }
        }
        self
    }

    /// Add immunities.
    pub fn with_immunities<I, S>(mut self, immunities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.immunities.extend(immunities.into_iter().map(Into::into));
        self
    }

    /// Add a weakness.
    pub fn with_weakness(mut self, keyword: impl Into<String>, amount: i32) -> Self {
        self.weaknesses.insert(keyword.into(), amount);
        self
    }

    /// Add a resistance. Use [`ALL_DAMAGE`] for blanket resistance.
    pub fn with_resistance(mut self, keyword: impl Into<String>, amount: i32) -> Self {
        self.resistances.insert(keyword.into(), amount);
        self
    }

    /// Whether `keyword` is one of the creature's traits.
    pub fn has_trait(&self, keyword: &str) -> bool {
        self.traits.iter().any(|t| t == keyword)
    }

    /// Whether the creature is immune to `keyword`.
    pub fn is_immune_to(&self, keyword: &str) -> bool {
        self.immunities.contains(keyword)
    }

    /// Whether the creature lists a weakness to `keyword`.
    pub fn has_weakness(&self, keyword: &str) -> bool {
        self.weaknesses.contains_key(keyword)
    }

    /// Whether the creature lists this exact resistance key.
    ///
    /// Does not consider [`ALL_DAMAGE`]; see [`Creature::resists_all_damage`].
    pub fn has_resistance(&self, keyword: &str) -> bool {
        self.resistances.contains_key(keyword)
    }

    /// Whether the creature resists every damage type.
    pub fn resists_all_damage(&self) -> bool {
        self.resistances.contains_key(ALL_DAMAGE)
    }
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (level {})", self.name, self.level)
    }
}
