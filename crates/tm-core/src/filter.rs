use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::creature::Creature;

/// Default lower bound of the level filter.
pub const DEFAULT_MIN_LEVEL: i32 = -1;
/// Default upper bound of the level filter. Templates above it stay hidden
/// until the range is widened.
pub const DEFAULT_MAX_LEVEL: i32 = 25;

/// How the keywords of one filter group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// At least one selected keyword must be present (OR).
    #[default]
    Any,
    /// Every selected keyword must be present (AND).
    All,
}

impl From<bool> for MatchMode {
    /// `true` means "match all", matching the toggle in the filter form.
    fn from(match_all: bool) -> Self {
        if match_all { Self::All } else { Self::Any }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::All => write!(f, "all"),
        }
    }
}

/// One keyword group (traits, immunities, weaknesses, or resistances).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordFilter {
    /// Selected keywords. Empty means the group does not filter.
    pub keywords: Vec<String>,
    /// How the selected keywords combine.
    pub mode: MatchMode,
}

impl KeywordFilter {
    /// A group with the given keywords and match mode.
    pub fn new<I, S>(keywords: I, mode: MatchMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    /// An empty group places no constraint on the result, whatever its mode.
    pub fn is_active(&self) -> bool {
        !self.keywords.is_empty()
    }

    /// Test the group against a membership predicate.
    pub fn matches(&self, present: impl Fn(&str) -> bool) -> bool {
        if !self.is_active() {
            return true;
        }
        match self.mode {
            MatchMode::Any => self.keywords.iter().any(|k| present(k.as_str())),
            MatchMode::All => self.keywords.iter().all(|k| present(k.as_str())),
        }
    }
}

/// Criteria for narrowing down the creature catalog.
///
/// All parts combine with AND. Inactive keyword groups are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the creature name.
    pub name: String,
    /// Inclusive lower level bound.
    pub min_level: i32,
    /// Inclusive upper level bound.
    pub max_level: i32,
    /// Trait keywords.
    pub traits: KeywordFilter,
    /// Immunity keywords.
    pub immunities: KeywordFilter,
    /// Weakness keywords.
    pub weaknesses: KeywordFilter,
    /// Resistance keywords. A creature resisting [`ALL_DAMAGE`](crate::creature::ALL_DAMAGE) matches any.
    pub resistances: KeywordFilter,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            name: String::new(),
            min_level: DEFAULT_MIN_LEVEL,
            max_level: DEFAULT_MAX_LEVEL,
            traits: KeywordFilter::default(),
            immunities: KeywordFilter::default(),
            weaknesses: KeywordFilter::default(),
            resistances: KeywordFilter::default(),
        }
    }
}

impl FilterCriteria {
    /// Criteria that let every creature through except by level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a single creature passes every active constraint.
    pub fn matches(&self, creature: &Creature) -> bool {
        if !self.name.is_empty()
            && !creature
                .name
                .to_lowercase()
                .contains(&self.name.to_lowercase())
        {
            return false;
        }

        if creature.level < self.min_level || creature.level > self.max_level {
            return false;
        }

        if !self.traits.matches(|k| creature.has_trait(k)) {
            return false;
        }

        if !self.immunities.matches(|k| creature.is_immune_to(k)) {
            return false;
        }

        if !self.weaknesses.matches(|k| creature.has_weakness(k)) {
            return false;
        }

        // Blanket resistance satisfies the group in either mode
        if self.resistances.is_active() && creature.resists_all_damage() {
            return true;
        }
        self.resistances.matches(|k| creature.has_resistance(k))
    }
}

/// Return the creatures that pass `criteria`, in their original order.
pub fn filter(creatures: &[Arc<Creature>], criteria: &FilterCriteria) -> Vec<Arc<Creature>> {
    creatures
        .iter()
        .filter(|c| criteria.matches(c))
        .cloned()
        .collect()
}

/// A builder for filtering and searching creatures in a catalog.
pub struct CatalogQuery<'c> {
    catalog: &'c Catalog,
    criteria: FilterCriteria,
    limit: Option<usize>,
    offset: usize,
}

impl<'c> CatalogQuery<'c> {
    /// Start a query with default criteria over `catalog`.
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            criteria: FilterCriteria::default(),
            limit: None,
            offset: 0,
        }
    }

    /// Start from existing criteria instead of the defaults.
    pub fn criteria(mut self, criteria: FilterCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    /// Filter to creatures whose name contains the given substring (case-insensitive).
    pub fn name_contains(mut self, s: impl Into<String>) -> Self {
        self.criteria.name = s.into();
        self
    }

    /// Restrict to an inclusive level range.
    pub fn levels(mut self, min: i32, max: i32) -> Self {
        self.criteria.min_level = min;
        self.criteria.max_level = max;
        self
    }

    /// Require a trait. Combined according to [`CatalogQuery::trait_mode`].
    pub fn with_trait(mut self, keyword: impl Into<String>) -> Self {
        self.criteria.traits.keywords.push(keyword.into());
        self
    }

    /// Whether all required traits must match or any one.
    pub fn trait_mode(mut self, mode: MatchMode) -> Self {
        self.criteria.traits.mode = mode;
        self
    }

    /// Require an immunity.
    pub fn with_immunity(mut self, keyword: impl Into<String>) -> Self {
        self.criteria.immunities.keywords.push(keyword.into());
        self
    }

    /// Whether all required immunities must match or any one.
    pub fn immunity_mode(mut self, mode: MatchMode) -> Self {
        self.criteria.immunities.mode = mode;
        self
    }

    /// Require a weakness.
    pub fn with_weakness(mut self, keyword: impl Into<String>) -> Self {
        self.criteria.weaknesses.keywords.push(keyword.into());
        self
    }

    /// Whether all required weaknesses must match or any one.
    pub fn weakness_mode(mut self, mode: MatchMode) -> Self {
        self.criteria.weaknesses.mode = mode;
        self
    }

    /// Require a resistance.
    pub fn with_resistance(mut self, keyword: impl Into<String>) -> Self {
        self.criteria.resistances.keywords.push(keyword.into());
        self
    }

    /// Whether all required resistances must match or any one.
    pub fn resistance_mode(mut self, mode: MatchMode) -> Self {
        self.criteria.resistances.mode = mode;
        self
    }

    /// Limit the number of results.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Skip the first N results.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = n;
        self
    }

    /// The criteria this query has accumulated so far.
    pub fn build(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Execute the query and return matching creatures.
    pub fn execute(self) -> Vec<Arc<Creature>> {
        let matches = self
            .catalog
            .iter()
            .filter(|c| self.criteria.matches(c))
            .skip(self.offset);
        match self.limit {
            Some(limit) => matches.take(limit).cloned().collect(),
            None => matches.cloned().collect(),
        }
    }

    /// Count matching creatures without collecting them.
    pub fn count(self) -> usize {
        self.catalog
            .iter()
            .filter(|c| self.criteria.matches(c))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::ALL_DAMAGE;

    fn names(creatures: &[Arc<Creature>]) -> Vec<&str> {
        creatures.iter().map(|c| c.name.as_str()).collect()
    }

    fn trait_catalog() -> Catalog {
        Catalog::from_creatures([
            Creature::new(1, "Alpha", 1).with_traits(["A"]),
            Creature::new(2, "Both", 1).with_traits(["A", "B"]),
            Creature::new(3, "Beta", 1).with_traits(["B"]),
        ])
        .unwrap()
    }

    fn bestiary() -> Catalog {
        Catalog::from_creatures([
            Creature::new(1, "Goblin Warrior", -1)
                .with_traits(["small", "goblin", "humanoid"])
                .with_weakness("cold-iron", 2),
            Creature::new(2, "Skeleton Guard", -1)
                .with_traits(["medium", "skeleton", "undead", "mindless"])
                .with_immunities(["death-effects", "disease", "poison"])
                .with_weakness("holy", 5)
                .with_resistance("cold", 5)
                .with_resistance("piercing", 5),
            Creature::new(3, "Ghost Commoner", 4)
                .with_traits(["medium", "ghost", "incorporeal", "spirit", "undead"])
                .with_immunities(["death-effects", "disease", "poison", "precision"])
                .with_weakness("holy", 5)
                .with_resistance(ALL_DAMAGE, 5),
            Creature::new(4, "Wolf", 1).with_traits(["medium", "animal"]),
            Creature::new(5, "Young Red Dragon", 10)
                .with_traits(["large", "dragon", "fire"])
                .with_immunities(["fire", "paralyzed", "sleep"])
                .with_weakness("cold", 10),
        ])
        .unwrap()
    }

    #[test]
    fn any_mode_is_or() {
        let catalog = trait_catalog();
        let mut criteria = FilterCriteria::new();
        criteria.traits = KeywordFilter::new(["A", "B"], MatchMode::Any);
        assert_eq!(names(&catalog.filter(&criteria)), vec!["Alpha", "Both", "Beta"]);
    }

    #[test]
    fn all_mode_is_and() {
        let catalog = trait_catalog();
        let mut criteria = FilterCriteria::new();
        criteria.traits = KeywordFilter::new(["A", "B"], MatchMode::All);
        assert_eq!(names(&catalog.filter(&criteria)), vec!["Both"]);
    }

    #[test]
    fn empty_group_ignores_mode() {
        let catalog = trait_catalog();
        let mut criteria = FilterCriteria::new();
        criteria.traits.mode = MatchMode::All;
        criteria.immunities.mode = MatchMode::All;
        assert_eq!(catalog.filter(&criteria).len(), 3);
    }

    #[test]
    fn name_is_case_insensitive_substring() {
        let catalog = bestiary();
        let results = catalog.query().name_contains("WARRIOR").execute();
        assert_eq!(names(&results), vec!["Goblin Warrior"]);
        assert_eq!(catalog.query().name_contains("").count(), 5);
    }

    #[test]
    fn default_range_covers_ruleset_levels() {
        let catalog = bestiary();
        assert_eq!(catalog.filter(&FilterCriteria::default()).len(), 5);
    }

    #[test]
    fn level_bounds_are_inclusive() {
        let catalog = bestiary();
        let results = catalog.query().levels(-1, 1).execute();
        assert_eq!(
            names(&results),
            vec!["Goblin Warrior", "Skeleton Guard", "Wolf"]
        );
        assert!(catalog.query().levels(2, 3).execute().is_empty());
        assert!(catalog.query().levels(5, 1).execute().is_empty());
    }

    #[test]
    fn immunities_all_and_any() {
        let catalog = bestiary();
        let all = catalog
            .query()
            .with_immunity("poison")
            .with_immunity("precision")
            .immunity_mode(MatchMode::All)
            .execute();
        assert_eq!(names(&all), vec!["Ghost Commoner"]);

        let any = catalog
            .query()
            .with_immunity("fire")
            .with_immunity("precision")
            .execute();
        assert_eq!(names(&any), vec!["Ghost Commoner", "Young Red Dragon"]);
    }

    #[test]
    fn weaknesses_match_on_keys() {
        let catalog = bestiary();
        let results = catalog.query().with_weakness("holy").execute();
        assert_eq!(names(&results), vec!["Skeleton Guard", "Ghost Commoner"]);
    }

    #[test]
    fn resistance_wildcard_passes_any_mode() {
        let catalog = bestiary();
        let results = catalog.query().with_resistance("fire").execute();
        assert_eq!(names(&results), vec!["Ghost Commoner"]);
    }

    #[test]
    fn resistance_wildcard_passes_all_mode() {
        let catalog = bestiary();
        let results = catalog
            .query()
            .with_resistance("fire")
            .with_resistance("cold")
            .resistance_mode(MatchMode::All)
            .execute();
        assert_eq!(names(&results), vec!["Ghost Commoner"]);

        let results = catalog
            .query()
            .with_resistance("cold")
            .with_resistance("piercing")
            .resistance_mode(MatchMode::All)
            .execute();
        assert_eq!(names(&results), vec!["Skeleton Guard", "Ghost Commoner"]);
    }

    #[test]
    fn wildcard_does_not_bypass_other_groups() {
        let catalog = bestiary();
        let results = catalog
            .query()
            .with_resistance("fire")
            .with_trait("animal")
            .execute();
        assert!(results.is_empty());
    }

    #[test]
    fn groups_combine_with_and() {
        let catalog = bestiary();
        let results = catalog
            .query()
            .with_trait("undead")
            .with_weakness("holy")
            .with_immunity("precision")
            .execute();
        assert_eq!(names(&results), vec!["Ghost Commoner"]);
    }

    #[test]
    fn limit_and_offset() {
        let catalog = bestiary();
        let page = catalog.query().offset(1).limit(2).execute();
        assert_eq!(names(&page), vec!["Skeleton Guard", "Ghost Commoner"]);
    }

    #[test]
    fn match_mode_from_bool() {
        assert_eq!(MatchMode::from(false), MatchMode::Any);
        assert_eq!(MatchMode::from(true), MatchMode::All);
        assert_eq!(MatchMode::All.to_string(), "all");
    }

    #[test]
    fn criteria_serde_uses_lowercase_modes() {
        let mut criteria = FilterCriteria::new();
        criteria.resistances = KeywordFilter::new(["fire"], MatchMode::All);
        let json = serde_json::to_string(&criteria).unwrap();
        assert!(json.contains(r#""mode":"all""#));
        let back: FilterCriteria = serde_json::from_str(&json).unwrap();
        assert_eq!(back, criteria);
    }
}
