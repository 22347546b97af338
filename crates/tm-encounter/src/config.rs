//! Configuration for an encounter-building session.

use tm_core::filter::{DEFAULT_MAX_LEVEL, DEFAULT_MIN_LEVEL};
use tm_core::FilterCriteria;

use crate::roster::MAX_QUANTITY;

/// Configuration for an encounter session.
#[derive(Debug, Clone)]
pub struct EncounterConfig {
    /// Party size used until the user enters one (at least 1).
    pub party_size: u32,
    /// Party level used until the user enters one.
    pub party_level: i32,
    /// Highest quantity the front end should allow per creature.
    pub max_quantity: u32,
    /// Initial lower level bound of the catalog filter.
    pub min_level: i32,
    /// Initial upper level bound of the catalog filter.
    pub max_level: i32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            party_size: 4,
            party_level: 1,
            max_quantity: MAX_QUANTITY,
            min_level: DEFAULT_MIN_LEVEL,
            max_level: DEFAULT_MAX_LEVEL,
        }
    }
}

impl EncounterConfig {
    /// Set the starting party size.
    pub fn with_party_size(mut self, size: u32) -> Self {
        self.party_size = size;
        self
    }

    /// Set the starting party level.
    pub fn with_party_level(mut self, level: i32) -> Self {
        self.party_level = level;
        self
    }

    /// Set the per-creature quantity cap shown to users (at least 1).
    pub fn with_max_quantity(mut self, max: u32) -> Self {
        self.max_quantity = max.max(1);
        self
    }

    /// Set the initial filter level range. Bounds are swapped if reversed.
    pub fn with_level_range(mut self, min: i32, max: i32) -> Self {
        self.min_level = min.min(max);
        self.max_level = min.max(max);
        self
    }

    /// Filter criteria a fresh session starts with.
    pub fn initial_filter(&self) -> FilterCriteria {
        FilterCriteria {
            min_level: self.min_level,
            max_level: self.max_level,
            ..FilterCriteria::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = EncounterConfig::default();
        assert_eq!(cfg.party_size, 4);
        assert_eq!(cfg.party_level, 1);
        assert_eq!(cfg.max_quantity, 25);
        assert_eq!((cfg.min_level, cfg.max_level), (-1, 25));
    }

    #[test]
    fn builder_methods() {
        let cfg = EncounterConfig::default()
            .with_party_size(5)
            .with_party_level(3)
            .with_max_quantity(10);
        assert_eq!(cfg.party_size, 5);
        assert_eq!(cfg.party_level, 3);
        assert_eq!(cfg.max_quantity, 10);
    }

    #[test]
    fn level_range_swapped() {
        let cfg = EncounterConfig::default().with_level_range(5, -1);
        assert_eq!((cfg.min_level, cfg.max_level), (-1, 5));
        let filter = cfg.initial_filter();
        assert_eq!((filter.min_level, filter.max_level), (-1, 5));
        assert!(filter.name.is_empty());
    }

    #[test]
    fn max_quantity_at_least_one() {
        assert_eq!(EncounterConfig::default().with_max_quantity(0).max_quantity, 1);
    }
}
