use std::collections::HashMap;
use std::sync::Arc;

use crate::creature::{Creature, CreatureId};
use crate::error::{CoreError, CoreResult};
use crate::filter::{CatalogQuery, FilterCriteria};

/// The full set of creature templates available to a session.
///
/// Creatures keep the order in which they were inserted; every listing and
/// filter result follows that order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    creatures: Vec<Arc<Creature>>,

    // Index into `creatures`
    by_id: HashMap<CreatureId, usize>,
}

impl Catalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from templates, rejecting duplicate ids.
    pub fn from_creatures(creatures: impl IntoIterator<Item = Creature>) -> CoreResult<Self> {
        let mut catalog = Self::new();
        for creature in creatures {
            catalog.insert(creature)?;
        }
        Ok(catalog)
    }

    /// Build a catalog from already-shared templates, rejecting duplicate ids.
    pub fn from_shared(creatures: impl IntoIterator<Item = Arc<Creature>>) -> CoreResult<Self> {
        let mut catalog = Self::new();
        for creature in creatures {
            catalog.insert_shared(creature)?;
        }
        Ok(catalog)
    }

    /// Add a template. Returns the shared handle stored in the catalog.
    pub fn insert(&mut self, creature: Creature) -> CoreResult<Arc<Creature>> {
        self.insert_shared(Arc::new(creature))
    }

    /// Add a template that is already shared elsewhere.
    pub fn insert_shared(&mut self, creature: Arc<Creature>) -> CoreResult<Arc<Creature>> {
        if self.by_id.contains_key(&creature.id) {
            return Err(CoreError::DuplicateCreature(creature.id));
        }
        if creature.name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "creature {} has no name",
                creature.id
            )));
        }
        self.by_id.insert(creature.id, self.creatures.len());
        self.creatures.push(Arc::clone(&creature));
        Ok(creature)
    }

    /// Look up a template by id.
    pub fn get(&self, id: CreatureId) -> Option<&Arc<Creature>> {
        self.by_id.get(&id).map(|&idx| &self.creatures[idx])
    }

    /// Look up a template by id, failing if it is absent.
    pub fn require(&self, id: CreatureId) -> CoreResult<&Arc<Creature>> {
        self.get(id).ok_or(CoreError::CreatureNotFound(id))
    }

    /// Whether a template with `id` exists.
    pub fn contains(&self, id: CreatureId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Iterate over all templates in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Creature>> {
        self.creatures.iter()
    }

    /// All templates as a slice.
    pub fn creatures(&self) -> &[Arc<Creature>] {
        &self.creatures
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    /// Whether the catalog has no templates.
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Lowest and highest creature level in the catalog.
    pub fn level_span(&self) -> Option<(i32, i32)> {
        let min = self.creatures.iter().map(|c| c.level).min()?;
        let max = self.creatures.iter().map(|c| c.level).max()?;
        Some((min, max))
    }

    /// Apply filter criteria and return the matching templates.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<Arc<Creature>> {
        crate::filter::filter(&self.creatures, criteria)
    }

    /// Start a fluent query over this catalog.
    pub fn query(&self) -> CatalogQuery<'_> {
        CatalogQuery::new(self)
    }
}
