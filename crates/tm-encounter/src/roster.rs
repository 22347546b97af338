//! The roster: creatures selected for the current encounter.
//!
//! Every entry pairs a shared creature template with a quantity of at least
//! one. Entries disappear instead of reaching zero, and bulk replacement
//! builds the next roster completely before swapping it in, so a reader
//! never sees a half-loaded encounter.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tm_core::{Creature, CreatureId};
use tracing::warn;

use crate::error::{EncounterError, EncounterResult};
use crate::ports::SavedEnemy;

/// Highest quantity the front end offers per creature. Not enforced here.
pub const MAX_QUANTITY: u32 = 25;

/// A creature id and how many of it, as sent to the simulator and accepted
/// by [`Roster::replace_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RosterSelection {
    /// Catalog id of the creature.
    pub id: CreatureId,
    /// How many of it.
    pub quantity: u32,
}

impl RosterSelection {
    /// Pair an id with a quantity.
    pub fn new(id: impl Into<CreatureId>, quantity: u32) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }
}

impl From<&SavedEnemy> for RosterSelection {
    fn from(enemy: &SavedEnemy) -> Self {
        Self {
            id: enemy.id,
            quantity: enemy.quantity,
        }
    }
}

/// Why an incoming selection was dropped during [`Roster::replace_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnresolvedReason {
    /// The catalog has no creature with this id.
    NotInCatalog,
    /// The selection asked for zero creatures.
    ZeroQuantity,
}

impl std::fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInCatalog => write!(f, "not in catalog"),
            Self::ZeroQuantity => write!(f, "quantity is zero"),
        }
    }
}

/// A selection that could not be placed in the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unresolved {
    /// The selection as requested.
    pub selection: RosterSelection,
    /// Why it was left out.
    pub reason: UnresolvedReason,
}

/// One creature in the encounter and how many of it.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    creature: Arc<Creature>,
    quantity: u32,
}

impl RosterEntry {
    /// The creature template.
    pub fn creature(&self) -> &Arc<Creature> {
        &self.creature
    }

    /// Catalog id of the creature.
    pub fn id(&self) -> CreatureId {
        self.creature.id
    }

    /// Always at least 1.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Whether the front end should stop offering "add one more".
    pub fn at_max_quantity(&self) -> bool {
        self.quantity >= MAX_QUANTITY
    }

    /// This entry as an id and quantity pair.
    pub fn selection(&self) -> RosterSelection {
        RosterSelection {
            id: self.id(),
            quantity: self.quantity,
        }
    }
}

/// The creatures selected for the current encounter, in the order they were
/// first added.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Create an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one of `creature`. Returns the entry's new quantity.
    pub fn add(&mut self, creature: Arc<Creature>) -> u32 {
        if let Some(entry) = self.entry_mut(creature.id) {
            entry.quantity = entry.quantity.saturating_add(1);
            return entry.quantity;
        }
        self.entries.push(RosterEntry {
            creature,
            quantity: 1,
        });
        1
    }

    /// Add one more of a creature already in the roster.
    pub fn increment(&mut self, id: CreatureId) -> EncounterResult<u32> {
        let entry = self.entry_mut(id).ok_or(EncounterError::NotInRoster(id))?;
        entry.quantity = entry.quantity.saturating_add(1);
        Ok(entry.quantity)
    }

    /// Remove one of a creature. Returns the remaining quantity, or `None`
    /// if that was the last one and the entry is gone.
    pub fn decrement(&mut self, id: CreatureId) -> EncounterResult<Option<u32>> {
        let idx = self.position(id).ok_or(EncounterError::NotInRoster(id))?;
        if self.entries[idx].quantity <= 1 {
            self.entries.remove(idx);
            return Ok(None);
        }
        self.entries[idx].quantity -= 1;
        Ok(Some(self.entries[idx].quantity))
    }

    /// Remove a creature regardless of quantity.
    pub fn remove(&mut self, id: CreatureId) -> Option<RosterEntry> {
        let idx = self.position(id)?;
        Some(self.entries.remove(idx))
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Replace the whole roster with `selections`, resolved through `lookup`.
    ///
    /// Selections whose id the lookup cannot resolve, or whose quantity is
    /// zero, are left out and returned. Repeated ids are merged by summing
    /// their quantities. The previous contents are discarded, never merged.
    pub fn replace_all<I, F>(&mut self, selections: I, mut lookup: F) -> Vec<Unresolved>
    where
        I: IntoIterator<Item = RosterSelection>,
        F: FnMut(CreatureId) -> Option<Arc<Creature>>,
    {
        let mut next = Roster::new();
        let mut unresolved = Vec::new();

        for selection in selections {
            if selection.quantity == 0 {
                warn!(id = %selection.id, "dropping roster selection with zero quantity");
                unresolved.push(Unresolved {
                    selection,
                    reason: UnresolvedReason::ZeroQuantity,
                });
                continue;
            }
            if let Some(entry) = next.entry_mut(selection.id) {
                entry.quantity = entry.quantity.saturating_add(selection.quantity);
                continue;
            }
            match lookup(selection.id) {
                Some(creature) => next.entries.push(RosterEntry {
                    creature,
                    quantity: selection.quantity,
                }),
                None => {
                    warn!(id = %selection.id, "dropping roster selection missing from catalog");
                    unresolved.push(Unresolved {
                        selection,
                        reason: UnresolvedReason::NotInCatalog,
                    });
                }
            }
        }

        *self = next;
        unresolved
    }

    /// Get the entry for a creature.
    pub fn get(&self, id: CreatureId) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Whether the roster holds `id`.
    pub fn contains(&self, id: CreatureId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter()
    }

    /// All entries.
    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Number of distinct creatures.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all quantities.
    pub fn total_creatures(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// The roster reduced to `{id, quantity}` pairs.
    pub fn selections(&self) -> Vec<RosterSelection> {
        self.entries.iter().map(RosterEntry::selection).collect()
    }

    /// The roster reduced to the persisted `{id, name, quantity}` form.
    pub fn saved_enemies(&self) -> Vec<SavedEnemy> {
        self.entries
            .iter()
            .map(|e| SavedEnemy {
                id: e.id(),
                name: e.creature.name.clone(),
                quantity: e.quantity,
            })
            .collect()
    }

    /// Quantities keyed by creature id.
    pub fn quantities(&self) -> HashMap<CreatureId, u32> {
        self.entries.iter().map(|e| (e.id(), e.quantity)).collect()
    }

    fn position(&self, id: CreatureId) -> Option<usize> {
        self.entries.iter().position(|e| e.id() == id)
    }

    fn entry_mut(&mut self, id: CreatureId) -> Option<&mut RosterEntry> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_core::Catalog;

    fn catalog() -> Catalog {
        Catalog::from_creatures([
            Creature::new(1, "Goblin Warrior", -1),
            Creature::new(2, "Wolf", 1),
            Creature::new(3, "Ogre Warrior", 3),
        ])
        .unwrap()
    }

    fn creature(catalog: &Catalog, id: u64) -> Arc<Creature> {
        Arc::clone(catalog.get(CreatureId(id)).unwrap())
    }

    #[test]
    fn add_creates_then_increments() {
        let catalog = catalog();
        let mut roster = Roster::new();
        assert_eq!(roster.add(creature(&catalog, 1)), 1);
        assert_eq!(roster.add(creature(&catalog, 2)), 1);
        assert_eq!(roster.add(creature(&catalog, 1)), 2);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.total_creatures(), 3);
        assert_eq!(roster.get(CreatureId(1)).unwrap().quantity(), 2);
    }

    #[test]
    fn add_does_not_enforce_max_quantity() {
        let catalog = catalog();
        let mut roster = Roster::new();
        for _ in 0..MAX_QUANTITY + 5 {
            roster.add(creature(&catalog, 2));
        }
        let entry = roster.get(CreatureId(2)).unwrap();
        assert_eq!(entry.quantity(), MAX_QUANTITY + 5);
        assert!(entry.at_max_quantity());
    }

    #[test]
    fn decrement_from_one_removes() {
        let catalog = catalog();
        let mut roster = Roster::new();
        roster.add(creature(&catalog, 1));
        roster.add(creature(&catalog, 1));
        assert_eq!(roster.decrement(CreatureId(1)).unwrap(), Some(1));
        assert_eq!(roster.decrement(CreatureId(1)).unwrap(), None);
        assert!(roster.is_empty());
        assert!(matches!(
            roster.decrement(CreatureId(1)),
            Err(EncounterError::NotInRoster(CreatureId(1)))
        ));
    }

    #[test]
    fn increment_unknown_fails() {
        let mut roster = Roster::new();
        assert!(matches!(
            roster.increment(CreatureId(9)),
            Err(EncounterError::NotInRoster(CreatureId(9)))
        ));
    }

    #[test]
    fn remove_ignores_quantity() {
        let catalog = catalog();
        let mut roster = Roster::new();
        roster.add(creature(&catalog, 3));
        roster.increment(CreatureId(3)).unwrap();
        roster.increment(CreatureId(3)).unwrap();
        let removed = roster.remove(CreatureId(3)).unwrap();
        assert_eq!(removed.quantity(), 3);
        assert!(roster.remove(CreatureId(3)).is_none());
    }

    #[test]
    fn clear_empties() {
        let catalog = catalog();
        let mut roster = Roster::new();
        roster.add(creature(&catalog, 1));
        roster.add(creature(&catalog, 2));
        roster.clear();
        assert!(roster.is_empty());
        assert_eq!(roster.total_creatures(), 0);
    }

    #[test]
    fn template_is_shared_not_copied() {
        let catalog = catalog();
        let mut roster = Roster::new();
        roster.add(creature(&catalog, 2));
        roster.add(creature(&catalog, 2));
        let entry = roster.get(CreatureId(2)).unwrap();
        assert!(Arc::ptr_eq(entry.creature(), catalog.get(CreatureId(2)).unwrap()));
        assert_eq!(catalog.get(CreatureId(2)).unwrap().name, "Wolf");
    }

    #[test]
    fn replace_all_overwrites() {
        let catalog = catalog();
        let mut roster = Roster::new();
        roster.add(creature(&catalog, 1));

        let unresolved = roster.replace_all(
            [RosterSelection::new(2, 3), RosterSelection::new(3, 1)],
            |id| catalog.get(id).cloned(),
        );
        assert!(unresolved.is_empty());
        assert!(!roster.contains(CreatureId(1)));
        assert_eq!(
            roster.selections(),
            vec![RosterSelection::new(2, 3), RosterSelection::new(3, 1)]
        );
    }

    #[test]
    fn replace_all_reports_unresolved() {
        let catalog = catalog();
        let mut roster = Roster::new();
        let unresolved = roster.replace_all(
            [
                RosterSelection::new(1, 2),
                RosterSelection::new(42, 1),
                RosterSelection::new(2, 0),
            ],
            |id| catalog.get(id).cloned(),
        );
        assert_eq!(roster.selections(), vec![RosterSelection::new(1, 2)]);
        assert_eq!(
            unresolved,
            vec![
                Unresolved {
                    selection: RosterSelection::new(42, 1),
                    reason: UnresolvedReason::NotInCatalog,
                },
                Unresolved {
                    selection: RosterSelection::new(2, 0),
                    reason: UnresolvedReason::ZeroQuantity,
                },
            ]
        );
    }

    #[test]
    fn replace_all_merges_repeated_ids() {
        let catalog = catalog();
        let mut roster = Roster::new();
        roster.replace_all(
            [RosterSelection::new(2, 2), RosterSelection::new(2, 3)],
            |id| catalog.get(id).cloned(),
        );
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(CreatureId(2)).unwrap().quantity(), 5);
    }

    #[test]
    fn replace_all_is_idempotent() {
        let catalog = catalog();
        let input = [RosterSelection::new(3, 2), RosterSelection::new(1, 4)];
        let mut roster = Roster::new();
        roster.replace_all(input, |id| catalog.get(id).cloned());
        let first = roster.selections();
        roster.replace_all(input, |id| catalog.get(id).cloned());
        assert_eq!(roster.selections(), first);
    }

    #[test]
    fn saved_form_round_trips() {
        let catalog = catalog();
        let mut roster = Roster::new();
        roster.add(creature(&catalog, 3));
        roster.add(creature(&catalog, 1));
        roster.add(creature(&catalog, 1));

        let saved = roster.saved_enemies();
        assert_eq!(saved[0].name, "Ogre Warrior");

        let mut reloaded = Roster::new();
        let unresolved = reloaded.replace_all(
            saved.iter().map(RosterSelection::from),
            |id| catalog.get(id).cloned(),
        );
        assert!(unresolved.is_empty());
        assert_eq!(reloaded.quantities(), roster.quantities());
    }
}
