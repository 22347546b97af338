//! Port traits for the collaborators the engine talks to, and the shapes
//! exchanged with them.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tm_core::{Creature, CreatureId};
use uuid::Uuid;

use crate::context::SessionContext;
use crate::error::PortResult;
use crate::roster::RosterSelection;

/// Identifier of a saved encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncounterId(pub Uuid);

impl EncounterId {
    /// A fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EncounterId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EncounterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EncounterId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A roster entry as persisted: the creature's id and name plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEnemy {
    /// Catalog id of the creature.
    pub id: CreatureId,
    /// Name at the time of saving, for display.
    pub name: String,
    /// How many of it.
    pub quantity: u32,
}

/// A persisted encounter. Only the reduced form is stored; creature details
/// are re-resolved against the catalog on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedEncounter {
    /// Assigned by the store on first save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EncounterId>,
    /// Name the user gave the encounter.
    pub name: String,
    /// Creatures in roster order.
    pub enemies: Vec<SavedEnemy>,
    /// When the encounter was saved.
    pub saved_at: DateTime<Utc>,
}

impl SavedEncounter {
    /// An unsaved encounter stamped with the current time.
    pub fn new(name: impl Into<String>, enemies: Vec<SavedEnemy>) -> Self {
        Self {
            id: None,
            name: name.into(),
            enemies,
            saved_at: Utc::now(),
        }
    }

    /// Sum of all quantities.
    pub fn total_creatures(&self) -> u64 {
        self.enemies.iter().map(|e| u64::from(e.quantity)).sum()
    }
}

/// The part of a character record the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCharacter {
    /// Character name.
    pub name: String,
    /// Character level.
    pub level: i32,
}

impl SavedCharacter {
    /// A character with the given name and level.
    pub fn new(name: impl Into<String>, level: i32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// What the combat simulator receives: creature ids and quantities only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Creature ids and quantities in roster order.
    pub enemies: Vec<RosterSelection>,
}

/// Aggregate results of a batch of simulated fights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Number of fights simulated.
    pub total_sims: u32,
    /// Fights the party won.
    pub wins: u32,
    /// `wins / total_sims`.
    pub wins_ratio: f64,
    /// Party members lost per fight, on average.
    pub average_deaths: f64,
    /// Rounds per fight, on average.
    pub average_rounds: f64,
}

/// Read access to creature templates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CreatureCatalog: Send + Sync {
    /// Every template, in catalog order.
    async fn fetch_all(&self, ctx: &SessionContext) -> PortResult<Vec<Arc<Creature>>>;

    /// A single template, or `None` if the id is unknown.
    async fn fetch_by_id(
        &self,
        ctx: &SessionContext,
        id: CreatureId,
    ) -> PortResult<Option<Arc<Creature>>>;
}

/// Persistence for saved encounters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EncounterStore: Send + Sync {
    /// Store an encounter and return its id.
    async fn save(
        &self,
        ctx: &SessionContext,
        encounter: &SavedEncounter,
    ) -> PortResult<EncounterId>;

    /// The encounter stored under `id`.
    async fn load(&self, ctx: &SessionContext, id: EncounterId) -> PortResult<SavedEncounter>;

    /// Encounters visible to the context, newest first.
    async fn list(&self, ctx: &SessionContext) -> PortResult<Vec<SavedEncounter>>;

    /// Remove the encounter stored under `id`.
    async fn delete(&self, ctx: &SessionContext, id: EncounterId) -> PortResult<()>;
}

/// The user's saved player characters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterSource: Send + Sync {
    /// Characters saved by the context's user.
    async fn fetch_characters(&self, ctx: &SessionContext) -> PortResult<Vec<SavedCharacter>>;
}

/// An external combat simulator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CombatSimulator: Send + Sync {
    /// Simulate the requested roster against the user's saved party.
    async fn run(
        &self,
        ctx: &SessionContext,
        request: &SimulationRequest,
    ) -> PortResult<SimulationSummary>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encounter_id_parses_its_display() {
        let id = EncounterId::new();
        let parsed: EncounterId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<EncounterId>().is_err());
    }

    #[test]
    fn simulation_request_wire_shape() {
        let request = SimulationRequest {
            enemies: vec![RosterSelection::new(7, 2)],
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"enemies":[{"id":7,"quantity":2}]}"#
        );
    }

    #[test]
    fn unsaved_encounter_omits_id() {
        let encounter = SavedEncounter::new(
            "Ambush",
            vec![SavedEnemy {
                id: CreatureId(1),
                name: "Wolf".into(),
                quantity: 3,
            }],
        );
        let json = serde_json::to_value(&encounter).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["enemies"][0]["quantity"], 3);
        assert_eq!(encounter.total_creatures(), 3);
    }

    #[test]
    fn character_ignores_unknown_fields() {
        let character: SavedCharacter =
            serde_json::from_str(r#"{"name":"Kyra","level":3,"class":"Cleric"}"#).unwrap();
        assert_eq!(character, SavedCharacter::new("Kyra", 3));
    }
}
