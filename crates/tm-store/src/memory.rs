//! In-memory collaborators for tests and embedding.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tm_core::{Catalog, CoreResult, Creature, CreatureId};
use tm_encounter::{
    CharacterSource, CreatureCatalog, EncounterId, EncounterStore, PortError, PortResult,
    SavedCharacter, SavedEncounter, SessionContext,
};
use tokio::sync::RwLock;
use tracing::debug;

/// A fixed catalog held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    catalog: Catalog,
}

impl MemoryCatalog {
    /// Wrap an already built catalog.
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    /// Build from templates, rejecting duplicate ids.
    pub fn from_creatures(creatures: impl IntoIterator<Item = Creature>) -> CoreResult<Self> {
        Ok(Self::new(Catalog::from_creatures(creatures)?))
    }

    /// The wrapped catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl CreatureCatalog for MemoryCatalog {
    async fn fetch_all(&self, _ctx: &SessionContext) -> PortResult<Vec<Arc<Creature>>> {
        Ok(self.catalog.creatures().to_vec())
    }

    async fn fetch_by_id(
        &self,
        _ctx: &SessionContext,
        id: CreatureId,
    ) -> PortResult<Option<Arc<Creature>>> {
        Ok(self.catalog.get(id).cloned())
    }
}

#[derive(Debug, Clone)]
struct OwnedEncounter {
    owner: String,
    encounter: SavedEncounter,
}

/// Saved encounters owned by individual users.
///
/// Every call needs an authenticated context. Touching another user's
/// encounter is forbidden.
#[derive(Debug, Default)]
pub struct MemoryEncounterStore {
    encounters: RwLock<HashMap<EncounterId, OwnedEncounter>>,
}

impl MemoryEncounterStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of encounters across all users.
    pub async fn len(&self) -> usize {
        self.encounters.read().await.len()
    }

    /// Whether no user has saved anything.
    pub async fn is_empty(&self) -> bool {
        self.encounters.read().await.is_empty()
    }
}

fn require_user(ctx: &SessionContext) -> PortResult<&str> {
    if !ctx.is_authenticated() {
        return Err(PortError::Unauthorized);
    }
    ctx.user_id().ok_or(PortError::Unauthorized)
}

fn check_owner(stored: &OwnedEncounter, user: &str, action: &str) -> PortResult<()> {
    if stored.owner == user {
        Ok(())
    } else {
        Err(PortError::Forbidden {
            action: action.to_string(),
            resource: "encounter".to_string(),
        })
    }
}

fn not_found(id: EncounterId) -> PortError {
    PortError::NotFound(format!("encounter {id}"))
}

#[async_trait]
impl EncounterStore for MemoryEncounterStore {
    async fn save(
        &self,
        ctx: &SessionContext,
        encounter: &SavedEncounter,
    ) -> PortResult<EncounterId> {
        let user = require_user(ctx)?;
        let id = encounter.id.unwrap_or_default();
        let mut encounters = self.encounters.write().await;
        if let Some(existing) = encounters.get(&id) {
            check_owner(existing, user, "overwrite")?;
        }
        let mut stored = encounter.clone();
        stored.id = Some(id);
        encounters.insert(
            id,
            OwnedEncounter {
                owner: user.to_string(),
                encounter: stored,
            },
        );
        debug!(%id, user, "encounter stored in memory");
        Ok(id)
    }

    async fn load(&self, ctx: &SessionContext, id: EncounterId) -> PortResult<SavedEncounter> {
        let user = require_user(ctx)?;
        let encounters = self.encounters.read().await;
        let stored = encounters.get(&id).ok_or_else(|| not_found(id))?;
        check_owner(stored, user, "load")?;
        Ok(stored.encounter.clone())
    }

    async fn list(&self, ctx: &SessionContext) -> PortResult<Vec<SavedEncounter>> {
        let user = require_user(ctx)?;
        let encounters = self.encounters.read().await;
        let mut mine: Vec<SavedEncounter> = encounters
            .values()
            .filter(|e| e.owner == user)
            .map(|e| e.encounter.clone())
            .collect();
        mine.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(mine)
    }

    async fn delete(&self, ctx: &SessionContext, id: EncounterId) -> PortResult<()> {
        let user = require_user(ctx)?;
        let mut encounters = self.encounters.write().await;
        let stored = encounters.get(&id).ok_or_else(|| not_found(id))?;
        check_owner(stored, user, "delete")?;
        encounters.remove(&id);
        Ok(())
    }
}

/// Saved characters per user.
#[derive(Debug, Clone, Default)]
pub struct MemoryCharacters {
    by_user: HashMap<String, Vec<SavedCharacter>>,
}

impl MemoryCharacters {
    /// No characters for anyone.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give `user_id` a character list.
    pub fn with_characters(
        mut self,
        user_id: impl Into<String>,
        characters: Vec<SavedCharacter>,
    ) -> Self {
        self.by_user.insert(user_id.into(), characters);
        self
    }
}

#[async_trait]
impl CharacterSource for MemoryCharacters {
    async fn fetch_characters(&self, ctx: &SessionContext) -> PortResult<Vec<SavedCharacter>> {
        let user = require_user(ctx)?;
        Ok(self.by_user.get(user).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tm_encounter::{
        EncounterConfig, EncounterError, EncounterSession, SavedEnemy, Tier, UserIdentity,
    };

    fn ctx(user: &str) -> SessionContext {
        SessionContext::authenticated(UserIdentity::new(user, user), "token")
    }

    fn encounter(name: &str) -> SavedEncounter {
        SavedEncounter::new(
            name,
            vec![SavedEnemy {
                id: CreatureId(2),
                name: "Wolf".into(),
                quantity: 3,
            }],
        )
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::from_creatures([
            Creature::new(1, "Goblin Warrior", -1),
            Creature::new(2, "Wolf", 1),
            Creature::new(3, "Ogre Warrior", 3),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn catalog_fetches() {
        let catalog = catalog();
        let anon = SessionContext::anonymous();
        assert_eq!(catalog.fetch_all(&anon).await.unwrap().len(), 3);
        assert_eq!(
            catalog
                .fetch_by_id(&anon, CreatureId(3))
                .await
                .unwrap()
                .unwrap()
                .name,
            "Ogre Warrior"
        );
        assert!(catalog.fetch_by_id(&anon, CreatureId(9)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_requires_login() {
        let store = MemoryEncounterStore::new();
        let result = store.save(&SessionContext::anonymous(), &encounter("A")).await;
        assert!(matches!(result, Err(PortError::Unauthorized)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn owner_can_load_others_cannot() {
        let store = MemoryEncounterStore::new();
        let id = store.save(&ctx("ana"), &encounter("Ambush")).await.unwrap();

        let loaded = store.load(&ctx("ana"), id).await.unwrap();
        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.name, "Ambush");

        assert!(matches!(
            store.load(&ctx("ben"), id).await,
            Err(PortError::Forbidden { .. })
        ));
        assert!(matches!(
            store.delete(&ctx("ben"), id).await,
            Err(PortError::Forbidden { .. })
        ));
        assert!(matches!(
            store.load(&ctx("ana"), EncounterId::new()).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_only_shows_own() {
        let store = MemoryEncounterStore::new();
        store.save(&ctx("ana"), &encounter("One")).await.unwrap();
        store.save(&ctx("ana"), &encounter("Two")).await.unwrap();
        store.save(&ctx("ben"), &encounter("Three")).await.unwrap();

        assert_eq!(store.list(&ctx("ana")).await.unwrap().len(), 2);
        assert_eq!(store.list(&ctx("ben")).await.unwrap().len(), 1);
        assert_eq!(store.len().await, 3);
    }

    #[tokio::test]
    async fn delete_removes() {
        let store = MemoryEncounterStore::new();
        let id = store.save(&ctx("ana"), &encounter("Gone")).await.unwrap();
        store.delete(&ctx("ana"), id).await.unwrap();
        assert!(matches!(
            store.delete(&ctx("ana"), id).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn resaving_keeps_id() {
        let store = MemoryEncounterStore::new();
        let id = store.save(&ctx("ana"), &encounter("Draft")).await.unwrap();
        let mut updated = store.load(&ctx("ana"), id).await.unwrap();
        updated.name = "Final".into();
        assert_eq!(store.save(&ctx("ana"), &updated).await.unwrap(), id);
        assert_eq!(store.load(&ctx("ana"), id).await.unwrap().name, "Final");
        assert!(matches!(
            store.save(&ctx("ben"), &updated).await,
            Err(PortError::Forbidden { .. })
        ));
    }

    #[tokio::test]
    async fn characters_per_user() {
        let characters = MemoryCharacters::new()
            .with_characters("ana", vec![SavedCharacter::new("Kyra", 3)]);
        assert_eq!(characters.fetch_characters(&ctx("ana")).await.unwrap().len(), 1);
        assert!(characters.fetch_characters(&ctx("ben")).await.unwrap().is_empty());
        assert!(matches!(
            characters.fetch_characters(&SessionContext::anonymous()).await,
            Err(PortError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn session_round_trip_through_store() {
        let catalog = catalog();
        let store = MemoryEncounterStore::new();
        let mut session = EncounterSession::new(EncounterConfig::default(), ctx("ana")).unwrap();
        session.refresh_catalog(&catalog).await.unwrap();
        session.add(CreatureId(2)).unwrap();
        session.add(CreatureId(2)).unwrap();
        session.add(CreatureId(3)).unwrap();
        let id = session.save_encounter(&store, "Den").await.unwrap();

        session.clear().unwrap();
        let report = session.load_encounter(&store, &catalog, id).await.unwrap();
        assert!(report.is_clean());
        // 2 wolves at 40 each plus an ogre at 80.
        assert_eq!(session.assessment().total_xp(), 160);
        assert_eq!(session.assessment().difficulty, Tier::Extreme);

        session.logout().unwrap();
        assert!(matches!(
            session.load_encounter(&store, &catalog, id).await,
            Err(EncounterError::Port(PortError::Unauthorized))
        ));
    }

    #[tokio::test]
    async fn saved_party_from_characters() {
        let characters = MemoryCharacters::new().with_characters(
            "ana",
            vec![SavedCharacter::new("Kyra", 2), SavedCharacter::new("Ezren", 2)],
        );
        let mut session = EncounterSession::new(EncounterConfig::default(), ctx("ana")).unwrap();
        session.use_saved_party(&characters).await.unwrap();
        assert_eq!(session.party().effective_size(), 2);
        assert_eq!(session.assessment().budget.extreme, 80);

        let mut anonymous =
            EncounterSession::new(EncounterConfig::default(), SessionContext::anonymous())
                .unwrap();
        assert!(matches!(
            anonymous.use_saved_party(&characters).await,
            Err(EncounterError::Port(PortError::Unauthorized))
        ));
    }
}
