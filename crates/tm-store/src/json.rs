//! JSON-file collaborators.
//!
//! Catalog files hold `{"enemies": [...]}` and character files hold
//! `{"characters": [...]}`. Encounters are written one `<id>.json` per file
//! into a directory. These are local files, so no ownership is checked.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tm_core::{Catalog, Creature, CreatureId};
use tm_encounter::{
    CharacterSource, CreatureCatalog, EncounterId, EncounterStore, PortError, PortResult,
    SavedCharacter, SavedEncounter, SessionContext,
};
use tokio::fs;
use tracing::{debug, info, warn};

fn serialization(origin: impl std::fmt::Display, err: impl std::fmt::Display) -> PortError {
    PortError::Serialization(format!("{origin}: {err}"))
}

async fn read_file(path: &Path, what: &str) -> PortResult<String> {
    match fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(PortError::NotFound(format!(
            "{what} {}",
            path.display()
        ))),
        Err(e) => Err(PortError::Io(e)),
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    enemies: Vec<Creature>,
}

fn parse_catalog(text: &str, origin: impl std::fmt::Display) -> PortResult<Catalog> {
    let file: CatalogFile = serde_json::from_str(text).map_err(|e| serialization(&origin, e))?;
    Catalog::from_creatures(file.enemies).map_err(|e| serialization(&origin, e))
}

/// A creature catalog loaded from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
    catalog: Catalog,
}

impl JsonCatalog {
    /// Read and parse the catalog file.
    pub async fn open(path: impl AsRef<Path>) -> PortResult<Self> {
        let path = path.as_ref().to_path_buf();
        let text = read_file(&path, "catalog").await?;
        let catalog = parse_catalog(&text, path.display())?;
        info!(path = %path.display(), creatures = catalog.len(), "catalog loaded");
        Ok(Self { path, catalog })
    }

    /// Parse catalog JSON. Duplicate creature ids are an error.
    pub fn parse(text: &str) -> PortResult<Catalog> {
        parse_catalog(text, "catalog")
    }

    /// File the catalog was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

#[async_trait]
impl CreatureCatalog for JsonCatalog {
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

/// Encounters stored as JSON files in a directory.
#[derive(Debug, Clone)]
pub struct JsonEncounterStore {
    dir: PathBuf,
}

impl JsonEncounterStore {
    /// The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory encounters are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, id: EncounterId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }
}

#[async_trait]
impl EncounterStore for JsonEncounterStore {
    async fn save(
        &self,
        _ctx: &SessionContext,
        encounter: &SavedEncounter,
    ) -> PortResult<EncounterId> {
        let id = encounter.id.unwrap_or_default();
        let mut stored = encounter.clone();
        stored.id = Some(id);

        let path = self.file_for(id);
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| serialization(path.display(), e))?;
        fs::create_dir_all(&self.dir).await?;
        fs::write(&path, json).await?;
        debug!(%id, path = %path.display(), "encounter written");
        Ok(id)
    }

    async fn load(&self, _ctx: &SessionContext, id: EncounterId) -> PortResult<SavedEncounter> {
        let path = self.file_for(id);
        let text = read_file(&path, "encounter").await?;
        let mut encounter: SavedEncounter =
            serde_json::from_str(&text).map_err(|e| serialization(path.display(), e))?;
        encounter.id = Some(id);
        Ok(encounter)
    }

    async fn list(&self, _ctx: &SessionContext) -> PortResult<Vec<SavedEncounter>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PortError::Io(e)),
        };

        let mut encounters = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .filter(|_| path.extension().is_some_and(|ext| ext == "json"))
                .and_then(|s| s.parse::<EncounterId>().ok())
            else {
                continue;
            };
            let parsed = match fs::read_to_string(&path).await {
                Ok(text) => serde_json::from_str::<SavedEncounter>(&text)
                    .map_err(|e| serialization(path.display(), e)),
                Err(e) => Err(PortError::Io(e)),
            };
            match parsed {
                Ok(mut encounter) => {
                    encounter.id = Some(id);
                    encounters.push(encounter);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable encounter"),
            }
        }
        encounters.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(encounters)
    }

    async fn delete(&self, _ctx: &SessionContext, id: EncounterId) -> PortResult<()> {
        match fs::remove_file(self.file_for(id)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(PortError::NotFound(format!("encounter {id}")))
            }
            Err(e) => Err(PortError::Io(e)),
        }
    }
}

#[derive(Deserialize)]
struct CharacterFile {
    characters: Vec<SavedCharacter>,
}

/// Saved characters read from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonCharacters {
    path: PathBuf,
}

impl JsonCharacters {
    /// Characters read from the JSON file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CharacterSource for JsonCharacters {
    async fn fetch_characters(&self, _ctx: &SessionContext) -> PortResult<Vec<SavedCharacter>> {
        let text = read_file(&self.path, "character file").await?;
        let file: CharacterFile =
            serde_json::from_str(&text).map_err(|e| serialization(self.path.display(), e))?;
        Ok(file.characters)
    }
}
