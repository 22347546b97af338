//! An encounter-building session: one roster, one party, one catalog view,
//! and the assessment derived from them.
//!
//! Every mutating method finishes its change before recomputing derived
//! values, so callers only ever observe consistent state. Async methods
//! resolve everything they need from collaborators first and publish in a
//! single step at the end; a port failure leaves the session unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tm_core::{Catalog, Creature, CreatureId, FilterCriteria};
use tracing::{debug, info, warn};

use crate::assessment::{Assessment, Changes, Derived};
use crate::config::EncounterConfig;
use crate::context::{SessionContext, UserIdentity};
use crate::error::{EncounterError, EncounterResult, PortError};
use crate::party::{PartyConfig, SavedParty};
use crate::ports::{
    CharacterSource, CombatSimulator, CreatureCatalog, EncounterId, EncounterStore,
    SavedEncounter, SimulationRequest, SimulationSummary,
};
use crate::roster::{Roster, RosterSelection, Unresolved};
use crate::xp::Contribution;

/// Outcome of loading a saved encounter into the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Id the encounter was loaded from.
    pub id: EncounterId,
    /// Name the encounter was saved under.
    pub name: String,
    /// Distinct creatures placed in the roster.
    pub loaded: usize,
    /// Saved entries that could not be placed.
    pub unresolved: Vec<Unresolved>,
    /// Loaded creatures whose level is too far from the party's to score.
    pub out_of_range: Vec<Contribution>,
}

impl LoadReport {
    /// Whether the encounter loaded exactly as saved and scores fully.
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.out_of_range.is_empty()
    }
}

/// State for building and assessing one encounter.
#[derive(Debug)]
pub struct EncounterSession {
    config: EncounterConfig,
    context: SessionContext,
    catalog: Catalog,
    criteria: FilterCriteria,
    filtered: Vec<Arc<Creature>>,
    roster: Roster,
    party: PartyConfig,
    derived: Derived,
}

impl EncounterSession {
    /// Start a session with an empty catalog and roster.
    pub fn new(config: EncounterConfig, context: SessionContext) -> EncounterResult<Self> {
        let party = PartyConfig::new(config.party_size, config.party_level)?;
        let roster = Roster::new();
        let derived = Derived::new(&roster, &party)?;
        let criteria = config.initial_filter();
        Ok(Self {
            config,
            context,
            catalog: Catalog::new(),
            criteria,
            filtered: Vec::new(),
            roster,
            party,
            derived,
        })
    }

    /// Start a session over an already loaded catalog.
    pub fn with_catalog(
        config: EncounterConfig,
        context: SessionContext,
        catalog: Catalog,
    ) -> EncounterResult<Self> {
        let mut session = Self::new(config, context)?;
        session.catalog = catalog;
        session.refilter();
        Ok(session)
    }

    // -- Catalog and filter ------------------------------------------------

    /// Replace the catalog with everything `source` returns. Returns the
    /// number of templates.
    pub async fn refresh_catalog(
        &mut self,
        source: &dyn CreatureCatalog,
    ) -> EncounterResult<usize> {
        let creatures = source.fetch_all(&self.context).await?;
        self.catalog = Catalog::from_shared(creatures)?;
        self.refilter();
        info!(
            creatures = self.catalog.len(),
            shown = self.filtered.len(),
            "catalog refreshed"
        );
        Ok(self.catalog.len())
    }

    /// The loaded catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Replace the filter criteria and refilter.
    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    /// The current filter criteria.
    pub fn filter(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Catalog creatures passing the current filter, in catalog order.
    pub fn filtered(&self) -> &[Arc<Creature>] {
        &self.filtered
    }

    fn refilter(&mut self) {
        self.filtered = self.catalog.filter(&self.criteria);
        debug!(shown = self.filtered.len(), "filter applied");
    }

    // -- Roster ------------------------------------------------------------

    /// The current roster.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Add one of a catalog creature. Returns its new quantity.
    pub fn add(&mut self, id: CreatureId) -> EncounterResult<u32> {
        let creature = self
            .catalog
            .get(id)
            .cloned()
            .ok_or(EncounterError::CreatureNotFound(id))?;
        let quantity = self.roster.add(creature);
        self.recompute(Changes::roster())?;
        Ok(quantity)
    }

    /// Add one more of a creature already in the roster.
    pub fn increment(&mut self, id: CreatureId) -> EncounterResult<u32> {
        let quantity = self.roster.increment(id)?;
        self.recompute(Changes::roster())?;
        Ok(quantity)
    }

    /// Remove one of a creature. `None` means the entry is gone.
    pub fn decrement(&mut self, id: CreatureId) -> EncounterResult<Option<u32>> {
        let remaining = self.roster.decrement(id)?;
        self.recompute(Changes::roster())?;
        Ok(remaining)
    }

    /// Remove a creature entirely. Returns how many there were.
    pub fn remove(&mut self, id: CreatureId) -> EncounterResult<u32> {
        let entry = self
            .roster
            .remove(id)
            .ok_or(EncounterError::NotInRoster(id))?;
        self.recompute(Changes::roster())?;
        Ok(entry.quantity())
    }

    /// Empty the roster.
    pub fn clear(&mut self) -> EncounterResult<()> {
        self.roster.clear();
        self.recompute(Changes::roster())
    }

    /// Replace the roster with `selections`.
    ///
    /// Ids missing from the local catalog are looked up through `source`
    /// before anything changes. Selections that still cannot be resolved are
    /// returned and left out.
    pub async fn replace_all(
        &mut self,
        selections: Vec<RosterSelection>,
        source: &dyn CreatureCatalog,
    ) -> EncounterResult<Vec<Unresolved>> {
        let resolved = self.resolve(&selections, source).await?;
        let unresolved = self
            .roster
            .replace_all(selections, |id| resolved.get(&id).cloned());
        self.recompute(Changes::roster())?;
        Ok(unresolved)
    }

    async fn resolve(
        &self,
        selections: &[RosterSelection],
        source: &dyn CreatureCatalog,
    ) -> EncounterResult<HashMap<CreatureId, Arc<Creature>>> {
        let mut resolved = HashMap::new();
        for selection in selections {
            if selection.quantity == 0 || resolved.contains_key(&selection.id) {
                continue;
            }
            let creature = match self.catalog.get(selection.id) {
                Some(creature) => Some(Arc::clone(creature)),
                None => {
                    debug!(id = %selection.id, "resolving creature through catalog source");
                    source.fetch_by_id(&self.context, selection.id).await?
                }
            };
            if let Some(creature) = creature {
                resolved.insert(selection.id, creature);
            }
        }
        Ok(resolved)
    }

    // -- Party -------------------------------------------------------------

    /// The current party.
    pub fn party(&self) -> &PartyConfig {
        &self.party
    }

    /// Set the manual party size. Zero is rejected and nothing changes.
    pub fn set_party_size(&mut self, size: u32) -> EncounterResult<()> {
        self.party.set_size(size)?;
        self.recompute(Changes::party_size())
    }

    /// Set the manual party level.
    pub fn set_party_level(&mut self, level: i32) -> EncounterResult<()> {
        self.party.set_level(level);
        self.recompute(Changes::party_level())
    }

    /// Take party size and level from the user's saved characters.
    pub async fn use_saved_party(
        &mut self,
        source: &dyn CharacterSource,
    ) -> EncounterResult<SavedParty> {
        let characters = source.fetch_characters(&self.context).await?;
        let saved = self.party.use_saved(&characters)?;
        info!(size = saved.size, level = saved.level, "using saved party");
        self.recompute(Changes::party())?;
        Ok(saved)
    }

    /// Go back to the manually entered party.
    pub fn use_manual_party(&mut self) -> EncounterResult<()> {
        self.party.use_manual();
        self.recompute(Changes::party())
    }

    // -- Persistence and simulation ---------------------------------------

    /// Save the roster in reduced form under `name`.
    pub async fn save_encounter(
        &self,
        store: &dyn EncounterStore,
        name: &str,
    ) -> EncounterResult<EncounterId> {
        if self.roster.is_empty() {
            return Err(EncounterError::EmptyEncounter);
        }
        let encounter = SavedEncounter::new(name, self.roster.saved_enemies());
        let id = store.save(&self.context, &encounter).await?;
        info!(%id, encounter = name, creatures = encounter.total_creatures(), "encounter saved");
        Ok(id)
    }

    /// Load a saved encounter, re-resolving each creature, and make it the
    /// current roster.
    pub async fn load_encounter(
        &mut self,
        store: &dyn EncounterStore,
        source: &dyn CreatureCatalog,
        id: EncounterId,
    ) -> EncounterResult<LoadReport> {
        let saved = store.load(&self.context, id).await?;
        let selections = saved.enemies.iter().map(RosterSelection::from).collect();
        let unresolved = self.replace_all(selections, source).await?;

        let report = LoadReport {
            id,
            name: saved.name,
            loaded: self.roster.len(),
            unresolved,
            out_of_range: self.assessment().xp.out_of_range.clone(),
        };
        if report.unresolved.is_empty() {
            info!(%id, creatures = report.loaded, "encounter loaded");
        } else {
            warn!(
                %id,
                creatures = report.loaded,
                unresolved = report.unresolved.len(),
                "encounter loaded with unresolved creatures"
            );
        }
        Ok(report)
    }

    /// The `{id, quantity}` pairs a simulator needs.
    pub fn simulation_request(&self) -> SimulationRequest {
        SimulationRequest {
            enemies: self.roster.selections(),
        }
    }

    /// Run the roster through `simulator` against the user's saved party.
    ///
    /// Requires a signed-in user, a non-empty roster and a party taken from
    /// saved characters; the simulator is not called otherwise.
    pub async fn run_simulation(
        &self,
        simulator: &dyn CombatSimulator,
    ) -> EncounterResult<SimulationSummary> {
        if !self.context.is_authenticated() {
            return Err(PortError::Unauthorized.into());
        }
        if self.roster.is_empty() {
            return Err(EncounterError::EmptyEncounter);
        }
        if !self.party.is_using_saved() {
            return Err(EncounterError::SavedPartyRequired);
        }
        let request = self.simulation_request();
        debug!(enemies = request.enemies.len(), "running simulation");
        Ok(simulator.run(&self.context, &request).await?)
    }

    // -- Derived values and context ---------------------------------------

    /// The latest assessment.
    pub fn assessment(&self) -> &Assessment {
        self.derived.current()
    }

    /// The configuration the session started with.
    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    /// The credentials passed to collaborators.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Sign in as `user`.
    pub fn login(&mut self, user: UserIdentity, token: impl Into<String>) {
        self.context = SessionContext::authenticated(user, token);
    }

    /// Replace the access token of a signed-in user.
    pub fn refresh_token(&mut self, token: impl Into<String>) {
        self.context.refresh(token);
    }

    /// Drop the credentials. A saved party belongs to the signed-out user,
    /// so the session falls back to the manual party.
    pub fn logout(&mut self) -> EncounterResult<()> {
        self.context.logout();
        if self.party.is_using_saved() {
            self.party.use_manual();
            return self.recompute(Changes::party());
        }
        Ok(())
    }

    /// Whether the roster holds `id` at the configured quantity cap.
    pub fn at_max_quantity(&self, id: CreatureId) -> bool {
        self.roster
            .get(id)
            .is_some_and(|entry| entry.quantity() >= self.config.max_quantity)
    }

    fn recompute(&mut self, changes: Changes) -> EncounterResult<()> {
        self.derived
            .recompute(changes, &self.roster, &self.party)
            .map(|_| ())
    }
}
