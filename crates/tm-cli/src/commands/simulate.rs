use std::path::Path;

use tm_encounter::{EncounterConfig, EncounterError, EncounterId};
use tm_store::JsonEncounterStore;

/// Print the simulator request for a saved encounter.
pub async fn run(catalog_path: &Path, store_dir: &Path, id: EncounterId) -> Result<(), String> {
    let catalog = super::open_catalog(catalog_path).await?;
    let mut session = super::session_over(&catalog, EncounterConfig::default()).await?;
    let store = JsonEncounterStore::new(store_dir);
    session
        .load_encounter(&store, &catalog, id)
        .await
        .map_err(|e| e.to_string())?;

    if session.roster().is_empty() {
        return Err(EncounterError::EmptyEncounter.to_string());
    }

    let request = session.simulation_request();
    let json = serde_json::to_string(&request).map_err(|e| e.to_string())?;
    println!("{json}");

    Ok(())
}
