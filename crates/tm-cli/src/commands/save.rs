use std::path::Path;

use colored::Colorize;
use tm_core::CreatureId;
use tm_encounter::EncounterConfig;
use tm_store::JsonEncounterStore;

/// Add each creature id once per mention and save the roster under `name`.
pub async fn run(
    catalog_path: &Path,
    store_dir: &Path,
    name: &str,
    ids: &[u64],
) -> Result<(), String> {
    let catalog = super::open_catalog(catalog_path).await?;
    let mut session = super::session_over(&catalog, EncounterConfig::default()).await?;

    for &id in ids {
        session.add(CreatureId(id)).map_err(|e| e.to_string())?;
    }

    let store = JsonEncounterStore::new(store_dir);
    let id = session
        .save_encounter(&store, name)
        .await
        .map_err(|e| e.to_string())?;

    println!("  {} encounter '{name}' as {id}", "Saved".green().bold());
    println!(
        "  {} creatures in {} groups",
        session.roster().total_creatures(),
        session.roster().len()
    );

    Ok(())
}
