use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use tm_encounter::{EncounterStore, SessionContext};
use tm_store::JsonEncounterStore;

/// List the saved encounters in a directory.
pub async fn run(store_dir: &Path) -> Result<(), String> {
    let store = JsonEncounterStore::new(store_dir);
    let encounters = store
        .list(&SessionContext::anonymous())
        .await
        .map_err(|e| e.to_string())?;

    if encounters.is_empty() {
        println!("  No saved encounters.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Creatures", "Saved"]);
    for encounter in &encounters {
        let id = encounter.id.map(|id| id.to_string()).unwrap_or_default();
        table.add_row(vec![
            id,
            encounter.name.clone(),
            encounter.total_creatures().to_string(),
            encounter.saved_at.format("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} encounters", encounters.len());

    Ok(())
}
