pub mod assess;
pub mod budget;
pub mod creatures;
pub mod encounters;
pub mod save;
pub mod simulate;

use std::path::Path;

use colored::{ColoredString, Colorize};
use tm_encounter::{EncounterConfig, EncounterSession, SessionContext, Tier};
use tm_store::JsonCatalog;

/// Open a catalog file.
async fn open_catalog(path: &Path) -> Result<JsonCatalog, String> {
    JsonCatalog::open(path)
        .await
        .map_err(|e| format!("cannot read catalog: {e}"))
}

/// Start an anonymous session over `catalog`.
async fn session_over(
    catalog: &JsonCatalog,
    config: EncounterConfig,
) -> Result<EncounterSession, String> {
    let mut session =
        EncounterSession::new(config, SessionContext::anonymous()).map_err(|e| e.to_string())?;
    session
        .refresh_catalog(catalog)
        .await
        .map_err(|e| e.to_string())?;
    Ok(session)
}

/// A tier name colored by how dangerous it is.
fn tier_colored(tier: Tier) -> ColoredString {
    let label = tier.label();
    match tier {
        Tier::Trivial => label.dimmed(),
        Tier::Low => label.green(),
        Tier::Moderate => label.yellow(),
        Tier::Severe => label.red(),
        Tier::Extreme => label.red().bold(),
    }
}
