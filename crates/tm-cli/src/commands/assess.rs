use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tm_encounter::{EncounterConfig, EncounterId, EncounterSession, LoadReport};
use tm_store::{JsonCharacters, JsonEncounterStore};

/// How the party is described on the command line.
#[derive(Debug, Default)]
pub struct PartyArgs {
    /// Manual party size.
    pub size: Option<u32>,
    /// Manual party level.
    pub level: Option<i32>,
    /// Character file to take the party from.
    pub characters: Option<PathBuf>,
}

impl PartyArgs {
    fn config(&self) -> EncounterConfig {
        let mut config = EncounterConfig::default();
        if let Some(size) = self.size {
            config = config.with_party_size(size);
        }
        if let Some(level) = self.level {
            config = config.with_party_level(level);
        }
        config
    }
}

/// Load an encounter and print its assessment for the party.
pub async fn run(
    catalog_path: &Path,
    store_dir: &Path,
    id: EncounterId,
    party: &PartyArgs,
) -> Result<(), String> {
    let catalog = super::open_catalog(catalog_path).await?;
    let mut session = super::session_over(&catalog, party.config()).await?;

    if let Some(path) = &party.characters {
        session
            .use_saved_party(&JsonCharacters::new(path))
            .await
            .map_err(|e| format!("cannot use saved party: {e}"))?;
    }

    let store = JsonEncounterStore::new(store_dir);
    let report = session
        .load_encounter(&store, &catalog, id)
        .await
        .map_err(|e| e.to_string())?;

    print_report(&session, &report);
    Ok(())
}

fn print_report(session: &EncounterSession, report: &LoadReport) {
    let party = session.party();
    let assessment = session.assessment();

    println!("  {} '{}'", "Encounter".bold(), report.name);
    let source = if party.is_using_saved() {
        " (saved party)"
    } else {
        ""
    };
    println!(
        "  Party of {} at level {}{}",
        party.effective_size(),
        party.effective_level(),
        source.dimmed()
    );
    println!();

    if session.roster().is_empty() {
        println!("  {}", "(no creatures)".dimmed());
    } else {
        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Creature", "Level", "Qty", "XP each", "XP"]);
        for (entry, contribution) in session.roster().iter().zip(&assessment.xp.contributions) {
            table.add_row(vec![
                contribution.name.clone(),
                entry.creature().level.to_string(),
                contribution.quantity.to_string(),
                contribution.xp_each.to_string(),
                contribution.xp.to_string(),
            ]);
        }
        println!("{table}");
    }
    println!();

    let mut budget = Table::new();
    budget.set_content_arrangement(ContentArrangement::Dynamic);
    budget.set_header(vec!["Threat", "XP", ""]);
    for (tier, xp) in assessment.budget.tiers() {
        let marker = if tier == assessment.difficulty {
            "<"
        } else {
            ""
        };
        budget.add_row(vec![tier.label().to_string(), xp.to_string(), marker.to_string()]);
    }
    println!("{budget}");
    println!();

    println!("  Earned XP: {}", assessment.total_xp());
    println!(
        "  Difficulty: {}",
        super::tier_colored(assessment.difficulty)
    );
    println!("  {}", assessment.difficulty.description().dimmed());

    if !report.unresolved.is_empty() || !report.out_of_range.is_empty() {
        println!();
    }
    for skipped in &report.unresolved {
        println!(
            "  {} creature {} skipped: {}",
            "warning:".yellow(),
            skipped.selection.id,
            skipped.reason
        );
    }
    for far in &report.out_of_range {
        println!(
            "  {} {} is {} levels from the party and earns no XP",
            "warning:".yellow(),
            far.name,
            far.level_delta.abs()
        );
    }
}
