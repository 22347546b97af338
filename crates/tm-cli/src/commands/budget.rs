use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tm_encounter::compute_budget;

/// Print the XP thresholds for a party size.
pub fn run(party_size: u32) -> Result<(), String> {
    let budget = compute_budget(party_size).map_err(|e| e.to_string())?;

    println!("  {} for a party of {party_size}", "XP budget".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Threat", "XP"]);
    for (tier, xp) in budget.tiers() {
        table.add_row(vec![tier.label().to_string(), xp.to_string()]);
    }
    println!("{table}");

    Ok(())
}
