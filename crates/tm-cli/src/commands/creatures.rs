use std::path::Path;

use clap::Args;
use comfy_table::{ContentArrangement, Table};
use tm_core::{FilterCriteria, KeywordFilter, MatchMode};
use tm_encounter::EncounterConfig;

/// Catalog filter flags.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Case-insensitive substring of the creature name
    #[arg(long)]
    pub name: Option<String>,

    /// Lowest level to show (default: -1)
    #[arg(long, allow_hyphen_values = true)]
    pub min_level: Option<i32>,

    /// Highest level to show (default: 25)
    #[arg(long, allow_hyphen_values = true)]
    pub max_level: Option<i32>,

    /// Trait to look for (repeatable)
    #[arg(long = "trait", value_name = "TRAIT")]
    pub traits: Vec<String>,

    /// Require every --trait instead of any
    #[arg(long)]
    pub all_traits: bool,

    /// Immunity to look for (repeatable)
    #[arg(long = "immunity", value_name = "KEYWORD")]
    pub immunities: Vec<String>,

    /// Require every --immunity instead of any
    #[arg(long)]
    pub all_immunities: bool,

    /// Weakness to look for (repeatable)
    #[arg(long = "weakness", value_name = "KEYWORD")]
    pub weaknesses: Vec<String>,

    /// Require every --weakness instead of any
    #[arg(long)]
    pub all_weaknesses: bool,

    /// Resistance to look for (repeatable); "all-damage" resistances always match
    #[arg(long = "resistance", value_name = "KEYWORD")]
    pub resistances: Vec<String>,

    /// Require every --resistance instead of any
    #[arg(long)]
    pub all_resistances: bool,
}

fn group(keywords: &[String], all: bool) -> KeywordFilter {
    KeywordFilter::new(keywords.iter().cloned(), MatchMode::from(all))
}

impl FilterArgs {
    /// Criteria for these flags, starting from the configured level range.
    pub fn to_criteria(&self, config: &EncounterConfig) -> FilterCriteria {
        FilterCriteria {
            name: self.name.clone().unwrap_or_default(),
            min_level: self.min_level.unwrap_or(config.min_level),
            max_level: self.max_level.unwrap_or(config.max_level),
            traits: group(&self.traits, self.all_traits),
            immunities: group(&self.immunities, self.all_immunities),
            weaknesses: group(&self.weaknesses, self.all_weaknesses),
            resistances: group(&self.resistances, self.all_resistances),
        }
    }
}

/// List the catalog creatures that pass the filter.
pub async fn run(catalog_path: &Path, filter: &FilterArgs) -> Result<(), String> {
    let catalog = super::open_catalog(catalog_path).await?;
    let config = EncounterConfig::default();
    let mut session = super::session_over(&catalog, config).await?;
    let criteria = filter.to_criteria(session.config());
    session.set_filter(criteria);

    let results = session.filtered();
    if results.is_empty() {
        println!("  No creatures found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Level", "Traits"]);
    for creature in results {
        let traits = if creature.traits.is_empty() {
            "-".to_string()
        } else {
            creature.traits.join(", ")
        };
        table.add_row(vec![
            creature.id.0.to_string(),
            creature.name.clone(),
            creature.level.to_string(),
            traits,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} of {} creatures", results.len(), session.catalog().len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_criteria() {
        let args = FilterArgs {
            name: Some("war".into()),
            min_level: Some(0),
            traits: vec!["humanoid".into(), "goblin".into()],
            all_traits: true,
            resistances: vec!["fire".into()],
            ..FilterArgs::default()
        };
        let criteria = args.to_criteria(&EncounterConfig::default());
        assert_eq!(criteria.name, "war");
        assert_eq!((criteria.min_level, criteria.max_level), (0, 25));
        assert_eq!(criteria.traits.mode, MatchMode::All);
        assert_eq!(criteria.traits.keywords.len(), 2);
        assert_eq!(criteria.resistances.mode, MatchMode::Any);
        assert!(!criteria.immunities.is_active());
    }
}
