//! CLI frontend for the Trailmarker encounter engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tm_encounter::EncounterId;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tm",
    about = "Trailmarker: build encounters and judge how dangerous they are",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the XP budget for a party
    Budget {
        /// Number of characters in the party
        party_size: u32,
    },

    /// List catalog creatures matching a filter
    Creatures {
        #[command(flatten)]
        filter: commands::creatures::FilterArgs,

        /// Catalog file (`{"enemies": [...]}`)
        #[arg(short, long)]
        catalog: PathBuf,
    },

    /// Build an encounter from creature ids and save it
    Save {
        /// Encounter name
        #[arg(short, long)]
        name: String,

        /// Creature id to add; repeat an id to add more than one
        #[arg(short, long = "add", value_name = "ID", required = true)]
        add: Vec<u64>,

        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,

        /// Directory holding saved encounters
        #[arg(short, long, default_value = "encounters")]
        store: PathBuf,
    },

    /// List saved encounters
    Encounters {
        /// Directory holding saved encounters
        #[arg(short, long, default_value = "encounters")]
        store: PathBuf,
    },

    /// Load a saved encounter and rate its difficulty
    Assess {
        /// Saved encounter id
        id: EncounterId,

        /// Party size (default: 4)
        #[arg(long)]
        party_size: Option<u32>,

        /// Party level (default: 1)
        #[arg(long, allow_hyphen_values = true)]
        party_level: Option<i32>,

        /// Take party size and level from a character file instead
        #[arg(long, conflicts_with_all = ["party_size", "party_level"])]
        characters: Option<PathBuf>,

        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,

        /// Directory holding saved encounters
        #[arg(short, long, default_value = "encounters")]
        store: PathBuf,
    },

    /// Print the combat simulator request for a saved encounter
    Simulate {
        /// Saved encounter id
        id: EncounterId,

        /// Catalog file
        #[arg(short, long)]
        catalog: PathBuf,

        /// Directory holding saved encounters
        #[arg(short, long, default_value = "encounters")]
        store: PathBuf,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Budget { party_size } => commands::budget::run(party_size),
        Commands::Creatures { filter, catalog } => {
            commands::creatures::run(&catalog, &filter).await
        }
        Commands::Save {
            name,
            add,
            catalog,
            store,
        } => commands::save::run(&catalog, &store, &name, &add).await,
        Commands::Encounters { store } => commands::encounters::run(&store).await,
        Commands::Assess {
            id,
            party_size,
            party_level,
            characters,
            catalog,
            store,
        } => {
            let party = commands::assess::PartyArgs {
                size: party_size,
                level: party_level,
                characters,
            };
            commands::assess::run(&catalog, &store, id, &party).await
        }
        Commands::Simulate { id, catalog, store } => {
            commands::simulate::run(&catalog, &store, id).await
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
