//! CLI frontend for the Ficha character sheet and combat rules engine.

mod commands;
mod input;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ficha",
    about = "Ficha: character sheets, initiative, and skill checks",
    version,
    propagate_version = true
)]
struct Cli {
    /// Catalog JSON file (default: the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// House rules JSON file (default: built-in rules)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every effective value on a character sheet
    Sheet {
        /// Character JSON file
        file: PathBuf,

        /// Also list the trait effects behind the numbers
        #[arg(short, long)]
        effects: bool,
    },

    /// Print the effective value of one skill or attribute
    Value {
        /// Character JSON file
        file: PathBuf,

        /// Skill name, specialization category, or attribute
        label: String,

        /// Sub-skill text for a specialization category
        #[arg(short, long)]
        sub: Option<String>,
    },

    /// Order initiative for the first round of an encounter
    Initiative {
        /// Encounter JSON file
        file: PathBuf,
    },

    /// Resolve every check batch in an encounter file, in order
    Check {
        /// Encounter JSON file
        file: PathBuf,
    },

    /// Validate the catalog and any number of characters
    Validate {
        /// Character JSON files
        files: Vec<PathBuf>,
    },

    /// List reference data from the catalog
    Catalog {
        /// Table to list: skills, lineages, peculiarities, trejeitos,
        /// advantages, disadvantages (default: all)
        table: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = commands::load_book(cli.catalog.as_deref(), cli.rules.as_deref()).and_then(
        |book| match cli.command {
            Commands::Sheet { file, effects } => commands::sheet::run(&book, &file, effects),
            Commands::Value { file, label, sub } => {
                commands::value::run(&book, &file, &label, sub.as_deref())
            }
            Commands::Initiative { file } => commands::initiative::run(&book, &file),
            Commands::Check { file } => commands::check::run(&book, &file),
            Commands::Validate { files } => commands::validate::run(&book, &files),
            Commands::Catalog { table } => commands::catalog::run(&book, table.as_deref()),
        },
    );

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
