use clap::{Parser, Subcommand};
use std::path::PathBuf;
use str_docsearch::cli;
use str_docsearch::config::AppConfig;
use str_docsearch::error::DocSearchResult;
use str_docsearch::search::SearchField;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Translate Marathi property registration spreadsheets and search document details.")]
#[command(long_about = "STR Document Search - property registration spreadsheets

Two modes, each self-contained:

COMMANDS:
  translate   - Translate Marathi Excel Files (then optionally search them)
  search      - Search Document Details in English Excel files
  fields      - List the columns 'search' can look in

Searches are case-insensitive and literal: '.', '*', '(' and friends match
themselves.

EXAMPLES:
  docsearch translate haveli.xlsx mulshi.xls -o exports/
  docsearch translate haveli.xlsx --search \"flat no\"
  docsearch search jan.xlsx feb.xlsx --column SellerParty --value patil

CONFIG:
  Settings are read from docsearch.yaml in the working directory, or from
  the file given with --config. Logging follows RUST_LOG.")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file (default: ./docsearch.yaml if present)
    #[arg(short, long, global = true, env = "DOCSEARCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Translate Marathi Excel files to English.

Every filled cell of the first worksheet is sent to the translation
service. A cell that still fails after the configured number of attempts
keeps its original text; the run never stops on a single cell.

Each input produces translated_<file name> in the output directory.
Legacy .xls inputs are written as .xlsx.

With --search, the freshly translated files are searched on their
PropertyDescription column before the command exits.")]
    /// Translate Marathi Excel files to English
    Translate {
        /// Excel files (.xls / .xlsx) to translate
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Directory for translated_<name> exports
        #[arg(short, long, env = "DOCSEARCH_OUTPUT_DIR")]
        output_dir: Option<PathBuf>,

        /// Property description text to search for after translating
        #[arg(short, long)]
        search: Option<String>,

        /// Show verbose translation steps
        #[arg(short, long)]
        verbose: bool,
    },

    #[command(long_about = "Search document details in English Excel files.

Files must carry the full column set of one of the two known registration
office exports (lower-case or mixed-case names). Extra columns are ignored.
Files that cannot be opened or match neither layout are skipped with a
warning.

COLUMNS:
  DocNo, RegistrationDate, SellerParty, PurchaserParty,
  PropertyDescription (default), DateOfExecution")]
    /// Search document details in English Excel files
    Search {
        /// Excel files (.xls / .xlsx) to search
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Column to search
        #[arg(long, default_value = "PropertyDescription")]
        column: SearchField,

        /// Text to look for (empty matches every filled cell)
        #[arg(long, default_value = "")]
        value: String,
    },

    /// List searchable columns
    Fields,
}

fn main() -> DocSearchResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "str_docsearch=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Translate {
            files,
            output_dir,
            search,
            verbose,
        } => cli::translate(files, output_dir, search, &config, verbose),

        Commands::Search {
            files,
            column,
            value,
        } => cli::search(files, column, value),

        Commands::Fields => cli::fields(),
    }
}
