//! Manage CLI - Command-line front-end for the metadata registry console core

use anyhow::Context;
use clap::Parser;
use manage_core::{AuditData, ChangeTarget, Console, EntityType, ManageConfig, RefreshOutcome};
use manage_document::{
    diff, expand, fingerprint, fingerprint_hex, parse_mapping, sort_in_place, Document, Mapping,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "manage")]
#[command(about = "Manage - Metadata registry console utilities")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Expand dotted form keys into a nested document
    Expand {
        /// Flat JSON object
        file: PathBuf,
    },
    /// Extract the original values of every field the candidate touches
    Diff {
        /// Stored entity
        original: PathBuf,
        /// Edited (nested) entity
        candidate: PathBuf,
    },
    /// Sort every list in a document
    Sort {
        /// JSON object
        file: PathBuf,
    },
    /// Print the order-insensitive SHA-256 fingerprint of a document
    Fingerprint {
        /// JSON object
        file: PathBuf,
    },
    /// Build a change request from flat form values
    ChangeRequest {
        /// Stored entity
        original: PathBuf,
        /// Flat form values
        form: PathBuf,
        /// Entity identifier
        #[arg(long)]
        id: String,
        /// Entity type, e.g. saml20_sp
        #[arg(long = "type")]
        entity_type: String,
        /// Submitting user
        #[arg(long)]
        user: String,
        /// Optional note
        #[arg(long)]
        note: Option<String>,
    },
    /// Apply an auto-refresh to an entity
    Refresh {
        /// Stored entity
        entity: PathBuf,
        /// Result of the metadata import
        imported: PathBuf,
        /// Entity type, e.g. saml20_idp
        #[arg(long = "type")]
        entity_type: String,
        /// Entity-type schema
        #[arg(long)]
        schema: Option<PathBuf>,
    },
    /// Strip fields an entity-type schema does not declare
    Prune {
        /// Stored entity
        entity: PathBuf,
        /// Entity-type schema
        schema: PathBuf,
    },
    /// Check configuration validity
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ManageConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ManageConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.global.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let console = Console::new(config)?;
    run(cli.command, &console)
}

fn run(command: Option<Commands>, console: &Console) -> anyhow::Result<()> {
    match command {
        Some(Commands::Expand { file }) => {
            let flat = read_mapping(&file)?;
            print_json(&expand(&flat))?;
        }
        Some(Commands::Diff {
            original,
            candidate,
        }) => {
            let original = read_mapping(&original)?;
            let candidate = read_mapping(&candidate)?;
            print_json(&diff(&original, &candidate))?;
        }
        Some(Commands::Sort { file }) => {
            let mut doc = read_mapping(&file)?;
            sort_in_place(&mut doc);
            print_json(&doc)?;
        }
        Some(Commands::Fingerprint { file }) => {
            let doc = Document::Object(read_mapping(&file)?);
            println!("{}", fingerprint_hex(&fingerprint(&doc)));
        }
        Some(Commands::ChangeRequest {
            original,
            form,
            id,
            entity_type,
            user,
            note,
        }) => {
            let entity_type: EntityType = entity_type.parse()?;
            let mut audit = AuditData::new(user);
            if let Some(note) = note {
                audit = audit.with_note(note);
            }
            let request = console.change_request(
                &read_mapping(&original)?,
                &read_mapping(&form)?,
                ChangeTarget::new(id, entity_type),
                audit,
            )?;
            print_json(&request)?;
        }
        Some(Commands::Refresh {
            entity,
            imported,
            entity_type,
            schema,
        }) => {
            let entity_type: EntityType = entity_type.parse()?;
            let mut entity = read_mapping(&entity)?;
            let imported = read_mapping(&imported)?;
            let schema = schema
                .map(|path| read_mapping(&path).map(Document::Object))
                .transpose()?;

            match console.refresh(entity_type, &mut entity, &imported, schema.as_ref())? {
                RefreshOutcome::Skipped(reason) => info!("Skipped: {}", reason),
                RefreshOutcome::Planned(_) => print_json(&entity)?,
            }
        }
        Some(Commands::Prune { entity, schema }) => {
            let mut entity = read_mapping(&entity)?;
            let schema = Document::Object(read_mapping(&schema)?);
            let removed = console.prune(&mut entity, &schema)?;
            for path in removed {
                info!("Removed: {}", path);
            }
            print_json(&entity)?;
        }
        Some(Commands::Check) => {
            println!("Configuration OK");
            println!("{}", config_summary(console.config()));
        }
        None => {
            println!("Manage v{} - Use --help for commands", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn read_mapping(path: &Path) -> anyhow::Result<Mapping> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_mapping(&text).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn config_summary(config: &ManageConfig) -> String {
    format!(
        "reject_unchanged = {}\nupdate_user = {:?}\nlog_filter = {:?}",
        config.change_request.reject_unchanged,
        config.refresh.update_user,
        config.global.log_filter
    )
}
