//! Strata Command-Line Interface
//!
//! Loads a metadata artifact and prints what the schema builder made of it.
//!
//! # Usage
//!
//! ```bash
//! # List every table with its group and ordinal
//! strata schema metadata.bin
//!
//! # Show the hierarchical key layout of one table
//! strata hkey metadata.bin shop.items
//!
//! # List groups with their storage tables and members
//! strata groups metadata.bin
//!
//! # Print the default loader configuration
//! strata config
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use strata_common::LoaderConfig;
use strata_schema::{Schema, SchemaReader, TableName};

mod formatter;

/// Strata metadata inspector
#[derive(Parser, Debug)]
#[command(
    name = "strata",
    version,
    about = "Inspect Strata metadata artifacts",
    long_about = "Loads a length-prefixed metadata artifact, builds the schema graph,\n\
                  and prints tables, groups, and hierarchical key layouts."
)]
struct Args {
    /// Loader configuration file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the tables of an artifact
    Schema {
        /// Artifact file
        artifact: PathBuf,
    },
    /// Show the hierarchical key of a table
    Hkey {
        /// Artifact file
        artifact: PathBuf,
        /// Qualified table name (schema.table)
        table: String,
    },
    /// List the groups of an artifact
    Groups {
        /// Artifact file
        artifact: PathBuf,
    },
    /// Print the effective loader configuration as TOML
    Config,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let config = match &args.config {
        Some(path) => LoaderConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LoaderConfig::default(),
    };

    match &args.command {
        Command::Schema { artifact } => {
            let schema = load(&config, artifact)?;
            println!("{}", formatter::format_tables(&schema));
        }
        Command::Hkey { artifact, table } => {
            let schema = load(&config, artifact)?;
            let name = parse_table_name(table)?;
            let table = schema
                .table_by_qualified(&name)
                .ok_or_else(|| anyhow!("no table named {name}"))?;
            let hkey = schema.hkey(table.id())?;
            println!("{}", formatter::format_hkey(&schema, &hkey));
        }
        Command::Groups { artifact } => {
            let schema = load(&config, artifact)?;
            println!("{}", formatter::format_groups(&schema));
        }
        Command::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("strata_cli=debug,strata_schema=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn load(config: &LoaderConfig, artifact: &Path) -> Result<Schema> {
    info!("Loading artifact {}", artifact.display());
    SchemaReader::new(config.clone())
        .load_file(artifact)
        .with_context(|| format!("failed to load {}", artifact.display()))
}

fn parse_table_name(name: &str) -> Result<TableName> {
    match name.split_once('.') {
        Some((schema, table)) if !schema.is_empty() && !table.is_empty() => {
            Ok(TableName::new(schema, table))
        }
        _ => Err(anyhow!("expected schema.table, got {name:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_table_name() {
        let name = parse_table_name("shop.items").unwrap();
        assert_eq!(name.schema(), "shop");
        assert_eq!(name.table(), "items");

        assert!(parse_table_name("items").is_err());
        assert!(parse_table_name(".items").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["strata", "-v", "hkey", "meta.bin", "s.t"]).unwrap();
        assert!(args.verbose);
        assert!(matches!(args.command, Command::Hkey { ref table, .. } if table == "s.t"));
    }
}
