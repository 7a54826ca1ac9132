//! Main CLI application structure

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{ingest, mask_cmd, note, watch};
use crate::storage::{Config, IngestOptions, Vault};

#[derive(Parser)]
#[command(name = "maskvault")]
#[command(author, version, about = "Local-first mask-driven note routing for PARA-style vaults")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Path to a configuration file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a vault skeleton
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Parse a mask and print its fields
    Parse {
        /// Mask string, e.g. NOTE.ENG.AC@PROJ-X
        mask: String,
    },

    /// Validate a mask and report every violated rule
    Validate {
        /// Mask string
        mask: String,
    },

    /// Show the canonical file name and directory for a mask
    Route {
        /// Mask string
        mask: String,

        /// Vault root (defaults to the configured or enclosing vault)
        #[arg(long)]
        vault: Option<PathBuf>,
    },

    /// Create a routed note with generated frontmatter
    New {
        /// Mask string
        mask: String,

        /// Note body
        #[arg(long, short, default_value = "")]
        body: String,

        /// Vault root
        #[arg(long)]
        vault: Option<PathBuf>,
    },

    /// Route loose inbox files once
    Ingest {
        /// Vault root
        #[arg(long)]
        vault: Option<PathBuf>,

        /// Report moves without performing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Watch the inbox and route files as they settle
    Watch {
        /// Vault root
        #[arg(long)]
        vault: Option<PathBuf>,

        /// Seconds of quiet before a file is ingested
        #[arg(long)]
        debounce: Option<u64>,

        /// Report moves without performing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show vault statistics
    Status {
        /// Vault root
        #[arg(long)]
        vault: Option<PathBuf>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);
    let config_path = cli.config;

    match cli.command {
        Commands::Init { path } => {
            let vault = Vault::init(&path)?;
            output.success(&format!("Initialized vault at {}", vault.root().display()));
            Ok(())
        }

        Commands::Parse { mask } => mask_cmd::parse(&output, &mask),

        Commands::Validate { mask } => mask_cmd::validate(&output, &mask),

        Commands::Route { mask, vault } => {
            let config = Config::load(config_path.as_deref(), vault.as_deref())?;
            let root = resolve_root(&config, vault);
            mask_cmd::route(&output, &mask, &root)
        }

        Commands::New { mask, body, vault } => {
            let config = Config::load(config_path.as_deref(), vault.as_deref())?;
            let vault = Vault::open(resolve_root(&config, vault))?;
            note::run(&output, &mask, &body, &vault)
        }

        Commands::Ingest { vault, dry_run } => {
            let config = Config::load(config_path.as_deref(), vault.as_deref())?;
            let opts = IngestOptions {
                dry_run: dry_run || config.watch.dry_run,
                dedup: config.watch.dedup,
            };
            let vault = Vault::open(resolve_root(&config, vault))?;
            ingest::sweep(&output, &vault, &opts)
        }

        Commands::Watch {
            vault,
            debounce,
            dry_run,
        } => {
            let config = Config::load(config_path.as_deref(), vault.as_deref())?;
            let opts = IngestOptions {
                dry_run: dry_run || config.watch.dry_run,
                dedup: config.watch.dedup,
            };
            let debounce = Duration::from_secs(debounce.unwrap_or(config.watch.debounce_seconds));
            let vault = Vault::open(resolve_root(&config, vault))?;
            watch::run(&output, &vault, debounce, &opts)
        }

        Commands::Status { vault } => {
            let config = Config::load(config_path.as_deref(), vault.as_deref())?;
            let vault = Vault::open(resolve_root(&config, vault))?;
            ingest::status(&output, &vault)
        }
    }
}

/// Resolves the vault root: explicit flag, then configuration, then the
/// enclosing vault, then the current directory.
fn resolve_root(config: &Config, flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| config.vault.path.clone())
        .or_else(Vault::find_root)
        .unwrap_or_else(|| PathBuf::from("."))
}
