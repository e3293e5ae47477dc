// lsync - reconcile intended invoices against a ledger and create what is missing

mod add;
mod exit_codes;
mod ledger_admin;
mod query;
mod reconcile;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use ledgersync_recon::{LedgerError, ReconError};
use tracing_subscriber::EnvFilter;

use exit_codes::{ledger_exit_code, recon_exit_code, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "lsync")]
#[command(about = "Reconcile intended invoices against a ledger and create the missing ones")]
#[command(version)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Diff local invoices against the ledger, create new ones, report all
    #[command(after_help = "\
Examples:
  lsync reconcile sync.toml
  lsync reconcile sync.toml --json
  lsync reconcile sync.toml --output result.json --fail-on-drift
  lsync reconcile            (uses <config dir>/ledgersync/sync.toml)")]
    Reconcile {
        /// Path to the sync config (TOML)
        config: Option<PathBuf>,

        /// Output the result as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file (overrides [output] json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit 1 when Different or Missing invoices remain
        #[arg(long)]
        fail_on_drift: bool,
    },

    /// Parse and validate a sync config without running it
    Validate {
        /// Path to the sync config (TOML)
        config: Option<PathBuf>,
    },

    /// Create invoices in a ledger without reconciling
    #[command(after_help = "\
Examples:
  lsync add --ledger ledger.json --customer 'Shazeb Khan' --number INV-123457 \\
      --memo PNW --item Laptop:1 --item Mouse:2
  lsync add --ledger ledger.json --file invoices.csv")]
    Add(add::AddArgs),

    /// List every invoice in a ledger
    Query {
        /// Ledger file
        #[arg(long, env = "LSYNC_LEDGER")]
        ledger: PathBuf,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Ledger file administration
    Ledger {
        #[command(subcommand)]
        command: ledger_admin::LedgerCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Reconcile { config, json, output, fail_on_drift } => {
            reconcile::cmd_reconcile(config, json, output, fail_on_drift)
        }
        Commands::Validate { config } => reconcile::cmd_validate(config),
        Commands::Add(args) => add::cmd_add(args),
        Commands::Query { ledger, json } => query::cmd_query(&ledger, json),
        Commands::Ledger { command } => ledger_admin::cmd_ledger(command),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn ledger(err: &LedgerError) -> Self {
        let hint = match err {
            LedgerError::Locked(_) => {
                Some("another lsync process has this ledger open; retry when it finishes".to_string())
            }
            _ => None,
        };
        Self { code: ledger_exit_code(err), message: err.to_string(), hint }
    }

    pub fn recon(err: &ReconError) -> Self {
        let hint = match err {
            ReconError::MissingKey { .. } => {
                Some("set [policy] missing_key = \"skip\" to drop records without a number".to_string())
            }
            ReconError::MissingColumn { .. } => {
                Some("map the column under [local.columns] in the config".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
