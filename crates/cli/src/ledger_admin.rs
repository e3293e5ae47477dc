//! `lsync ledger ...`: create a ledger file and manage its reference data.

use std::path::PathBuf;

use clap::Subcommand;
use ledgersync_ledger::FileLedger;
use ledgersync_recon::money::parse_money;

use crate::CliError;

#[derive(Subcommand)]
pub enum LedgerCommands {
    /// Create an empty ledger file
    #[command(after_help = "\
Examples:
  lsync ledger init books/ledger.json")]
    Init {
        /// Ledger file to create (must not exist)
        file: PathBuf,
    },

    /// Register a customer
    #[command(after_help = "\
Examples:
  lsync ledger add-customer ledger.json 'Musharaf Ahmed'")]
    AddCustomer {
        /// Ledger file
        file: PathBuf,
        /// Customer name
        name: String,
    },

    /// Register an item, optionally with a unit price
    #[command(after_help = "\
Examples:
  lsync ledger add-item ledger.json Laptop --price 999.00
  lsync ledger add-item ledger.json 'Consulting hour'")]
    AddItem {
        /// Ledger file
        file: PathBuf,
        /// Item name
        name: String,
        /// Unit price, e.g. 25 or 1,299.99
        #[arg(long)]
        price: Option<String>,
    },
}

pub fn cmd_ledger(cmd: LedgerCommands) -> Result<(), CliError> {
    match cmd {
        LedgerCommands::Init { file } => {
            FileLedger::create(&file).map_err(|e| CliError::ledger(&e))?;
            eprintln!("created {}", file.display());
            Ok(())
        }
        LedgerCommands::AddCustomer { file, name } => {
            let mut ledger = FileLedger::open(&file).map_err(|e| CliError::ledger(&e))?;
            let id = ledger.add_customer(&name).map_err(|e| CliError::ledger(&e))?;
            println!("{id}");
            Ok(())
        }
        LedgerCommands::AddItem { file, name, price } => {
            let price = price
                .as_deref()
                .map(parse_money)
                .transpose()
                .map_err(|e| CliError::usage(format!("invalid --price: {e}")))?;
            let mut ledger = FileLedger::open(&file).map_err(|e| CliError::ledger(&e))?;
            let id = ledger.add_item(&name, price).map_err(|e| CliError::ledger(&e))?;
            println!("{id}");
            Ok(())
        }
    }
}
