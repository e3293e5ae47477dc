//! `lsync add`: create invoices directly, without reconciling first.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use ledgersync_ledger::FileLedger;
use ledgersync_recon::config::ColumnMapping;
use ledgersync_recon::loader::load_local_file;
use ledgersync_recon::{InvoiceRecord, LedgerStore, LineItem};
use tracing::{info, warn};

use crate::exit_codes::EXIT_CREATE_FAILED;
use crate::CliError;

#[derive(Args)]
pub struct AddArgs {
    /// Ledger file to create the invoices in
    #[arg(long, env = "LSYNC_LEDGER")]
    pub ledger: PathBuf,

    /// Read invoices from a .csv or .json file instead of flags
    #[arg(long, conflicts_with_all = ["customer", "date", "number", "memo", "items"])]
    pub file: Option<PathBuf>,

    /// Customer name
    #[arg(long, required_unless_present = "file")]
    pub customer: Option<String>,

    /// Invoice date (YYYY-MM-DD, default today)
    #[arg(long)]
    pub date: Option<String>,

    /// Invoice number
    #[arg(long, required_unless_present = "file")]
    pub number: Option<String>,

    /// Memo
    #[arg(long)]
    pub memo: Option<String>,

    /// Line item as NAME:QTY. Repeatable.
    #[arg(long = "item", value_name = "NAME:QTY", required_unless_present = "file")]
    pub items: Vec<String>,
}

pub fn cmd_add(args: AddArgs) -> Result<(), CliError> {
    let records = match &args.file {
        Some(path) => load_local_file(path, &ColumnMapping::default())
            .map_err(|e| CliError::recon(&e))?,
        None => vec![record_from_flags(&args)?],
    };

    if records.is_empty() {
        eprintln!("nothing to add");
        return Ok(());
    }

    let mut ledger = FileLedger::open(&args.ledger).map_err(|e| CliError::ledger(&e))?;

    let outcomes = ledger.create_batch(&records);
    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(id) => {
                info!(key = %outcome.key, txn_id = %id, "invoice created");
                println!("Invoice {} created with id {}.", outcome.key, id);
            }
            Err(err) => {
                failed += 1;
                warn!(key = %outcome.key, "invoice rejected: {err}");
                println!("Invoice {} could not be created: {}", outcome.key, err);
            }
        }
    }

    if failed > 0 {
        return Err(CliError {
            code: EXIT_CREATE_FAILED,
            message: format!("{failed} of {} invoice(s) could not be created", outcomes.len()),
            hint: None,
        });
    }
    Ok(())
}

fn record_from_flags(args: &AddArgs) -> Result<InvoiceRecord, CliError> {
    let date = match &args.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            CliError::usage(format!("invalid --date '{raw}'")).with_hint("use YYYY-MM-DD")
        })?,
        None => chrono::Local::now().date_naive(),
    };

    let line_items = args
        .items
        .iter()
        .map(|raw| parse_item(raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(InvoiceRecord {
        key: args.number.clone(),
        customer_name: args.customer.clone(),
        date: Some(date),
        memo: args.memo.clone(),
        line_items,
        ..InvoiceRecord::default()
    })
}

/// `Laptop:2` → item "Laptop", quantity 2. A bare name means quantity 1.
fn parse_item(raw: &str) -> Result<LineItem, CliError> {
    let (name, quantity) = match raw.rsplit_once(':') {
        Some((name, qty)) => {
            let qty: i64 = qty.trim().parse().map_err(|_| {
                CliError::usage(format!("invalid quantity in --item '{raw}'"))
                    .with_hint("use NAME:QTY, e.g. --item Laptop:2")
            })?;
            (name, qty)
        }
        None => (raw, 1),
    };
    Ok(LineItem {
        item_name: name.trim().to_string(),
        quantity: Some(quantity),
        ..LineItem::default()
    })
}
