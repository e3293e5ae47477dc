//! `lsync query`: list every invoice in a ledger.

use std::io::{self, Write};
use std::path::Path;

use ledgersync_ledger::{FileLedger, StoredInvoice};
use ledgersync_recon::money::format_minor;

use crate::CliError;

pub fn cmd_query(ledger: &Path, json: bool) -> Result<(), CliError> {
    let ledger = FileLedger::open(ledger).map_err(|e| CliError::ledger(&e))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        let json_str = serde_json::to_string_pretty(ledger.invoices())
            .map_err(|e| CliError::error(format!("JSON serialization error: {e}")))?;
        writeln!(out, "{json_str}").map_err(|e| CliError::error(e.to_string()))?;
        return Ok(());
    }

    for invoice in ledger.invoices() {
        write!(out, "{}", render_invoice(invoice)).map_err(|e| CliError::error(e.to_string()))?;
        writeln!(out).map_err(|e| CliError::error(e.to_string()))?;
    }
    eprintln!("{} invoice(s)", ledger.invoices().len());
    Ok(())
}

fn money(minor: i64) -> String {
    let s = format_minor(minor);
    match s.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${s}"),
    }
}

pub fn render_invoice(invoice: &StoredInvoice) -> String {
    let mut s = String::new();
    s.push_str(&format!("Invoice TxnID: {}\n", invoice.txn_id));
    s.push_str(&format!("Customer Name: {}\n", invoice.customer_name));
    s.push_str(&format!("Invoice Date: {}\n", invoice.txn_date.format("%Y-%m-%d")));
    s.push_str(&format!(
        "Invoice Number: {}\n",
        invoice.ref_number.as_deref().unwrap_or("")
    ));
    if let Some(memo) = &invoice.memo {
        s.push_str(&format!("Memo: {memo}\n"));
    }
    s.push_str(&format!("Total Amount: {}\n", money(invoice.subtotal_minor)));
    s.push_str("Items:\n");
    for line in &invoice.lines {
        let price = line.rate_minor.map(money).unwrap_or_default();
        s.push_str(&format!(
            "  - {} | Quantity: {} | Price: {} | Total: {}\n",
            line.item_name,
            line.quantity,
            price,
            money(line.amount_minor)
        ));
    }
    s
}
