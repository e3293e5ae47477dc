//! Turn an intended invoice into a ledger-ready draft.
//!
//! Header problems reject the whole invoice. Line problems only drop the line,
//! but an invoice left with no valid line is rejected too.

use chrono::{DateTime, NaiveDate, Utc};
use ledgersync_recon::money::format_minor;
use ledgersync_recon::{InvoiceRecord, LedgerError};

use crate::document::{LedgerDocument, StoredInvoice, StoredLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub ref_number: String,
    pub customer_list_id: String,
    pub customer_name: String,
    pub txn_date: NaiveDate,
    pub memo: Option<String>,
    pub lines: Vec<StoredLine>,
    /// Sum of line amounts, checked in [`prepare`].
    pub subtotal_minor: i64,
    /// Why each dropped line was dropped.
    pub notes: Vec<String>,
}

impl Draft {
    pub fn into_stored(self, txn_id: String, time_created: DateTime<Utc>) -> StoredInvoice {
        StoredInvoice {
            txn_id,
            time_created,
            ref_number: Some(self.ref_number),
            customer_list_id: self.customer_list_id,
            customer_name: self.customer_name,
            txn_date: self.txn_date,
            memo: self.memo,
            subtotal_minor: self.subtotal_minor,
            lines: self.lines,
        }
    }
}

pub fn prepare(doc: &LedgerDocument, record: &InvoiceRecord) -> Result<Draft, LedgerError> {
    let txn_date = record
        .date
        .ok_or_else(|| LedgerError::Rejected("invoice date is missing".into()))?;

    let ref_number = record
        .key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| LedgerError::Rejected("invoice number is missing".into()))?
        .to_string();

    if doc.has_ref_number(&ref_number) {
        return Err(LedgerError::Rejected(format!(
            "invoice number '{ref_number}' already exists"
        )));
    }

    let customer_name = record.customer_name.as_deref().unwrap_or("").trim();
    let customer = doc.find_customer(customer_name).ok_or_else(|| {
        LedgerError::Rejected(format!("customer '{customer_name}' not found"))
    })?;

    let mut lines = Vec::new();
    let mut notes = Vec::new();
    for line in &record.line_items {
        let name = line.item_name.trim();
        if name.is_empty() {
            notes.push("skipping item with empty name".to_string());
            continue;
        }
        let Some(item) = doc.find_item(name) else {
            notes.push(format!("item '{name}' not found"));
            continue;
        };
        let quantity = match line.quantity {
            Some(q) if q > 0 => q,
            _ => {
                notes.push(format!("invalid quantity for item '{name}'"));
                continue;
            }
        };
        let rate_minor = line.unit_price_minor.or(item.unit_price_minor);
        let amount_minor = match rate_minor {
            Some(rate) => rate.checked_mul(quantity).ok_or_else(|| {
                LedgerError::Rejected(format!("line amount for item '{name}' overflows"))
            })?,
            None => line.amount_minor.unwrap_or(0),
        };
        lines.push(StoredLine {
            item_list_id: item.list_id.clone(),
            item_name: item.name.clone(),
            quantity,
            rate_minor,
            amount_minor,
        });
    }

    if lines.is_empty() {
        let mut reason = String::from("no valid line items");
        if !notes.is_empty() {
            reason.push_str(&format!(" ({})", notes.join("; ")));
        }
        return Err(LedgerError::Rejected(reason));
    }

    let subtotal_minor = lines
        .iter()
        .try_fold(0i64, |acc, l| acc.checked_add(l.amount_minor))
        .ok_or_else(|| LedgerError::Rejected("invoice subtotal overflows".into()))?;

    let draft = Draft {
        ref_number,
        customer_list_id: customer.list_id.clone(),
        customer_name: customer.name.clone(),
        txn_date,
        memo: record.memo.clone(),
        lines,
        subtotal_minor,
        notes,
    };

    if let Some(intended) = record.amount_minor {
        let subtotal = draft.subtotal_minor;
        if intended != subtotal {
            tracing::warn!(
                "invoice {}: amount {} differs from computed subtotal {}",
                draft.ref_number,
                format_minor(intended),
                format_minor(subtotal)
            );
        }
    }

    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Customer, Item};
    use ledgersync_recon::LineItem;

    fn doc() -> LedgerDocument {
        LedgerDocument {
            customers: vec![Customer { list_id: "C1".into(), name: "Musharaf Ahmed".into() }],
            items: vec![
                Item { list_id: "I1".into(), name: "Laptop".into(), unit_price_minor: Some(1299) },
                Item { list_id: "I2".into(), name: "Mouse".into(), unit_price_minor: None },
            ],
            invoices: Vec::new(),
        }
    }

    fn line(name: &str, qty: Option<i64>) -> LineItem {
        LineItem { item_name: name.into(), quantity: qty, ..LineItem::default() }
    }

    fn record() -> InvoiceRecord {
        InvoiceRecord {
            key: Some("INV-123456".into()),
            customer_name: Some("Musharaf Ahmed".into()),
            date: NaiveDate::from_ymd_opt(2025, 3, 1),
            memo: Some("PNW".into()),
            line_items: vec![line("Laptop", Some(2))],
            ..InvoiceRecord::default()
        }
    }

    fn rejected(result: Result<Draft, LedgerError>) -> String {
        match result {
            Err(LedgerError::Rejected(msg)) => msg,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn valid_invoice_prices_lines_from_the_item_list() {
        let draft = prepare(&doc(), &record()).unwrap();
        assert_eq!(draft.customer_list_id, "C1");
        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].rate_minor, Some(1299));
        assert_eq!(draft.lines[0].amount_minor, 2598);
        assert_eq!(draft.subtotal_minor, 2598);
    }

    #[test]
    fn record_unit_price_overrides_item_price() {
        let mut r = record();
        r.line_items[0].unit_price_minor = Some(1000);
        let draft = prepare(&doc(), &r).unwrap();
        assert_eq!(draft.lines[0].amount_minor, 2000);
    }

    #[test]
    fn unpriced_item_uses_line_amount() {
        let mut r = record();
        r.line_items = vec![LineItem { amount_minor: Some(450), ..line("Mouse", Some(3)) }];
        let draft = prepare(&doc(), &r).unwrap();
        assert_eq!(draft.lines[0].rate_minor, None);
        assert_eq!(draft.lines[0].amount_minor, 450);
    }

    #[test]
    fn header_problems_reject() {
        let mut r = record();
        r.date = None;
        assert_eq!(rejected(prepare(&doc(), &r)), "invoice date is missing");

        let mut r = record();
        r.key = Some("   ".into());
        assert_eq!(rejected(prepare(&doc(), &r)), "invoice number is missing");

        let mut r = record();
        r.customer_name = Some("Nobody".into());
        assert_eq!(rejected(prepare(&doc(), &r)), "customer 'Nobody' not found");
    }

    #[test]
    fn bad_lines_are_dropped_with_notes() {
        let mut r = record();
        r.line_items = vec![
            line("", Some(1)),
            line("Keyboard", Some(1)),
            line("Mouse", Some(0)),
            line("Laptop", Some(1)),
        ];
        let draft = prepare(&doc(), &r).unwrap();
        assert_eq!(draft.lines.len(), 1);
        assert_eq!(
            draft.notes,
            vec![
                "skipping item with empty name",
                "item 'Keyboard' not found",
                "invalid quantity for item 'Mouse'",
            ]
        );
    }

    #[test]
    fn no_valid_lines_rejects() {
        let mut r = record();
        r.line_items = vec![line("Keyboard", Some(1))];
        assert_eq!(
            rejected(prepare(&doc(), &r)),
            "no valid line items (item 'Keyboard' not found)"
        );
    }

    #[test]
    fn subtotal_overflow_rejects_the_invoice() {
        let half = i64::MAX / 2 + 1;
        let mut r = record();
        r.line_items = vec![
            LineItem { unit_price_minor: Some(half), ..line("Laptop", Some(1)) },
            LineItem { unit_price_minor: Some(half), ..line("Mouse", Some(1)) },
        ];
        assert_eq!(rejected(prepare(&doc(), &r)), "invoice subtotal overflows");
    }

    #[test]
    fn duplicate_ref_number_rejects() {
        let mut d = doc();
        let draft = prepare(&d, &record()).unwrap();
        d.invoices.push(draft.into_stored("T1".into(), Utc::now()));
        assert_eq!(
            rejected(prepare(&d, &record())),
            "invoice number 'INV-123456' already exists"
        );
    }
}
