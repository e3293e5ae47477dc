use ledgersync_recon::{InvoiceRecord, LineItem};

use crate::document::StoredInvoice;

/// Map a stored invoice to the engine's record shape. Key = ref number,
/// amount = subtotal, external id = transaction id.
pub fn to_record(invoice: &StoredInvoice) -> InvoiceRecord {
    InvoiceRecord {
        key: invoice.ref_number.clone(),
        customer_name: Some(invoice.customer_name.clone()),
        memo: invoice.memo.clone(),
        date: Some(invoice.txn_date),
        amount_minor: Some(invoice.subtotal_minor),
        line_items: invoice
            .lines
            .iter()
            .map(|l| LineItem {
                item_name: l.item_name.clone(),
                quantity: Some(l.quantity),
                unit_price_minor: l.rate_minor,
                amount_minor: Some(l.amount_minor),
            })
            .collect(),
        external_id: Some(invoice.txn_id.clone()),
        ..InvoiceRecord::default()
    }
}
