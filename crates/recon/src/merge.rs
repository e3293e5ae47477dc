use std::collections::HashMap;

use crate::model::InvoiceRecord;
use crate::sink::StatusSink;

/// Merge classified remote and local records into one set, one record per key.
///
/// Remote records seed the result in snapshot order; local records then
/// overwrite by key (keeping the remote position) or append in local order.
/// Keyless records are not part of the result.
pub fn merge(remote: Vec<InvoiceRecord>, local: Vec<InvoiceRecord>) -> Vec<InvoiceRecord> {
    let mut merged: Vec<InvoiceRecord> = Vec::with_capacity(remote.len() + local.len());
    let mut position: HashMap<String, usize> = HashMap::new();

    for record in remote.into_iter().chain(local) {
        let Some(key) = record.match_key().map(str::to_string) else {
            continue;
        };
        match position.get(&key) {
            Some(&pos) => merged[pos] = record,
            None => {
                position.insert(key, merged.len());
                merged.push(record);
            }
        }
    }

    merged
}

/// One `Invoice {key} is {status}.` line per record.
pub fn report_statuses<S>(records: &[InvoiceRecord], sink: &mut S)
where
    S: StatusSink + ?Sized,
{
    for record in records {
        sink.info(&format!("Invoice {} is {}.", record.display_key(), record.status));
    }
}
