use std::collections::HashMap;
use std::fmt::Display;

use crate::config::MissingKeyPolicy;
use crate::error::{ReconError, Side};
use crate::model::{InvoiceRecord, SyncStatus};
use crate::money::format_minor;
use crate::sink::StatusSink;

/// Records of one side, de-duplicated by key with a key → position index.
#[derive(Debug, Default)]
pub struct KeyedSet {
    pub records: Vec<InvoiceRecord>,
    pub by_key: HashMap<String, usize>,
}

impl KeyedSet {
    pub fn get(&self, key: &str) -> Option<&InvoiceRecord> {
        self.by_key.get(key).map(|&i| &self.records[i])
    }
}

/// Output of [`classify`].
#[derive(Debug)]
pub struct Classification {
    /// Local records, one per key, each `Unchanged`, `Different` or `Added`.
    pub local: Vec<InvoiceRecord>,
    /// Remote records, one per key. Remote-only ones are `Missing`; the rest
    /// stay `Unclassified` because their local counterpart replaces them.
    pub remote: Vec<InvoiceRecord>,
    /// Positions in `local` of the records that must be created.
    pub to_create: Vec<usize>,
    pub skipped_without_key: usize,
}

/// One differing header field between a remote and a local record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDiff {
    pub field: &'static str,
    pub remote: String,
    pub local: String,
}

/// Classify every local and remote record by invoice number.
pub fn classify<S>(
    remote: Vec<InvoiceRecord>,
    local: Vec<InvoiceRecord>,
    policy: MissingKeyPolicy,
    sink: &mut S,
) -> Result<Classification, ReconError>
where
    S: StatusSink + ?Sized,
{
    let mut skipped_without_key = 0;

    // Keyless local records are the caller's to fix; keyless remote records
    // are never theirs, so those are always skipped.
    let local = drop_keyless(local, Side::Local, policy, sink, &mut skipped_without_key)?;
    let remote = drop_keyless(
        remote,
        Side::Remote,
        MissingKeyPolicy::Skip,
        sink,
        &mut skipped_without_key,
    )?;

    let remote = index_last_wins(remote, Side::Remote, sink);
    let mut local = index_last_wins(local, Side::Local, sink);

    let mut to_create = Vec::new();
    for (i, record) in local.records.iter_mut().enumerate() {
        let counterpart = record.match_key().and_then(|k| remote.get(k));
        match counterpart {
            Some(remote_record) => {
                let diffs = compare_fields(remote_record, record);
                if diffs.is_empty() {
                    record.status = SyncStatus::Unchanged;
                } else {
                    record.status = SyncStatus::Different;
                    for d in &diffs {
                        sink.debug(&format!(
                            "Invoice {} differs on {}: ledger={} local={}",
                            record.display_key(),
                            d.field,
                            d.remote,
                            d.local
                        ));
                    }
                }
            }
            None => {
                record.status = SyncStatus::Added;
                to_create.push(i);
            }
        }
    }

    let mut remote_records = remote.records;
    for record in &mut remote_records {
        let in_local = record
            .match_key()
            .map(|k| local.by_key.contains_key(k))
            .unwrap_or(false);
        if !in_local {
            record.status = SyncStatus::Missing;
        }
    }

    Ok(Classification {
        local: local.records,
        remote: remote_records,
        to_create,
        skipped_without_key,
    })
}

/// Header fields that differ, in a fixed order.
pub fn compare_fields(remote: &InvoiceRecord, local: &InvoiceRecord) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();
    if remote.customer_name != local.customer_name {
        diffs.push(field_diff("customer_name", &remote.customer_name, &local.customer_name));
    }
    if remote.date != local.date {
        diffs.push(field_diff("date", &remote.date, &local.date));
    }
    if remote.memo != local.memo {
        diffs.push(field_diff("memo", &remote.memo, &local.memo));
    }
    if remote.amount_minor != local.amount_minor {
        diffs.push(FieldDiff {
            field: "amount",
            remote: remote.amount_minor.map(format_minor).unwrap_or_else(none),
            local: local.amount_minor.map(format_minor).unwrap_or_else(none),
        });
    }
    diffs
}

fn field_diff<T: Display>(field: &'static str, remote: &Option<T>, local: &Option<T>) -> FieldDiff {
    FieldDiff {
        field,
        remote: remote.as_ref().map(|v| v.to_string()).unwrap_or_else(none),
        local: local.as_ref().map(|v| v.to_string()).unwrap_or_else(none),
    }
}

fn none() -> String {
    "(none)".into()
}

fn drop_keyless<S>(
    records: Vec<InvoiceRecord>,
    side: Side,
    policy: MissingKeyPolicy,
    sink: &mut S,
    skipped: &mut usize,
) -> Result<Vec<InvoiceRecord>, ReconError>
where
    S: StatusSink + ?Sized,
{
    let mut kept = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if record.match_key().is_some() {
            kept.push(record);
            continue;
        }
        match policy {
            MissingKeyPolicy::Reject => return Err(ReconError::MissingKey { side, index }),
            MissingKeyPolicy::Skip => {
                *skipped += 1;
                sink.warn(&format!(
                    "Skipping {} invoice #{index} without an invoice number.",
                    side.as_str()
                ));
            }
        }
    }
    Ok(kept)
}

/// Index records by key. A later duplicate replaces the earlier one in place,
/// so each key keeps the position of its first occurrence.
fn index_last_wins<S>(records: Vec<InvoiceRecord>, side: Side, sink: &mut S) -> KeyedSet
where
    S: StatusSink + ?Sized,
{
    let mut set = KeyedSet::default();
    for record in records {
        let Some(key) = record.match_key().map(str::to_string) else {
            continue;
        };
        match set.by_key.get(&key) {
            Some(&pos) => {
                sink.warn(&format!(
                    "Duplicate {} invoice {key}; the later record wins.",
                    side.as_str()
                ));
                set.records[pos] = record;
            }
            None => {
                set.by_key.insert(key, set.records.len());
                set.records.push(record);
            }
        }
    }
    set
}
