use std::collections::HashMap;

use crate::config::CreateFailurePolicy;
use crate::error::LedgerError;
use crate::ledger::LedgerStore;
use crate::model::{InvoiceRecord, SyncStatus};
use crate::sink::StatusSink;

/// What happened to the creation batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub attempted: usize,
    pub created: usize,
    /// `(key, reason)` for every record the store did not create.
    pub failures: Vec<(String, String)>,
}

/// Create the records at `to_create` in the Ledger Store and fold the outcomes
/// back into `local` by key.
///
/// The whole batch goes to the store in one call. Per-record failures are
/// reported through `sink` and never returned as an error.
pub fn sync_new_records<L, S>(
    store: &mut L,
    local: &mut [InvoiceRecord],
    to_create: &[usize],
    policy: CreateFailurePolicy,
    sink: &mut S,
) -> SyncReport
where
    L: LedgerStore + ?Sized,
    S: StatusSink + ?Sized,
{
    let mut report = SyncReport::default();
    if to_create.is_empty() {
        return report;
    }

    let batch: Vec<InvoiceRecord> = to_create.iter().map(|&i| local[i].clone()).collect();
    report.attempted = batch.len();
    sink.debug(&format!("Creating {} invoice(s) in the ledger.", batch.len()));

    let mut outcomes: HashMap<String, Result<String, LedgerError>> = store
        .create_batch(&batch)
        .into_iter()
        .map(|o| (o.key, o.result))
        .collect();

    for &i in to_create {
        let record = &mut local[i];
        let key = record.display_key().to_string();
        let outcome = outcomes
            .remove(&key)
            .unwrap_or_else(|| Err(LedgerError::Rejected("no outcome reported".into())));

        match outcome {
            Ok(external_id) => {
                sink.info(&format!("Invoice {key} created with id {external_id}."));
                record.external_id = Some(external_id);
                report.created += 1;
            }
            Err(err) => {
                sink.warn(&format!("Invoice {key} could not be created: {err}"));
                if policy == CreateFailurePolicy::MarkFailed {
                    record.status = SyncStatus::Failed;
                }
                report.failures.push((key, err.to_string()));
            }
        }
    }

    for key in outcomes.keys() {
        sink.warn(&format!("Ledger reported an outcome for unrequested invoice {key}."));
    }

    report
}
