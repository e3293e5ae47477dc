use crate::error::ReconError;
use crate::ledger::LedgerStore;
use crate::model::{InvoiceRecord, SyncStatus};
use crate::sink::StatusSink;

/// Read the full current snapshot from the Ledger Store.
///
/// Any collaborator failure aborts the run; there is no partial snapshot.
pub fn load_remote<L, S>(store: &mut L, sink: &mut S) -> Result<Vec<InvoiceRecord>, ReconError>
where
    L: LedgerStore + ?Sized,
    S: StatusSink + ?Sized,
{
    let mut records = store.fetch_all().map_err(|e| {
        sink.warn(&format!("Ledger snapshot failed: {e}"));
        ReconError::SnapshotFetch(e)
    })?;

    for record in &mut records {
        record.status = SyncStatus::Unclassified;
    }

    sink.debug(&format!("Ledger snapshot holds {} invoice(s).", records.len()));
    Ok(records)
}
