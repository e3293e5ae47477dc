use crate::model::{InvoiceRecord, ReconSummary, SyncStatus};

/// Compute summary statistics from the merged records.
pub fn compute_summary(
    records: &[InvoiceRecord],
    created: usize,
    create_failures: usize,
    skipped_without_key: usize,
) -> ReconSummary {
    let mut summary = ReconSummary {
        total: records.len(),
        created,
        create_failures,
        skipped_without_key,
        ..ReconSummary::default()
    };

    for r in records {
        match r.status {
            SyncStatus::Unchanged => summary.unchanged += 1,
            SyncStatus::Different => summary.different += 1,
            SyncStatus::Added => summary.added += 1,
            SyncStatus::Missing => summary.missing += 1,
            SyncStatus::Failed => summary.failed += 1,
            SyncStatus::Unclassified => {}
        }
    }

    summary
}
