use crate::classify::classify;
use crate::config::SyncPolicy;
use crate::error::ReconError;
use crate::ledger::LedgerStore;
use crate::merge::{merge, report_statuses};
use crate::model::{InvoiceRecord, ReconMeta, ReconResult};
use crate::sink::StatusSink;
use crate::snapshot::load_remote;
use crate::summary::compute_summary;
use crate::sync::sync_new_records;

const COMPONENT: &str = "InvoiceReconciler";

/// Reconciles intended invoices against a Ledger Store.
///
/// Owns its store and sink. `reconcile` takes `&mut self`, so one reconciler
/// never runs two reconciliations against its store at once.
pub struct Reconciler<L, S> {
    name: String,
    store: L,
    sink: S,
    policy: SyncPolicy,
}

impl<L: LedgerStore, S: StatusSink> Reconciler<L, S> {
    pub fn new(store: L, mut sink: S, policy: SyncPolicy) -> Self {
        sink.info(&format!("{COMPONENT} Initialized."));
        Self {
            name: "invoice sync".into(),
            store,
            sink,
            policy,
        }
    }

    /// Name recorded in [`ReconMeta`].
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    pub fn store(&self) -> &L {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut L {
        &mut self.store
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_parts(self) -> (L, S) {
        (self.store, self.sink)
    }

    /// Snapshot, classify, create what is missing remotely, merge, report.
    ///
    /// Logs one `Invoice {key} is {status}.` line per merged record, then
    /// `InvoiceReconciler Completed` as the last line of the run.
    ///
    /// Fails only when the snapshot cannot be read or a keyless record meets
    /// the `reject` policy; in both cases nothing has been created.
    pub fn reconcile(&mut self, local: Vec<InvoiceRecord>) -> Result<ReconResult, ReconError> {
        let remote = load_remote(&mut self.store, &mut self.sink)?;

        let mut classification =
            classify(remote, local, self.policy.missing_key, &mut self.sink)?;

        let sync_report = sync_new_records(
            &mut self.store,
            &mut classification.local,
            &classification.to_create,
            self.policy.on_create_failure,
            &mut self.sink,
        );

        let records = merge(classification.remote, classification.local);

        report_statuses(&records, &mut self.sink);
        self.sink.info(&format!("{COMPONENT} Completed"));

        let summary = compute_summary(
            &records,
            sync_report.created,
            sync_report.failures.len(),
            classification.skipped_without_key,
        );

        Ok(ReconResult {
            meta: ReconMeta {
                name: self.name.clone(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            summary,
            records,
        })
    }
}
