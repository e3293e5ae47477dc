//! `ledgersync-recon`: invoice reconciliation engine.
//!
//! Pure engine crate: takes intended invoices plus a [`LedgerStore`], returns a
//! merged, status-annotated result. No CLI dependencies; logging goes through
//! an injected [`StatusSink`].

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod loader;
pub mod merge;
pub mod model;
pub mod money;
pub mod sink;
pub mod snapshot;
pub mod summary;
pub mod sync;

pub use config::{CreateFailurePolicy, MissingKeyPolicy, ReconConfig, SyncPolicy};
pub use engine::Reconciler;
pub use error::{LedgerError, ReconError};
pub use ledger::{CreateOutcome, LedgerStore};
pub use model::{InvoiceRecord, LineItem, ReconResult, ReconSummary, SyncStatus};
pub use sink::{MemorySink, StatusSink, TracingSink};
