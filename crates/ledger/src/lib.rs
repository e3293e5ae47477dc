//! `ledgersync-ledger`: a JSON-file ledger implementing [`LedgerStore`].
//!
//! Holds customers, items and invoices the way an accounting package does:
//! invoices reference customers and items by list id, and creation resolves
//! names to ids before anything is written.
//!
//! [`LedgerStore`]: ledgersync_recon::LedgerStore

pub mod document;
pub mod mapper;
pub mod store;
pub mod validate;

pub use document::{Customer, Item, LedgerDocument, StoredInvoice, StoredLine};
pub use store::FileLedger;
