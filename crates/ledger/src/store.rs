use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use ledgersync_recon::{CreateOutcome, InvoiceRecord, LedgerError, LedgerStore};
use tracing::{debug, warn};

use crate::document::{Customer, Item, LedgerDocument, StoredInvoice};
use crate::mapper::to_record;
use crate::validate::prepare;

/// A ledger kept in one JSON file.
///
/// Opening takes an exclusive lock on `<file>.lock`; it is released when the
/// `FileLedger` is dropped. Only one session per file can exist at a time.
pub struct FileLedger {
    path: PathBuf,
    doc: LedgerDocument,
    _lock_file: File,
}

impl std::fmt::Debug for FileLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileLedger")
            .field("path", &self.path)
            .field("invoices", &self.doc.invoices.len())
            .finish()
    }
}

impl FileLedger {
    /// Write a new, empty ledger file. Fails if the file already exists.
    pub fn create(path: &Path) -> Result<(), LedgerError> {
        if path.exists() {
            return Err(LedgerError::Io(format!("{} already exists", path.display())));
        }
        write_document(path, &LedgerDocument::default())?;
        debug!("created ledger {}", path.display());
        Ok(())
    }

    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        if !path.is_file() {
            return Err(LedgerError::Unavailable(format!(
                "no ledger file at {}",
                path.display()
            )));
        }

        let lock_path = lock_path(path);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| LedgerError::Io(format!("{}: {e}", lock_path.display())))?;

        if lock_file.try_lock_exclusive().is_err() {
            return Err(LedgerError::Locked(format!(
                "{} is open in another session",
                path.display()
            )));
        }

        let data = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Io(format!("{}: {e}", path.display())))?;
        let doc: LedgerDocument = serde_json::from_str(&data)
            .map_err(|e| LedgerError::Malformed(format!("{}: {e}", path.display())))?;

        debug!(
            "opened ledger {} ({} invoices, {} customers, {} items)",
            path.display(),
            doc.invoices.len(),
            doc.customers.len(),
            doc.items.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            doc,
            _lock_file: lock_file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &LedgerDocument {
        &self.doc
    }

    pub fn invoices(&self) -> &[StoredInvoice] {
        &self.doc.invoices
    }

    /// Register a customer and persist. Returns the new list id.
    pub fn add_customer(&mut self, name: &str) -> Result<String, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Rejected("customer name cannot be empty".into()));
        }
        if self.doc.customers.iter().any(|c| c.name == name) {
            return Err(LedgerError::Rejected(format!("customer '{name}' already exists")));
        }
        let list_id = uuid::Uuid::new_v4().to_string();
        self.doc.customers.push(Customer {
            list_id: list_id.clone(),
            name: name.to_string(),
        });
        if let Err(e) = self.save() {
            self.doc.customers.pop();
            return Err(e);
        }
        Ok(list_id)
    }

    /// Register an item and persist. Returns the new list id.
    pub fn add_item(&mut self, name: &str, unit_price_minor: Option<i64>) -> Result<String, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Rejected("item name cannot be empty".into()));
        }
        if self.doc.items.iter().any(|i| i.name == name) {
            return Err(LedgerError::Rejected(format!("item '{name}' already exists")));
        }
        let list_id = uuid::Uuid::new_v4().to_string();
        self.doc.items.push(Item {
            list_id: list_id.clone(),
            name: name.to_string(),
            unit_price_minor,
        });
        if let Err(e) = self.save() {
            self.doc.items.pop();
            return Err(e);
        }
        Ok(list_id)
    }

    fn save(&self) -> Result<(), LedgerError> {
        write_document(&self.path, &self.doc)
    }
}

impl LedgerStore for FileLedger {
    fn fetch_all(&mut self) -> Result<Vec<InvoiceRecord>, LedgerError> {
        Ok(self.doc.invoices.iter().map(to_record).collect())
    }

    fn create_batch(&mut self, records: &[InvoiceRecord]) -> Vec<CreateOutcome> {
        let before = self.doc.invoices.len();
        let mut outcomes = Vec::with_capacity(records.len());

        for record in records {
            let key = record.display_key().to_string();
            match prepare(&self.doc, record) {
                Ok(draft) => {
                    for note in &draft.notes {
                        warn!("invoice {key}: {note}");
                    }
                    let txn_id = uuid::Uuid::new_v4().to_string();
                    self.doc.invoices.push(draft.into_stored(txn_id.clone(), Utc::now()));
                    debug!("invoice {key} staged as {txn_id}");
                    outcomes.push(CreateOutcome::created(key, txn_id));
                }
                Err(err) => {
                    debug!("invoice {key} rejected: {err}");
                    outcomes.push(CreateOutcome::failed(key, err));
                }
            }
        }

        if self.doc.invoices.len() > before {
            if let Err(err) = self.save() {
                // Nothing staged in this batch reached disk.
                self.doc.invoices.truncate(before);
                for outcome in &mut outcomes {
                    if outcome.result.is_ok() {
                        outcome.result = Err(err.clone());
                    }
                }
            }
        }

        outcomes
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut lock = path.as_os_str().to_owned();
    lock.push(".lock");
    PathBuf::from(lock)
}

/// Write to a sibling temp file, then rename over the target.
fn write_document(path: &Path, doc: &LedgerDocument) -> Result<(), LedgerError> {
    let json = serde_json::to_string_pretty(doc)
        .map_err(|e| LedgerError::Io(format!("cannot serialize ledger: {e}")))?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, json).map_err(|e| LedgerError::Io(format!("{}: {e}", tmp.display())))?;
    std::fs::rename(&tmp, path).map_err(|e| LedgerError::Io(format!("{}: {e}", path.display())))
}
