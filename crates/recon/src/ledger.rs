use crate::error::LedgerError;
use crate::model::InvoiceRecord;

/// Outcome of one record in a [`LedgerStore::create_batch`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub key: String,
    /// External id on success.
    pub result: Result<String, LedgerError>,
}

impl CreateOutcome {
    pub fn created(key: impl Into<String>, external_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            result: Ok(external_id.into()),
        }
    }

    pub fn failed(key: impl Into<String>, err: LedgerError) -> Self {
        Self {
            key: key.into(),
            result: Err(err),
        }
    }
}

/// The external system of record.
///
/// Implementations are single-session: every method takes `&mut self` and the
/// engine never calls into a store from more than one place at a time.
pub trait LedgerStore {
    /// Complete snapshot of every invoice currently in the store.
    fn fetch_all(&mut self) -> Result<Vec<InvoiceRecord>, LedgerError>;

    /// Attempt to create every record independently. One failure must not
    /// stop the others; the returned outcomes carry one entry per record.
    fn create_batch(&mut self, records: &[InvoiceRecord]) -> Vec<CreateOutcome>;
}

impl<L: LedgerStore + ?Sized> LedgerStore for &mut L {
    fn fetch_all(&mut self) -> Result<Vec<InvoiceRecord>, LedgerError> {
        (**self).fetch_all()
    }

    fn create_batch(&mut self, records: &[InvoiceRecord]) -> Vec<CreateOutcome> {
        (**self).create_batch(records)
    }
}
