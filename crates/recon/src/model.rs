use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// One invoice, either intended (local) or as read from the Ledger Store (remote).
///
/// Only `customer_name`, `date`, `memo` and `amount_minor` take part in the
/// Unchanged/Different decision. `status` is derived by the engine and is never
/// read from input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Invoice number. `None` or empty means the record cannot be matched.
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Header amount in minor units (cents).
    #[serde(default)]
    pub amount_minor: Option<i64>,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    /// Identifier assigned by the Ledger Store once the record exists there.
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default, skip_deserializing)]
    pub status: SyncStatus,
}

impl InvoiceRecord {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// The matching key, if present and non-empty.
    pub fn match_key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }

    /// Key for display in log lines; keyless records render as empty.
    pub fn display_key(&self) -> &str {
        self.key.as_deref().unwrap_or("")
    }

    /// True when all four header comparison fields are equal.
    pub fn same_header(&self, other: &InvoiceRecord) -> bool {
        self.customer_name == other.customer_name
            && self.date == other.date
            && self.memo == other.memo
            && self.amount_minor == other.amount_minor
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_name: String,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_price_minor: Option<i64>,
    #[serde(default)]
    pub amount_minor: Option<i64>,
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Not yet classified. Never present in a finished result.
    #[default]
    Unclassified,
    Unchanged,
    Different,
    Added,
    Missing,
    /// Creation was attempted and the Ledger Store rejected it.
    Failed,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unclassified => write!(f, "Unclassified"),
            Self::Unchanged => write!(f, "Unchanged"),
            Self::Different => write!(f, "Different"),
            Self::Added => write!(f, "Added"),
            Self::Missing => write!(f, "Missing"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total: usize,
    pub unchanged: usize,
    pub different: usize,
    pub added: usize,
    pub missing: usize,
    pub failed: usize,
    /// Records that received an external id during this run.
    pub created: usize,
    /// Creations the ledger rejected during this run, whatever status the
    /// failure policy left on the record.
    pub create_failures: usize,
    pub skipped_without_key: usize,
}

impl ReconSummary {
    /// Local and remote disagree somewhere the engine does not repair.
    pub fn has_drift(&self) -> bool {
        self.different > 0 || self.missing > 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub records: Vec<InvoiceRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_not_a_match_key() {
        let mut r = InvoiceRecord::new("");
        assert_eq!(r.match_key(), None);
        r.key = None;
        assert_eq!(r.match_key(), None);
        assert_eq!(r.display_key(), "");
        r.key = Some("INV-1".into());
        assert_eq!(r.match_key(), Some("INV-1"));
    }

    #[test]
    fn line_items_do_not_affect_header_equality() {
        let mut a = InvoiceRecord::new("INV-1");
        a.amount_minor = Some(500);
        let mut b = a.clone();
        b.line_items.push(LineItem {
            item_name: "Laptop".into(),
            quantity: Some(1),
            ..LineItem::default()
        });
        b.external_id = Some("txn-9".into());
        assert!(a.same_header(&b));

        b.memo = Some("PNW".into());
        assert!(!a.same_header(&b));
    }

    #[test]
    fn status_is_never_read_from_input() {
        let json = r#"{"key":"INV-1","amount_minor":500,"status":"added"}"#;
        let r: InvoiceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.status, SyncStatus::Unclassified);
        assert_eq!(r.amount_minor, Some(500));
    }

    #[test]
    fn status_display_uses_variant_name() {
        assert_eq!(SyncStatus::Added.to_string(), "Added");
        assert_eq!(
            serde_json::to_string(&SyncStatus::Unchanged).unwrap(),
            "\"unchanged\""
        );
    }
}
