use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// On-disk shape of a ledger file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub invoices: Vec<StoredInvoice>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub list_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub list_id: String,
    pub name: String,
    #[serde(default)]
    pub unit_price_minor: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredInvoice {
    pub txn_id: String,
    pub time_created: DateTime<Utc>,
    #[serde(default)]
    pub ref_number: Option<String>,
    pub customer_list_id: String,
    pub customer_name: String,
    pub txn_date: NaiveDate,
    #[serde(default)]
    pub memo: Option<String>,
    pub subtotal_minor: i64,
    #[serde(default)]
    pub lines: Vec<StoredLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLine {
    pub item_list_id: String,
    pub item_name: String,
    pub quantity: i64,
    #[serde(default)]
    pub rate_minor: Option<i64>,
    pub amount_minor: i64,
}

impl LedgerDocument {
    /// Exact name first, then the first customer whose name contains `name`.
    pub fn find_customer(&self, name: &str) -> Option<&Customer> {
        find_by_name(&self.customers, name, |c| &c.name)
    }

    /// Exact name first, then the first item whose name contains `name`.
    pub fn find_item(&self, name: &str) -> Option<&Item> {
        find_by_name(&self.items, name, |i| &i.name)
    }

    pub fn has_ref_number(&self, ref_number: &str) -> bool {
        self.invoices
            .iter()
            .any(|i| i.ref_number.as_deref() == Some(ref_number))
    }
}

fn find_by_name<'a, T>(list: &'a [T], name: &str, get: impl Fn(&T) -> &String) -> Option<&'a T> {
    if name.is_empty() {
        return None;
    }
    list.iter()
        .find(|x| get(x) == name)
        .or_else(|| list.iter().find(|x| get(x).contains(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> LedgerDocument {
        LedgerDocument {
            customers: vec![
                Customer { list_id: "C1".into(), name: "Shazeb Khan Jr".into() },
                Customer { list_id: "C2".into(), name: "Shazeb Khan".into() },
            ],
            items: vec![Item { list_id: "I1".into(), name: "Laptop 15in".into(), unit_price_minor: Some(99900) }],
            invoices: Vec::new(),
        }
    }

    #[test]
    fn exact_name_beats_substring() {
        assert_eq!(doc().find_customer("Shazeb Khan").map(|c| c.list_id.as_str()), Some("C2"));
        assert_eq!(doc().find_customer("Jr").map(|c| c.list_id.as_str()), Some("C1"));
    }

    #[test]
    fn substring_fallback_and_misses() {
        assert_eq!(doc().find_item("Laptop").map(|i| i.list_id.as_str()), Some("I1"));
        assert!(doc().find_item("Mouse").is_none());
        assert!(doc().find_item("").is_none());
    }

    #[test]
    fn empty_document_parses_from_braces() {
        let doc: LedgerDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, LedgerDocument::default());
    }
}
