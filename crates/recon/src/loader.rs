use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::config::{local_format, ColumnMapping, LocalFormat};
use crate::error::ReconError;
use crate::model::{InvoiceRecord, LineItem};
use crate::money::parse_money;

/// Load intended invoices from a `.csv` or `.json` file.
pub fn load_local_file(path: &Path, columns: &ColumnMapping) -> Result<Vec<InvoiceRecord>, ReconError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| ReconError::Io(format!("cannot read {}: {e}", path.display())))?;
    match local_format(path)? {
        LocalFormat::Csv => load_csv_records(&data, columns),
        LocalFormat::Json => load_json_records(&data),
    }
}

/// Parse a JSON array of invoice records.
pub fn load_json_records(json: &str) -> Result<Vec<InvoiceRecord>, ReconError> {
    serde_json::from_str(json).map_err(|e| ReconError::Io(format!("invalid invoice JSON: {e}")))
}

/// Parse CSV with one row per line item.
///
/// Rows sharing an invoice number form one invoice whose header fields come
/// from its first row. A row with an empty invoice number is its own keyless
/// invoice. Only the key column is mandatory in the header; any other mapped
/// column may be absent.
pub fn load_csv_records(csv_data: &str, col: &ColumnMapping) -> Result<Vec<InvoiceRecord>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| headers.iter().position(|h| h == name);

    let key_idx = idx(&col.key).ok_or_else(|| ReconError::MissingColumn {
        column: col.key.clone(),
    })?;
    let customer_idx = idx(&col.customer);
    let date_idx = idx(&col.date);
    let memo_idx = idx(&col.memo);
    let amount_idx = idx(&col.amount);
    let item_idx = idx(&col.item);
    let quantity_idx = idx(&col.quantity);
    let unit_price_idx = idx(&col.unit_price);
    let line_amount_idx = idx(&col.line_amount);

    let mut invoices: Vec<InvoiceRecord> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();

    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|e| ReconError::Io(format!("row {row}: {e}")))?;
        let cell = |idx: Option<usize>| -> Option<String> {
            idx.and_then(|i| record.get(i))
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string())
        };

        let key = cell(Some(key_idx));
        let line = match cell(item_idx) {
            Some(item_name) => Some(LineItem {
                item_name,
                quantity: cell(quantity_idx)
                    .map(|v| {
                        v.parse::<i64>()
                            .map_err(|_| ReconError::QuantityParse { row, value: v })
                    })
                    .transpose()?,
                unit_price_minor: parse_amount(row, cell(unit_price_idx))?,
                amount_minor: parse_amount(row, cell(line_amount_idx))?,
            }),
            None => None,
        };

        if let Some(&pos) = key.as_ref().and_then(|k| by_key.get(k)) {
            if let Some(line) = line {
                invoices[pos].line_items.push(line);
            }
            continue;
        }

        let date = cell(date_idx)
            .map(|v| {
                NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                    .map_err(|_| ReconError::DateParse { row, value: v })
            })
            .transpose()?;

        let invoice = InvoiceRecord {
            key: key.clone(),
            customer_name: cell(customer_idx),
            memo: cell(memo_idx),
            date,
            amount_minor: parse_amount(row, cell(amount_idx))?,
            line_items: line.into_iter().collect(),
            ..InvoiceRecord::default()
        };

        if let Some(key) = key {
            by_key.insert(key, invoices.len());
        }
        invoices.push(invoice);
    }

    Ok(invoices)
}

fn parse_amount(row: usize, value: Option<String>) -> Result<Option<i64>, ReconError> {
    value
        .map(|v| parse_money(&v).map_err(|_| ReconError::AmountParse { row, value: v }))
        .transpose()
}
