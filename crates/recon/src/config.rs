use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub policy: SyncPolicy,
    pub ledger: LedgerConfig,
    pub local: LocalConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "invoice sync".into()
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SyncPolicy {
    #[serde(default)]
    pub missing_key: MissingKeyPolicy,
    #[serde(default)]
    pub on_create_failure: CreateFailurePolicy,
}

/// What to do with records that have no invoice number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Drop them from matching and from the result, with a warning.
    #[default]
    Skip,
    /// Fail the whole run before anything is created.
    Reject,
}

/// Status given to a record whose creation the Ledger Store rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateFailurePolicy {
    #[default]
    MarkFailed,
    /// Leave it `Added`; only a missing external id tells the two apart.
    KeepAdded,
}

// ---------------------------------------------------------------------------
// Ledger + local input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    pub file: PathBuf,
    #[serde(default)]
    pub columns: ColumnMapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalFormat {
    Csv,
    Json,
}

impl LocalConfig {
    pub fn format(&self) -> Result<LocalFormat, ReconError> {
        local_format(&self.file)
    }
}

pub fn local_format(path: &Path) -> Result<LocalFormat, ReconError> {
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
        Some(ext) if ext == "csv" => Ok(LocalFormat::Csv),
        Some(ext) if ext == "json" => Ok(LocalFormat::Json),
        _ => Err(ReconError::ConfigValidation(format!(
            "local file '{}' must end in .csv or .json",
            path.display()
        ))),
    }
}

/// CSV header names for the local invoice file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub key: String,
    pub customer: String,
    pub date: String,
    pub memo: String,
    pub amount: String,
    pub item: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_amount: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            key: "invoice_number".into(),
            customer: "customer".into(),
            date: "date".into(),
            memo: "memo".into(),
            amount: "amount".into(),
            item: "item".into(),
            quantity: "quantity".into(),
            unit_price: "unit_price".into(),
            line_amount: "line_amount".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub json: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }
        if self.ledger.path.as_os_str().is_empty() {
            return Err(ReconError::ConfigValidation("ledger.path must not be empty".into()));
        }
        self.local.format()?;

        let c = &self.local.columns;
        let required = [
            ("key", &c.key),
            ("customer", &c.customer),
            ("date", &c.date),
            ("memo", &c.memo),
            ("amount", &c.amount),
            ("item", &c.item),
            ("quantity", &c.quantity),
            ("unit_price", &c.unit_price),
            ("line_amount", &c.line_amount),
        ];
        for (field, column) in required {
            if column.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "local.columns.{field} must not be empty"
                )));
            }
        }
        if c.key == c.item {
            return Err(ReconError::ConfigValidation(
                "local.columns.key and local.columns.item must differ".into(),
            ));
        }

        Ok(())
    }

    /// Resolve `ledger.path`, `local.file` and `output.json` against `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        if self.ledger.path.is_relative() {
            self.ledger.path = base.join(&self.ledger.path);
        }
        if self.local.file.is_relative() {
            self.local.file = base.join(&self.local.file);
        }
        if let Some(ref mut json) = self.output.json {
            if json.is_relative() {
                *json = base.join(&*json);
            }
        }
    }
}
