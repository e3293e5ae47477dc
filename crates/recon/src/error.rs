use std::fmt;

/// Which record set a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Local,
    Remote,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Local => "local",
            Side::Remote => "remote",
        }
    }
}

/// Failure reported by a Ledger Store collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Store unreachable or session could not be opened.
    Unavailable(String),
    /// Another session holds the store.
    Locked(String),
    /// Store answered with data that cannot be mapped.
    Malformed(String),
    /// Store refused a single record (validation, lookup, duplicate).
    Rejected(String),
    /// IO error while reading or persisting the store.
    Io(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "ledger unavailable: {msg}"),
            Self::Locked(msg) => write!(f, "ledger locked: {msg}"),
            Self::Malformed(msg) => write!(f, "malformed ledger data: {msg}"),
            Self::Rejected(msg) => write!(f, "{msg}"),
            Self::Io(msg) => write!(f, "ledger IO error: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

#[derive(Debug)]
pub enum ReconError {
    /// Snapshot could not be read. Nothing was classified or created.
    SnapshotFetch(LedgerError),
    /// A record has no key and the missing-key policy is `reject`.
    MissingKey { side: Side, index: usize },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error.
    ConfigValidation(String),
    /// Missing required column in local input.
    MissingColumn { column: String },
    /// Date parse error in local input (1-based data row).
    DateParse { row: usize, value: String },
    /// Amount parse error in local input (1-based data row).
    AmountParse { row: usize, value: String },
    /// Quantity parse error in local input (1-based data row).
    QuantityParse { row: usize, value: String },
    /// IO error (file read, malformed CSV/JSON, etc.).
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SnapshotFetch(err) => write!(f, "cannot load ledger snapshot: {err}"),
            Self::MissingKey { side, index } => {
                write!(f, "{} record #{index} has no invoice number", side.as_str())
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::DateParse { row, value } => {
                write!(f, "row {row}: cannot parse date '{value}'")
            }
            Self::AmountParse { row, value } => {
                write!(f, "row {row}: cannot parse amount '{value}'")
            }
            Self::QuantityParse { row, value } => {
                write!(f, "row {row}: cannot parse quantity '{value}'")
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SnapshotFetch(err) => Some(err),
            _ => None,
        }
    }
}
