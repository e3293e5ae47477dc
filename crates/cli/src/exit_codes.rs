//! CLI Exit Code Registry
//!
//! Single source of truth for `lsync` exit codes. Scripts (cron jobs, CI
//! steps) branch on these, so treat them as part of the shell contract.
//!
//! | Code | Meaning                                              |
//! |------|------------------------------------------------------|
//! | 0    | Success                                              |
//! | 1    | General error, or drift with `--fail-on-drift`       |
//! | 2    | Usage error (bad arguments, missing config)          |
//! | 3    | Ledger unavailable, locked or unreadable             |
//! | 4    | One or more invoices could not be created            |
//! | 5    | Local input could not be parsed                      |
//! | 6    | Invalid config                                       |

use ledgersync_recon::{LedgerError, ReconError};

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Drift remains after the run (Different or Missing records) and
/// `--fail-on-drift` was given. Like `diff(1)`, 1 means "they differ".
pub const EXIT_DRIFT: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Ledger file missing, malformed, or held by another session.
pub const EXIT_LEDGER_UNAVAILABLE: u8 = 3;

/// At least one creation was rejected by the ledger.
pub const EXIT_CREATE_FAILED: u8 = 4;

/// Local invoice file could not be read or parsed, or a record broke the
/// missing-key policy.
pub const EXIT_INPUT_PARSE: u8 = 5;

/// Config failed to parse or validate.
pub const EXIT_INVALID_CONFIG: u8 = 6;

pub fn ledger_exit_code(err: &LedgerError) -> u8 {
    match err {
        LedgerError::Unavailable(_) | LedgerError::Locked(_) | LedgerError::Malformed(_) => {
            EXIT_LEDGER_UNAVAILABLE
        }
        LedgerError::Rejected(_) | LedgerError::Io(_) => EXIT_ERROR,
    }
}

pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::SnapshotFetch(inner) => match inner {
            LedgerError::Rejected(_) | LedgerError::Io(_) => EXIT_LEDGER_UNAVAILABLE,
            other => ledger_exit_code(other),
        },
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::MissingKey { .. }
        | ReconError::MissingColumn { .. }
        | ReconError::DateParse { .. }
        | ReconError::AmountParse { .. }
        | ReconError::QuantityParse { .. }
        | ReconError::Io(_) => EXIT_INPUT_PARSE,
    }
}
