//! `lsync reconcile` / `lsync validate`: config-driven invoice sync.

use std::path::{Path, PathBuf};

use ledgersync_ledger::FileLedger;
use ledgersync_recon::loader::load_local_file;
use ledgersync_recon::{LedgerError, ReconConfig, ReconResult, Reconciler, SyncStatus, TracingSink};
use tracing::debug;

use crate::exit_codes::{
    EXIT_CREATE_FAILED, EXIT_DRIFT, EXIT_ERROR, EXIT_INVALID_CONFIG, EXIT_USAGE,
};
use crate::CliError;

fn recon_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

/// `<config dir>/ledgersync/sync.toml`, used when no config is given.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ledgersync").join("sync.toml"))
}

/// Read and validate a config, then resolve its paths against the
/// config file's directory.
fn load_config(config: Option<PathBuf>) -> Result<(PathBuf, ReconConfig), CliError> {
    let path = match config {
        Some(path) => path,
        None => default_config_path().ok_or_else(|| {
            recon_err(EXIT_USAGE, "no config given and no platform config directory")
        })?,
    };

    let text = std::fs::read_to_string(&path).map_err(|e| {
        recon_err(EXIT_USAGE, format!("cannot read config {}: {e}", path.display()))
            .with_hint("pass a config path, e.g. `lsync reconcile sync.toml`")
    })?;

    let mut parsed = ReconConfig::from_toml(&text)
        .map_err(|e| recon_err(EXIT_INVALID_CONFIG, e.to_string()))?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parsed.resolve_paths(base);
    debug!("loaded config {} ({})", path.display(), parsed.name);

    Ok((path, parsed))
}

pub fn cmd_validate(config: Option<PathBuf>) -> Result<(), CliError> {
    let (path, parsed) = load_config(config)?;
    eprintln!(
        "{}: ok ({}, ledger {}, local {})",
        path.display(),
        parsed.name,
        parsed.ledger.path.display(),
        parsed.local.file.display(),
    );
    Ok(())
}

pub fn cmd_reconcile(
    config: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    fail_on_drift: bool,
) -> Result<(), CliError> {
    let (_, parsed) = load_config(config)?;

    let local = load_local_file(&parsed.local.file, &parsed.local.columns)
        .map_err(|e| CliError::recon(&e))?;

    let ledger = FileLedger::open(&parsed.ledger.path).map_err(|e| {
        let err = CliError::ledger(&e);
        match e {
            LedgerError::Unavailable(_) => err.with_hint(format!(
                "create it with `lsync ledger init {}`",
                parsed.ledger.path.display()
            )),
            _ => err,
        }
    })?;

    let mut reconciler =
        Reconciler::new(ledger, TracingSink, parsed.policy).with_name(parsed.name.clone());
    let result = reconciler
        .reconcile(local)
        .map_err(|e| CliError::recon(&e))?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| recon_err(EXIT_ERROR, format!("JSON serialization error: {e}")))?;

    if let Some(path) = output_file.as_ref().or(parsed.output.json.as_ref()) {
        std::fs::write(path, &json_str)
            .map_err(|e| recon_err(EXIT_ERROR, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    print_summary(&result);

    let s = &result.summary;
    if s.create_failures > 0 {
        return Err(recon_err(
            EXIT_CREATE_FAILED,
            format!("{} invoice(s) could not be created", s.create_failures),
        ));
    }
    if fail_on_drift && s.has_drift() {
        return Err(recon_err(
            EXIT_DRIFT,
            format!("{} different, {} missing", s.different, s.missing),
        ));
    }
    Ok(())
}

/// Human summary to stderr; stdout stays reserved for `--json`.
fn print_summary(result: &ReconResult) {
    let s = &result.summary;
    eprintln!(
        "{}: {} invoices, {} unchanged, {} different, {} added, {} missing, {} failed",
        result.meta.name, s.total, s.unchanged, s.different, s.added, s.missing, s.failed,
    );
    if s.skipped_without_key > 0 {
        eprintln!("skipped {} record(s) without an invoice number", s.skipped_without_key);
    }
    for record in &result.records {
        if matches!(record.status, SyncStatus::Different | SyncStatus::Missing | SyncStatus::Failed) {
            eprintln!("  {:<10} {}", record.status.to_string(), record.display_key());
        }
    }
}
