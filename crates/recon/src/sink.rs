//! Status-line sinks.
//!
//! The engine never touches a global logger. Callers pass a [`StatusSink`]
//! to [`crate::Reconciler::new`]; binaries hand over a [`TracingSink`] after
//! installing their subscriber, tests use a [`MemorySink`].

/// Receives the human-readable status trail of a reconciliation.
pub trait StatusSink {
    fn info(&mut self, line: &str);
    fn warn(&mut self, line: &str);
    fn debug(&mut self, _line: &str) {}
}

impl<S: StatusSink + ?Sized> StatusSink for &mut S {
    fn info(&mut self, line: &str) {
        (**self).info(line)
    }
    fn warn(&mut self, line: &str) {
        (**self).warn(line)
    }
    fn debug(&mut self, line: &str) {
        (**self).debug(line)
    }
}

/// Forwards every line to `tracing` under the `ledgersync::recon` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn info(&mut self, line: &str) {
        tracing::info!(target: "ledgersync::recon", "{line}");
    }
    fn warn(&mut self, line: &str) {
        tracing::warn!(target: "ledgersync::recon", "{line}");
    }
    fn debug(&mut self, line: &str) {
        tracing::debug!(target: "ledgersync::recon", "{line}");
    }
}

/// Captures lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub lines: Vec<String>,
    pub warnings: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of info lines exactly equal to `line`.
    pub fn count(&self, line: &str) -> usize {
        self.lines.iter().filter(|l| l.as_str() == line).count()
    }
}

impl StatusSink for MemorySink {
    fn info(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
    fn warn(&mut self, line: &str) {
        self.warnings.push(line.to_string());
    }
}
