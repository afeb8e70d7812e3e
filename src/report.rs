//! Diagnostic reporting.
//!
//! Estimators never print. Iteration counts, error statistics and refinement
//! warnings go through a [`Reporter`] chosen by the caller: [`LogReporter`]
//! forwards to the `log` facade, [`SilentReporter`] drops everything and
//! [`MemoryReporter`] keeps the messages for later inspection.

use std::cell::RefCell;
use std::fmt;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl From<Severity> for log::Level {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// Sink for human-readable diagnostics.
pub trait Reporter {
    fn report(&self, severity: Severity, message: fmt::Arguments<'_>);

    fn info(&self, message: fmt::Arguments<'_>) {
        self.report(Severity::Info, message);
    }

    fn warning(&self, message: fmt::Arguments<'_>) {
        self.report(Severity::Warning, message);
    }

    fn error(&self, message: fmt::Arguments<'_>) {
        self.report(Severity::Error, message);
    }
}

/// Forwards diagnostics to the `log` crate under the `orsa` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, severity: Severity, message: fmt::Arguments<'_>) {
        log::log!(target: "orsa", log::Level::from(severity), "{}", message);
    }
}

/// Discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn report(&self, _severity: Severity, _message: fmt::Arguments<'_>) {}
}

/// Records diagnostics in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: RefCell<Vec<(Severity, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages, oldest first.
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.borrow().clone()
    }

    /// Recorded messages of the given severity.
    pub fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, severity: Severity, message: fmt::Arguments<'_>) {
        self.messages
            .borrow_mut()
            .push((severity, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reporter_keeps_order_and_severity() {
        let reporter = MemoryReporter::new();
        reporter.info(format_args!("Iterations: {}", 12));
        reporter.warning(format_args!("careful"));
        reporter.error(format_args!("broken"));

        let messages = reporter.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], (Severity::Info, "Iterations: 12".to_string()));
        assert_eq!(reporter.with_severity(Severity::Warning), vec!["careful"]);

        reporter.clear();
        assert!(reporter.messages().is_empty());
    }

    #[test]
    fn severities_map_onto_log_levels() {
        assert_eq!(log::Level::from(Severity::Info), log::Level::Info);
        assert_eq!(log::Level::from(Severity::Warning), log::Level::Warn);
        assert_eq!(log::Level::from(Severity::Error), log::Level::Error);
    }

    #[test]
    fn silent_and_log_reporters_accept_messages() {
        SilentReporter.warning(format_args!("dropped"));
        LogReporter.info(format_args!("forwarded"));
    }
}
