//! User-visible run output.
//!
//! Engine diagnostics are shown to the user as soon as a run returns,
//! before success or failure is decided. They go through a [`Reporter`]
//! so embedders and tests can capture them; the default prints to stdout.

use std::sync::Mutex;

use log::{error, warn};

use crate::run::response::Diagnostic;

/// Sink for lines shown to the user.
pub trait Reporter: Send + Sync {
    /// Shows one line.
    fn line(&self, line: &str);
}

/// Prints every line to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn line(&self, line: &str) {
        println!("{line}");
    }
}

/// Keeps every line in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<String>>,
}

impl MemoryReporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines reported so far, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

impl Reporter for MemoryReporter {
    fn line(&self, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line.to_string());
        }
    }
}

/// Reports diagnostics in engine order. Warnings are skipped when
/// `no_warnings` is set; errors never are.
pub(crate) fn report_diagnostics(
    reporter: &dyn Reporter,
    diagnostics: &[Diagnostic],
    no_warnings: bool,
) {
    for diagnostic in diagnostics {
        if diagnostic.is_warning {
            warn!("engine warning: {}", diagnostic.message);
            if !no_warnings {
                reporter.line(&format!("Warning: {}", diagnostic.message));
            }
        } else {
            error!("engine error: {}", diagnostic.message);
            reporter.line(&format!("Error: {}", diagnostic.message));
        }
    }
}
