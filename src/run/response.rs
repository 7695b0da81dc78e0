//! The engine's answer to a run request.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One engine-reported message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Message text.
    pub message: String,
    /// `false` for errors.
    pub is_warning: bool,
}

impl Diagnostic {
    /// An error diagnostic.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_warning: false,
        }
    }

    /// A warning diagnostic.
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_warning: true,
        }
    }
}

/// A result table in the engine's native form: an observations ×
/// variables matrix and the variable names, in the same order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    /// Observations × variables.
    pub data: Array2<f64>,
    /// Variable names, one per matrix column.
    pub columns: Vec<String>,
}

/// Everything a single engine call returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineResponse {
    /// Whether the engine finished the run.
    pub success: bool,
    /// Named result tables in engine order.
    pub tables: Vec<(String, ResultTable)>,
    /// Errors and warnings, interleaved as reported.
    pub diagnostics: Vec<Diagnostic>,
}

impl EngineResponse {
    /// An empty successful response.
    #[must_use]
    pub fn succeeded() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    /// An empty failed response.
    #[must_use]
    pub fn failed() -> Self {
        Self::default()
    }

    /// Appends a result table.
    #[must_use]
    pub fn with_table(
        mut self,
        name: impl Into<String>,
        data: Array2<f64>,
        columns: Vec<String>,
    ) -> Self {
        self.tables.push((name.into(), ResultTable { data, columns }));
        self
    }

    /// Appends a diagnostic.
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    /// Number of diagnostics that are errors rather than warnings.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| !d.is_warning).count()
    }
}
