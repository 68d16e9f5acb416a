use thiserror::Error;

use crate::{diagnostics::Diagnostic, planner::LogicalPlan};

/// A query that failed analysis or verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_report(.diagnostics))]
pub struct AnalysisError {
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Messages in report order, without positions.
    pub fn messages(&self) -> Vec<&str> {
        self.diagnostics.iter().map(|d| d.message.as_str()).collect()
    }
}

/// `Found N problem(s)` followed by one `line L:C: message` per diagnostic.
pub fn format_report(diagnostics: &[Diagnostic]) -> String {
    let mut out = format!("Found {} problem(s)", diagnostics.len());
    for diagnostic in diagnostics {
        out.push('\n');
        out.push_str(&diagnostic.to_string());
    }
    out
}

/// Hand back the plan when nothing was found, else the collected problems.
pub fn report(plan: LogicalPlan, diagnostics: Vec<Diagnostic>) -> Result<LogicalPlan, AnalysisError> {
    if diagnostics.is_empty() {
        Ok(plan)
    } else {
        Err(AnalysisError::new(diagnostics))
    }
}
