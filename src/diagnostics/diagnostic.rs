use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{analyzer::Failure, ast::Location, planner::Clause};

/// One user-facing problem, positioned at the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self { line: location.line, column: location.column, message: message.into() }
    }

    pub fn from_failure(failure: &Failure) -> Self {
        Self::new(failure.location, failure.message.clone())
    }

    pub fn location(&self) -> Location {
        Location::new(self.line, self.column)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{}: {}", self.line, self.column, self.message)
    }
}

/// Collects diagnostics from several passes and hands them back in stage order.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<(Clause, Diagnostic)>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clause: Clause, location: Location, message: impl Into<String>) {
        self.entries.push((clause, Diagnostic::new(location, message)));
    }

    pub fn push_failure(&mut self, clause: Clause, failure: &Failure) {
        self.entries.push((clause, Diagnostic::from_failure(failure)));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Stable sort by clause, so each clause keeps the order its checks ran in.
    pub fn into_sorted(mut self) -> Vec<Diagnostic> {
        self.entries.sort_by_key(|(clause, _)| *clause);
        self.entries.into_iter().map(|(_, d)| d).collect()
    }
}
