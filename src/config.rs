use serde::{Deserialize, Serialize};

use crate::analyzer::DEFAULT_THRESHOLD;

/// Tuning knobs of the analyzer. Embeddable in a host configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Cap on column and datetime-field suggestions
    pub max_column_suggestions: usize,
    /// Cap on function-name suggestions
    pub max_function_suggestions: usize,
    /// Largest normalized edit distance still suggested
    pub similarity_threshold: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_column_suggestions: 4,
            max_function_suggestions: 3,
            similarity_threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl AnalyzerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// No "did you mean" hints at all.
    pub fn without_suggestions() -> Self {
        Self {
            max_column_suggestions: 0,
            max_function_suggestions: 0,
            ..Self::default()
        }
    }

    pub fn with_max_column_suggestions(mut self, max: usize) -> Self {
        self.max_column_suggestions = max;
        self
    }

    pub fn with_max_function_suggestions(mut self, max: usize) -> Self {
        self.max_function_suggestions = max;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }
}
