use std::sync::Arc;

use tracing::debug;

use crate::{
    analyzer::analyze_with,
    ast::Query,
    catalog::{CatalogError, SchemaCatalog, SourceSchema},
    config::AnalyzerConfig,
    diagnostics::{report, AnalysisError},
    functions::FunctionRegistry,
    planner::LogicalPlan,
    verifier::verify,
};

/// Analyze, then verify when everything bound, then report.
pub fn compile(
    query: &Query,
    catalog: &SchemaCatalog,
    registry: &FunctionRegistry,
    config: &AnalyzerConfig,
) -> Result<LogicalPlan, AnalysisError> {
    let (plan, unresolved) = analyze_with(query, catalog, registry, config);
    let diagnostics = if unresolved.is_empty() { verify(&plan, catalog) } else { unresolved };
    debug!(problems = diagnostics.len(), "compiled query");
    report(plan, diagnostics)
}

/// Shareable front door holding a catalog, a registry and the analyzer settings.
#[derive(Debug, Clone)]
pub struct QueryCompiler {
    catalog: Arc<SchemaCatalog>,
    registry: Arc<FunctionRegistry>,
    config: AnalyzerConfig,
}

impl QueryCompiler {
    /// Compiler over `catalog` with the built-in functions and default settings.
    pub fn new(catalog: SchemaCatalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            registry: FunctionRegistry::builtin(),
            config: AnalyzerConfig::default(),
        }
    }

    /// Merge the given sources into one catalog.
    pub fn from_sources(sources: Vec<SourceSchema>) -> Result<Self, CatalogError> {
        Ok(Self::new(SchemaCatalog::merge(sources)?))
    }

    pub fn with_registry(mut self, registry: Arc<FunctionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn compile(&self, query: &Query) -> Result<LogicalPlan, AnalysisError> {
        compile(query, &self.catalog, &self.registry, &self.config)
    }
}
