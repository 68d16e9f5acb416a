use indexmap::IndexMap;

use crate::{analyzer::Expression, catalog::SchemaCatalog, config::AnalyzerConfig, functions::FunctionRegistry};

pub struct AnalysisContext<'a> {
    /// Fields in scope; `None` for a query without FROM
    pub catalog: Option<&'a SchemaCatalog>,
    pub registry: &'a FunctionRegistry,
    pub config: &'a AnalyzerConfig,
    /// SELECT alias -> resolved expression, in SELECT order
    pub aliases: IndexMap<String, Expression>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(
        catalog: Option<&'a SchemaCatalog>,
        registry: &'a FunctionRegistry,
        config: &'a AnalyzerConfig,
    ) -> Self {
        Self { catalog, registry, config, aliases: IndexMap::new() }
    }

    /// Record the aliases declared by resolved SELECT items. The first declaration wins.
    pub fn add_aliases(&mut self, selections: &[Expression]) {
        for selection in selections {
            if let Expression::Alias { name, inner, .. } = selection {
                self.aliases.entry(name.clone()).or_insert_with(|| inner.as_ref().clone());
            }
        }
    }

    pub fn alias(&self, name: &str) -> Option<&Expression> {
        self.aliases.get(name)
    }
}
