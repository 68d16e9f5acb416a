use tracing::debug;

use crate::{
    analyzer::{AnalysisContext, Expression, RelationResolver, ScalarResolver, WildcardResolver},
    ast::Query,
    catalog::SchemaCatalog,
    config::AnalyzerConfig,
    diagnostics::Diagnostic,
    functions::FunctionRegistry,
    planner::{Clause, LogicalPlan, PlanBuilder, RelationStatus, SortKey},
};

/// Binds a query against a catalog and a function registry.
pub struct Analyzer<'a> {
    catalog: &'a SchemaCatalog,
    registry: &'a FunctionRegistry,
    config: &'a AnalyzerConfig,
}

impl<'a> Analyzer<'a> {
    pub fn new(catalog: &'a SchemaCatalog, registry: &'a FunctionRegistry, config: &'a AnalyzerConfig) -> Self {
        Self { catalog, registry, config }
    }

    /// The bound plan plus one diagnostic per node that could not be bound.
    pub fn analyze(&self, query: &Query) -> (LogicalPlan, Vec<Diagnostic>) {
        let plan = PlanBuilder::new(self.registry).build(query);
        let scope = plan.relation().and_then(|relation| RelationResolver::scope(relation, self.catalog));
        let mut ctx = AnalysisContext::new(None, self.registry, self.config);
        let plan = Self::resolve_plan(plan, scope.as_deref(), &mut ctx);

        let diagnostics: Vec<Diagnostic> =
            plan.failures().iter().map(|(_, failure)| Diagnostic::from_failure(failure)).collect();
        debug!(problems = diagnostics.len(), aggregate = plan.is_aggregate(), "analyzed query");
        (plan, diagnostics)
    }

    // Children first: the relation decides what is in scope, SELECT declares the aliases
    // that GROUP BY, HAVING and ORDER BY may refer to.
    fn resolve_plan<'c>(
        plan: LogicalPlan,
        scope: Option<&'c SchemaCatalog>,
        ctx: &mut AnalysisContext<'c>,
    ) -> LogicalPlan {
        match plan {
            LogicalPlan::Empty => LogicalPlan::Empty,

            LogicalPlan::Relation(relation) => {
                let relation = RelationResolver::resolve(relation, scope);
                if relation.status == RelationStatus::Resolved {
                    ctx.catalog = scope;
                }
                LogicalPlan::Relation(relation)
            }

            LogicalPlan::Filter { input, condition } => {
                let input = Self::resolve_plan(*input, scope, ctx);
                let condition = ScalarResolver::resolve(condition, Clause::Where, ctx);
                LogicalPlan::Filter { input: Box::new(input), condition }
            }

            LogicalPlan::Project { input, selections } => {
                let input = Self::resolve_plan(*input, scope, ctx);
                let selections = Self::resolve_selections(selections, ctx);
                LogicalPlan::Project { input: Box::new(input), selections }
            }

            LogicalPlan::Aggregate { input, groupings, selections } => {
                let input = Self::resolve_plan(*input, scope, ctx);
                let selections = Self::resolve_selections(selections, ctx);
                let groupings = ScalarResolver::resolve_all(groupings, Clause::GroupBy, ctx);
                LogicalPlan::Aggregate { input: Box::new(input), groupings, selections }
            }

            LogicalPlan::Having { input, condition } => {
                let input = Self::resolve_plan(*input, scope, ctx);
                let condition = ScalarResolver::resolve(condition, Clause::Having, ctx);
                LogicalPlan::Having { input: Box::new(input), condition }
            }

            LogicalPlan::OrderBy { input, keys } => {
                let input = Self::resolve_plan(*input, scope, ctx);
                let keys = keys
                    .into_iter()
                    .map(|key| SortKey { expr: ScalarResolver::resolve(key.expr, Clause::OrderBy, ctx), ..key })
                    .collect();
                LogicalPlan::OrderBy { input: Box::new(input), keys }
            }
        }
    }

    fn resolve_selections(selections: Vec<Expression>, ctx: &mut AnalysisContext<'_>) -> Vec<Expression> {
        let expanded = WildcardResolver::expand_selections(selections, ctx);
        let resolved = ScalarResolver::resolve_all(expanded, Clause::Select, ctx);
        ctx.add_aliases(&resolved);
        resolved
    }
}

pub fn analyze(query: &Query, catalog: &SchemaCatalog, registry: &FunctionRegistry) -> (LogicalPlan, Vec<Diagnostic>) {
    analyze_with(query, catalog, registry, &AnalyzerConfig::default())
}

pub fn analyze_with(
    query: &Query,
    catalog: &SchemaCatalog,
    registry: &FunctionRegistry,
    config: &AnalyzerConfig,
) -> (LogicalPlan, Vec<Diagnostic>) {
    Analyzer::new(catalog, registry, config).analyze(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Expr, Location, OrderItem, SelectItem};
    use crate::catalog::SourceSchema;
    use serde_json::json;

    fn loc(column: usize) -> Location {
        Location::new(1, column)
    }

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::single(SourceSchema::from_json("test", &json!({
            "properties": {
                "int": { "type": "integer" },
                "text": { "type": "text" },
                "bool": { "type": "boolean" }
            }
        })).unwrap())
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
        diagnostics.iter().map(|d| format!("{}:{}: {}", d.line, d.column, d.message)).collect()
    }

    #[test]
    fn resolves_a_plain_query() {
        let catalog = catalog();
        let registry = FunctionRegistry::builtin();
        // SELECT * FROM test WHERE int > 1
        let query = Query::select(vec![SelectItem::new(Expr::star(loc(8)))])
            .from("test", loc(15))
            .filter(Expr::binary(BinaryOp::Gt, Expr::column("int", loc(26)), Expr::int(1, loc(32))));

        let (plan, diagnostics) = analyze(&query, &catalog, &registry);
        assert!(diagnostics.is_empty());
        let columns: Vec<String> = plan.selections().iter().map(|e| e.to_string()).collect();
        assert_eq!(columns, vec!["int", "text", "bool"]);
    }

    #[test]
    fn unknown_index_is_the_only_problem() {
        let catalog = catalog();
        let registry = FunctionRegistry::builtin();
        // SELECT foo FROM missing
        let query = Query::select(vec![SelectItem::new(Expr::column("foo", loc(8)))]).from("missing", loc(17));

        let (_, diagnostics) = analyze(&query, &catalog, &registry);
        assert_eq!(messages(&diagnostics), vec!["1:17: Unknown index [missing]"]);
    }

    #[test]
    fn problems_follow_stage_order() {
        let catalog = catalog();
        let registry = FunctionRegistry::builtin();
        // SELECT xxx FROM test GROUP BY DAY_oF_YEAR(xxx)
        let query = Query::select(vec![SelectItem::new(Expr::column("xxx", loc(8)))])
            .from("test", loc(17))
            .group_by(vec![Expr::function("DAY_oF_YEAR", vec![Expr::column("xxx", loc(43))], loc(31))]);

        let (_, diagnostics) = analyze(&query, &catalog, &registry);
        assert_eq!(messages(&diagnostics), vec!["1:43: Unknown column [xxx]", "1:8: Unknown column [xxx]"]);
    }

    #[test]
    fn aliases_resolve_after_select() {
        let catalog = catalog();
        let registry = FunctionRegistry::builtin();
        // SELECT int AS i FROM test ORDER BY i
        let query = Query::select(vec![SelectItem::aliased(Expr::column("int", loc(8)), "i")])
            .from("test", loc(22))
            .order_by(vec![OrderItem::asc(Expr::column("i", loc(36)))]);

        let (plan, diagnostics) = analyze(&query, &catalog, &registry);
        assert!(diagnostics.is_empty());
        assert!(matches!(&plan.order_by()[0].expr, Expression::Alias { name, .. } if name == "i"));
    }

    #[test]
    fn queries_without_from_only_see_literals() {
        let catalog = catalog();
        let registry = FunctionRegistry::builtin();
        // SELECT int
        let query = Query::select(vec![SelectItem::new(Expr::column("int", loc(8)))]);

        let (_, diagnostics) = analyze(&query, &catalog, &registry);
        assert_eq!(messages(&diagnostics), vec!["1:8: Unknown column [int]"]);
    }
}
