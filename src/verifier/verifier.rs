use tracing::debug;

use crate::{
    catalog::SchemaCatalog,
    diagnostics::{Diagnostic, Diagnostics},
    planner::LogicalPlan,
    verifier::{FilterRules, FunctionRules, GroupingRules},
};

/// Semantic checks over an analyzed plan.
pub struct Verifier<'a> {
    catalog: &'a SchemaCatalog,
}

impl<'a> Verifier<'a> {
    pub fn new(catalog: &'a SchemaCatalog) -> Self {
        Self { catalog }
    }

    /// Unresolved nodes when there are any, otherwise every rule violation, in stage order.
    pub fn verify(&self, plan: &LogicalPlan) -> Vec<Diagnostic> {
        let mut diagnostics = Diagnostics::new();
        let failures = plan.failures();
        if !failures.is_empty() {
            debug!(unresolved = failures.len(), "plan is not fully resolved");
            for (clause, failure) in &failures {
                diagnostics.push_failure(*clause, failure);
            }
            return diagnostics.into_sorted();
        }

        // fields bound against the sources the FROM pattern names
        let scope = plan.relation().and_then(|relation| self.catalog.scope(&relation.name));
        let catalog = scope.as_deref().unwrap_or(self.catalog);

        GroupingRules::check(plan, &mut diagnostics);
        FilterRules::check(plan, &mut diagnostics);
        FunctionRules::check(plan, catalog, &mut diagnostics);

        debug!(problems = diagnostics.len(), "verified plan");
        diagnostics.into_sorted()
    }
}

pub fn verify(plan: &LogicalPlan, catalog: &SchemaCatalog) -> Vec<Diagnostic> {
    Verifier::new(catalog).verify(plan)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        analyzer::{analyze, Expression},
        ast::{BinaryOp, Expr, Location, OrderItem, Query, SelectItem},
        catalog::{DataType, SourceSchema},
        functions::FunctionRegistry,
        planner::{RelationRef, RelationStatus},
        verifier::_fixtures::*,
    };

    fn source(name: &str, mapping: serde_json::Value) -> SourceSchema {
        SourceSchema::from_json(name, &mapping).unwrap()
    }

    fn rendered(diagnostics: Vec<Diagnostic>) -> Vec<String> {
        diagnostics.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn verifying_an_accepted_plan_twice_reports_nothing() {
        let catalog = SchemaCatalog::single(source("test", json!({ "properties": { "int": { "type": "integer" } } })));
        let at = |column| Location::new(1, column);
        let max = |column| Expr::function("MAX", vec![Expr::column("int", at(column + 4))], at(column));
        let query = Query::select(vec![SelectItem::new(Expr::column("int", at(8))), SelectItem::new(max(13))])
            .from("test", at(27))
            .filter(Expr::binary(BinaryOp::Gt, Expr::column("int", at(38)), Expr::int(1, at(44))))
            .group_by(vec![Expr::column("int", at(55))])
            .having(Expr::binary(BinaryOp::Gt, max(66), Expr::int(10, at(77))))
            .order_by(vec![OrderItem::asc(Expr::column("int", at(89)))]);

        let (plan, problems) = analyze(&query, &catalog, &FunctionRegistry::builtin());
        assert!(problems.is_empty(), "{:?}", problems);

        let verifier = Verifier::new(&catalog);
        assert!(verifier.verify(&plan).is_empty());
        assert!(verifier.verify(&plan).is_empty());
    }

    #[test]
    fn unresolved_plans_skip_the_rules() {
        let catalog = SchemaCatalog::single(source("test", json!({ "properties": { "date": { "type": "date" } } })));
        let histogram = call("HISTOGRAM", vec![field("date", DataType::Datetime, 18), month(24)], 8);
        let plan = order_by(
            project(vec![histogram, Expression::unresolved("xxx", "Unknown column [xxx]", loc(43))]),
            vec![Expression::unresolved("yyy", "Unknown column [yyy]", loc(60))],
        );
        assert_eq!(
            rendered(verify(&plan, &catalog)),
            vec!["line 1:43: Unknown column [xxx]", "line 1:60: Unknown column [yyy]"]
        );
    }

    #[test]
    fn function_rules_see_only_the_named_sources() {
        let catalog = SchemaCatalog::merge(vec![
            source("with_keyword", json!({
                "properties": { "name": { "type": "text", "fields": { "keyword": { "type": "keyword" } } } }
            })),
            source("text_only", json!({ "properties": { "name": { "type": "text" } } })),
        ])
        .unwrap();

        let over = |index: &str| LogicalPlan::Project {
            input: Box::new(LogicalPlan::Relation(RelationRef {
                name: index.into(),
                location: loc(27),
                status: RelationStatus::Resolved,
            })),
            selections: vec![call("FIRST", vec![field("name", DataType::Text, 14)], 8)],
        };

        assert!(verify(&over("*"), &catalog).is_empty());
        assert!(verify(&over("with_keyword"), &catalog).is_empty());
        assert_eq!(
            rendered(verify(&over("text_*"), &catalog)),
            vec!["line 1:8: [FIRST] cannot operate on first argument field of data type [text]"]
        );
    }
}
