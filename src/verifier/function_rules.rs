use crate::{
    analyzer::{capitalize, ordinal, Expression, FunctionCall},
    catalog::{DataType, FieldDescriptor, Lookup, SchemaCatalog},
    diagnostics::Diagnostics,
    planner::{Clause, LogicalPlan},
};

/// Positional constraints of FIRST/LAST (table columns) and PERCENTILE (constants).
pub struct FunctionRules;

impl FunctionRules {
    pub fn check(plan: &LogicalPlan, catalog: &SchemaCatalog, diagnostics: &mut Diagnostics) {
        for (clause, expr) in plan.clause_expressions() {
            expr.visit(&mut |e| match e {
                Expression::Alias { .. } if clause != Clause::Select => false,
                Expression::FunctionCall(call) => {
                    Self::check_call(call, clause, catalog, diagnostics);
                    true
                }
                _ => true,
            });
        }
    }

    fn check_call(call: &FunctionCall, clause: Clause, catalog: &SchemaCatalog, diagnostics: &mut Diagnostics) {
        let Some(def) = call.def() else { return };

        for &position in &def.column_args {
            let Some(arg) = call.args.get(position) else { continue };
            let message = match arg.strip_alias() {
                Expression::FieldRef { field, .. } => {
                    if field.data_type == DataType::Text && !exact_match(field, catalog) {
                        Some(format!(
                            "[{}] cannot operate on {} argument field of data type [text]",
                            def.name,
                            ordinal(position)
                        ))
                    } else {
                        None
                    }
                }
                other if other.is_foldable() => Some(format!(
                    "{} argument of [{}] must be a table column, found constant [{}]",
                    capitalize(&ordinal(position)),
                    def.name,
                    other
                )),
                other => Some(format!(
                    "{} argument of [{}] must be a table column, found [{}]",
                    capitalize(&ordinal(position)),
                    def.name,
                    other
                )),
            };
            if let Some(message) = message {
                diagnostics.push(clause, call.location, message);
            }
        }

        for &position in &def.constant_args {
            let Some(arg) = call.args.get(position) else { continue };
            if !arg.is_foldable() {
                diagnostics.push(
                    clause,
                    call.location,
                    format!(
                        "{} argument of {} must be a constant, received [{}]",
                        capitalize(&ordinal(position)),
                        def.name,
                        arg
                    ),
                );
            }
        }
    }
}

// the catalog entry carries the multi-fields of every source
fn exact_match(field: &FieldDescriptor, catalog: &SchemaCatalog) -> bool {
    match catalog.lookup(&field.path) {
        Lookup::Found(found) => found.has_exact_match(),
        _ => field.has_exact_match(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::catalog::SourceSchema;
    use crate::verifier::_fixtures::*;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::single(
            SourceSchema::from_json("test", &json!({
                "properties": {
                    "int": { "type": "integer" },
                    "text": { "type": "text" },
                    "name": { "type": "text", "fields": { "keyword": { "type": "keyword" } } }
                }
            }))
            .unwrap(),
        )
    }

    fn check(plan: &LogicalPlan) -> Vec<String> {
        let mut diagnostics = Diagnostics::new();
        FunctionRules::check(plan, &catalog(), &mut diagnostics);
        messages(diagnostics)
    }

    #[test]
    fn percentile_needs_a_constant() {
        let plan = project(vec![call(
            "PERCENTILE",
            vec![field("int", DataType::Integer, 19), call("ABS", vec![field("int", DataType::Integer, 28)], 24)],
            8,
        )]);
        assert_eq!(check(&plan), vec!["line 1:8: Second argument of PERCENTILE must be a constant, received [ABS(int)]"]);

        let plan = project(vec![call("PERCENTILE", vec![field("int", DataType::Integer, 19), int(50, 24)], 8)]);
        assert!(check(&plan).is_empty());
    }

    #[test]
    fn first_on_text_needs_a_keyword_sub_field() {
        let plan = project(vec![call("FIRST", vec![field("text", DataType::Text, 14)], 8)]);
        assert_eq!(check(&plan), vec!["line 1:8: [FIRST] cannot operate on first argument field of data type [text]"]);

        // the bound descriptor has no children, the catalog entry does
        let plan = project(vec![call("FIRST", vec![field("name", DataType::Text, 14)], 8)]);
        assert!(check(&plan).is_empty());
    }

    #[test]
    fn last_sort_argument_must_be_a_column() {
        let plan = project(vec![call("LAST", vec![field("int", DataType::Integer, 13), int(10, 18)], 8)]);
        assert_eq!(check(&plan), vec!["line 1:8: Second argument of [LAST] must be a table column, found constant [10]"]);

        let abs = call("ABS", vec![field("int", DataType::Integer, 22)], 18);
        let plan = project(vec![call("LAST", vec![field("int", DataType::Integer, 13), abs], 8)]);
        assert_eq!(check(&plan), vec!["line 1:8: Second argument of [LAST] must be a table column, found [ABS(int)]"]);
    }

    #[test]
    fn order_by_alias_is_checked_once() {
        let first = || call("FIRST", vec![field("text", DataType::Text, 14)], 8);
        let plan = order_by(project(vec![alias("f", first(), 8)]), vec![alias("f", first(), 40)]);
        assert_eq!(check(&plan), vec!["line 1:8: [FIRST] cannot operate on first argument field of data type [text]"]);
    }
}
