use crate::{
    analyzer::Expression,
    diagnostics::Diagnostics,
    planner::{Clause, LogicalPlan},
};

/// Checks on WHERE and HAVING conditions.
pub struct FilterRules;

impl FilterRules {
    pub fn check(plan: &LogicalPlan, diagnostics: &mut Diagnostics) {
        if let Some(condition) = plan.filter() {
            Self::check_where(condition, diagnostics);
        }
        if let Some(condition) = plan.having() {
            Self::check_having(condition, diagnostics);
        }
    }

    fn check_where(condition: &Expression, diagnostics: &mut Diagnostics) {
        condition.visit(&mut |e| {
            let Expression::FunctionCall(call) = e else { return true };
            let Some(def) = call.def() else { return true };
            if def.is_aggregate() {
                diagnostics.push(
                    Clause::Where,
                    call.location,
                    format!("Cannot use WHERE filtering on aggregate function [{}], use HAVING instead", e),
                );
                false
            } else if def.is_grouping() {
                diagnostics.push(
                    Clause::Where,
                    call.location,
                    format!("Cannot filter on grouping function [{}], use its argument instead", e),
                );
                false
            } else {
                true
            }
        });
    }

    fn check_having(condition: &Expression, diagnostics: &mut Diagnostics) {
        if let Some(field) = first_non_aggregate(condition) {
            diagnostics.push(
                Clause::Having,
                condition.location(),
                format!("Cannot use HAVING filter on non-aggregate [{}]; use WHERE instead", field),
            );
        }

        condition.visit(&mut |e| match e {
            Expression::Alias { name, location, inner } if inner.is_grouping_function() => {
                diagnostics.push(
                    Clause::Having,
                    *location,
                    format!("Cannot filter on grouping function [{}], use its argument instead", name),
                );
                false
            }
            Expression::FunctionCall(call) if call.def().is_some_and(|def| def.is_grouping()) => {
                diagnostics.push(
                    Clause::Having,
                    call.location,
                    format!("Cannot filter on grouping function [{}], use its argument instead", e),
                );
                false
            }
            _ => true,
        });

        condition.for_each_down(&mut |e| {
            if let Expression::FieldRef { field, location } = e {
                if field.nested {
                    diagnostics.push(
                        Clause::Having,
                        *location,
                        format!("HAVING isn't (yet) compatible with nested fields [{}]", field.path),
                    );
                }
            }
        });

        // backed by top hits, which cannot be filtered on after aggregation
        condition.visit(&mut |e| {
            let Expression::FunctionCall(call) = e else { return true };
            let Some(def) = call.def() else { return true };
            let over_strings = def.string_top_hits
                && call.args.first().and_then(Expression::data_type).is_some_and(|ty| ty.is_string());
            if !def.column_args.is_empty() || over_strings {
                diagnostics.push(
                    Clause::Having,
                    call.location,
                    format!("HAVING filter is unsupported for function [{}]", e),
                );
                return false;
            }
            true
        });
    }
}

/// First field read outside an aggregate or a grouping function.
fn first_non_aggregate(condition: &Expression) -> Option<&Expression> {
    let mut found = None;
    condition.visit(&mut |e| {
        if found.is_some() || e.is_aggregate() || e.is_grouping_function() {
            return false;
        }
        if matches!(e, Expression::FieldRef { .. }) {
            found = Some(e);
            return false;
        }
        true
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;
    use crate::verifier::_fixtures::*;

    fn check(plan: &LogicalPlan) -> Vec<String> {
        let mut diagnostics = Diagnostics::new();
        FilterRules::check(plan, &mut diagnostics);
        messages(diagnostics)
    }

    fn grouped_by_int() -> LogicalPlan {
        aggregate(vec![field("int", DataType::Integer, 31)], vec![field("int", DataType::Integer, 8)])
    }

    fn histogram(column: usize) -> Expression {
        call("HISTOGRAM", vec![field("date", DataType::Datetime, column + 10), month(column + 16)], column)
    }

    #[test]
    fn where_rejects_aggregates_and_grouping_functions() {
        let plan = filtered(
            infix(">", call("MAX", vec![field("int", DataType::Integer, 37)], 33), int(10, 44)),
            vec![field("bool", DataType::Boolean, 55)],
            vec![call("MAX", vec![field("int", DataType::Integer, 12)], 8)],
        );
        assert_eq!(
            check(&plan),
            vec!["line 1:33: Cannot use WHERE filtering on aggregate function [MAX(int)], use HAVING instead"]
        );

        let plan = filtered(infix(">", histogram(26), int(1, 60)), vec![histogram(70)], vec![histogram(8)]);
        assert_eq!(
            check(&plan),
            vec!["line 1:26: Cannot filter on grouping function [HISTOGRAM(date, INTERVAL 1 MONTH)], use its argument instead"]
        );
    }

    #[test]
    fn having_on_a_plain_field_is_reported_at_the_condition() {
        let condition = infix("<", int(2, 42), call("ABS", vec![field("int", DataType::Integer, 50)], 46));
        assert_eq!(
            check(&having(grouped_by_int(), condition)),
            vec!["line 1:42: Cannot use HAVING filter on non-aggregate [int]; use WHERE instead"]
        );

        let condition = infix(">", call("MAX", vec![field("int", DataType::Integer, 46)], 42), int(10, 53));
        assert!(check(&having(grouped_by_int(), condition)).is_empty());
    }

    #[test]
    fn having_on_an_aliased_grouping_function() {
        let plan = aggregate(vec![alias("h", histogram(8), 8)], vec![alias("h", histogram(8), 8)]);
        let condition = infix(">", alias("h", histogram(8), 75), int(1, 79));
        assert_eq!(
            check(&having(plan, condition)),
            vec!["line 1:75: Cannot filter on grouping function [h], use its argument instead"]
        );
    }

    #[test]
    fn having_on_nested_fields() {
        let max = call("MAX", vec![nested_field("dep.start_date", DataType::Datetime, 55)], 51);
        let condition = infix(">", max, int(1, 75));
        assert_eq!(
            check(&having(grouped_by_int(), condition)),
            vec!["line 1:55: HAVING isn't (yet) compatible with nested fields [dep.start_date]"]
        );
    }

    #[test]
    fn having_on_top_hits() {
        let first = call("FIRST", vec![field("int", DataType::Integer, 56)], 50);
        let condition = infix(">", first, int(10, 63));
        assert_eq!(
            check(&having(grouped_by_int(), condition)),
            vec!["line 1:50: HAVING filter is unsupported for function [FIRST(int)]"]
        );

        let min = call("MIN", vec![field("keyword", DataType::Keyword, 54)], 50);
        let condition = infix(">", min, Expression::literal(crate::ast::Literal::String("a".into()), loc(66)));
        assert_eq!(
            check(&having(grouped_by_int(), condition)),
            vec!["line 1:50: HAVING filter is unsupported for function [MIN(keyword)]"]
        );

        let min = call("MIN", vec![field("int", DataType::Integer, 54)], 50);
        assert!(check(&having(grouped_by_int(), infix(">", min, int(10, 61)))).is_empty());
    }
}
