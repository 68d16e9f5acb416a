use crate::{
    analyzer::Expression,
    diagnostics::Diagnostics,
    planner::{Clause, LogicalPlan},
};

/// Checks that tie SELECT and ORDER BY to the GROUP BY keys.
pub struct GroupingRules;

impl GroupingRules {
    pub fn check(plan: &LogicalPlan, diagnostics: &mut Diagnostics) {
        let groupings = plan.groupings().unwrap_or(&[]);
        let keys: Vec<&Expression> = groupings.iter().map(Expression::strip_alias).collect();

        let before = diagnostics.len();
        for grouping in groupings {
            Self::check_key(grouping, &keys, diagnostics);
        }
        let keys_failed = diagnostics.len() > before;

        Self::check_grouping_functions(plan, &keys, diagnostics);

        if plan.is_aggregate() && !keys_failed {
            Self::check_selections(plan, &keys, diagnostics);
            Self::check_order_by(plan, &keys, diagnostics);
        }
    }

    fn check_key(grouping: &Expression, keys: &[&Expression], diagnostics: &mut Diagnostics) {
        grouping.visit(&mut |e| match e {
            Expression::FunctionCall(call) if call.def().is_some_and(|def| def.is_aggregate()) => {
                diagnostics.push(
                    Clause::GroupBy,
                    call.location,
                    format!("Cannot use an aggregate [{}] for grouping", call.canonical_name()),
                );
                false
            }
            _ => true,
        });

        grouping.for_each_down(&mut |e| {
            if let Expression::FieldRef { field, location } = e {
                if field.nested {
                    diagnostics.push(
                        Clause::GroupBy,
                        *location,
                        format!("Grouping isn't (yet) compatible with nested fields [{}]", field.path),
                    );
                }
            }
        });

        let outer = grouping.strip_alias();
        if outer.as_call().is_none() || outer.is_grouping_function() {
            return;
        }
        outer.visit(&mut |e| {
            if !e.is_grouping_function() {
                return true;
            }
            if !keys.iter().any(|k| k.semantic_eq(e)) {
                diagnostics.push(
                    Clause::GroupBy,
                    e.location(),
                    format!(
                        "Cannot combine [{}] grouping function inside GROUP BY, found [{}]; \
                         consider moving the expression inside the histogram",
                        e, outer
                    ),
                );
            }
            false
        });
    }

    /// Grouping functions used outside GROUP BY must be keys themselves.
    fn check_grouping_functions(plan: &LogicalPlan, keys: &[&Expression], diagnostics: &mut Diagnostics) {
        let selections = plan.selections().iter().map(|e| (Clause::Select, e));
        let order_by = plan.order_by().iter().map(|k| (Clause::OrderBy, &k.expr));

        for (clause, expr) in selections.chain(order_by) {
            expr.visit(&mut |e| {
                // alias references are checked where the alias is declared
                if clause != Clause::Select && matches!(e, Expression::Alias { .. }) {
                    return false;
                }
                if keys.iter().any(|k| k.semantic_eq(e)) {
                    return false;
                }
                if let Expression::FunctionCall(call) = e {
                    if call.def().is_some_and(|def| def.is_grouping()) {
                        diagnostics.push(clause, call.location, format!("[{}] needs to be part of the grouping", e));
                        return false;
                    }
                }
                true
            });
        }
    }

    fn check_selections(plan: &LogicalPlan, keys: &[&Expression], diagnostics: &mut Diagnostics) {
        let mut missing: Vec<&Expression> = Vec::new();
        for selection in plan.selections() {
            collect_missing(selection, keys, &mut missing);
        }
        let Some(first) = missing.first() else { return };

        let plural = if missing.len() > 1 { "s" } else { "" };
        let suffix = if keys.is_empty() { " or an aggregate function" } else { "" };
        diagnostics.push(
            Clause::Select,
            first.location(),
            format!(
                "Cannot use non-grouped column{} [{}], expected [{}]{}",
                plural,
                join(&missing),
                join(keys),
                suffix
            ),
        );
    }

    fn check_order_by(plan: &LogicalPlan, keys: &[&Expression], diagnostics: &mut Diagnostics) {
        let suffix = if keys.is_empty() { " or an aggregate function" } else { "" };
        for key in plan.order_by() {
            let expr = &key.expr;
            match expr {
                // refers to a SELECT item, which was checked already
                Expression::Alias { .. } => {}
                Expression::FieldRef { .. } => {
                    if keys.iter().any(|k| k.semantic_eq(expr)) {
                        continue;
                    }
                    let inside_key = keys.iter().any(|k| k.exists(&|e| e.semantic_eq(expr)));
                    let message = if inside_key {
                        format!("Cannot use non-grouped column [{}], expected [{}]", expr, join(keys))
                    } else {
                        format!("Cannot order by non-grouped column [{}], expected [{}]{}", expr, join(keys), suffix)
                    };
                    diagnostics.push(Clause::OrderBy, expr.location(), message);
                }
                _ => {
                    let mut missing = Vec::new();
                    collect_missing(expr, keys, &mut missing);
                    if !missing.is_empty() {
                        diagnostics.push(
                            Clause::OrderBy,
                            expr.location(),
                            format!(
                                "Cannot order by non-grouped column [{}], expected [{}] or an aggregate function",
                                expr,
                                join(keys)
                            ),
                        );
                    }
                }
            }
        }
    }
}

/// Leaves of `expr` that neither match a key nor sit under an aggregate.
fn collect_missing<'a>(expr: &'a Expression, keys: &[&Expression], out: &mut Vec<&'a Expression>) {
    if keys.iter().any(|k| k.semantic_eq(expr)) || expr.is_foldable() {
        return;
    }
    match expr {
        Expression::Alias { inner, .. } | Expression::Cast { inner, .. } => collect_missing(inner, keys, out),
        Expression::FunctionCall(call) => match call.def() {
            Some(def) if def.is_aggregate() || def.is_grouping() => {}
            Some(def) if def.deterministic && !call.args.is_empty() => {
                for arg in &call.args {
                    collect_missing(arg, keys, out);
                }
            }
            _ => push_unique(out, expr),
        },
        Expression::FieldRef { .. } => push_unique(out, expr),
        _ => {}
    }
}

fn push_unique<'a>(out: &mut Vec<&'a Expression>, expr: &'a Expression) {
    if !out.iter().any(|e| e.semantic_eq(expr)) {
        out.push(expr);
    }
}

fn join(exprs: &[&Expression]) -> String {
    exprs.iter().map(|e| e.to_string()).collect::<Vec<_>>().join(", ")
}
