use crate::{
    analyzer::{AnalysisContext, ColumnResolver, Expression, FunctionCall, FunctionResolver},
    planner::Clause,
};

pub struct ScalarResolver;

impl ScalarResolver {
    /// Resolve an expression bottom-up: columns first, then the calls over them.
    pub fn resolve(expr: Expression, clause: Clause, ctx: &AnalysisContext) -> Expression {
        match expr {
            Expression::ColumnRef { name, location } => ColumnResolver::resolve(&name, location, clause, ctx),

            Expression::FunctionCall(call) => {
                // COUNT(*) keeps its wildcard; any other `*` argument is rejected below
                let args = if is_count_star(&call) {
                    call.args
                } else {
                    call.args.into_iter().map(|arg| Self::resolve(arg, clause, ctx)).collect()
                };
                Expression::FunctionCall(FunctionResolver::resolve(FunctionCall { args, ..call }, ctx))
            }

            Expression::Alias { name, inner, location } => Expression::Alias {
                name,
                inner: Box::new(Self::resolve(*inner, clause, ctx)),
                location,
            },

            Expression::Cast { inner, data_type, location } => Expression::Cast {
                inner: Box::new(Self::resolve(*inner, clause, ctx)),
                data_type,
                location,
            },

            Expression::Wildcard { qualifier, location } => {
                let star = match qualifier {
                    Some(q) => format!("{}.*", q),
                    None => "*".to_string(),
                };
                Expression::unresolved(star, "Cannot use [*] outside of COUNT", location)
            }

            other => other,
        }
    }

    pub fn resolve_all(exprs: Vec<Expression>, clause: Clause, ctx: &AnalysisContext) -> Vec<Expression> {
        exprs.into_iter().map(|e| Self::resolve(e, clause, ctx)).collect()
    }
}

fn is_count_star(call: &FunctionCall) -> bool {
    call.name.eq_ignore_ascii_case("COUNT")
        && matches!(call.args.as_slice(), [Expression::Wildcard { qualifier: None, .. }])
}
