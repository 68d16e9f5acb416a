use crate::{
    analyzer::{CallSyntax, Expression, FunctionCall, Resolution},
    ast::{Expr, ExprKind, Query, SelectItem},
    catalog::DataType,
    functions::FunctionRegistry,
    planner::{LogicalPlan, RelationRef, RelationStatus, SortKey},
};

/// Lowers the parser's syntax tree into an unresolved [`LogicalPlan`].
///
/// Names stay unbound (`ColumnRef`, pending calls); the registry is only used to
/// decide whether the query aggregates.
pub struct PlanBuilder<'a> {
    registry: &'a FunctionRegistry,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(registry: &'a FunctionRegistry) -> Self {
        Self { registry }
    }

    pub fn build(&self, query: &Query) -> LogicalPlan {
        let mut plan = match &query.from {
            Some(table) => LogicalPlan::Relation(RelationRef {
                name: table.name.clone(),
                location: table.location,
                status: RelationStatus::Pending,
            }),
            None => LogicalPlan::Empty,
        };

        if let Some(criteria) = &query.criteria {
            plan = LogicalPlan::Filter { input: Box::new(plan), condition: self.lower(criteria) };
        }

        let selections: Vec<Expression> = query.projection.iter().map(|item| self.lower_select(item)).collect();
        let aggregates = !query.group_by.is_empty()
            || query.having.is_some()
            || query.projection.iter().any(|item| self.has_aggregate(&item.expr))
            || query.order_by.iter().any(|item| self.has_aggregate(&item.expr));

        plan = if aggregates {
            LogicalPlan::Aggregate {
                input: Box::new(plan),
                groupings: query.group_by.iter().map(|key| self.lower(key)).collect(),
                selections,
            }
        } else {
            LogicalPlan::Project { input: Box::new(plan), selections }
        };

        if let Some(having) = &query.having {
            plan = LogicalPlan::Having { input: Box::new(plan), condition: self.lower(having) };
        }

        if !query.order_by.is_empty() {
            let keys = query
                .order_by
                .iter()
                .map(|item| SortKey { expr: self.lower(&item.expr), ascending: item.ascending })
                .collect();
            plan = LogicalPlan::OrderBy { input: Box::new(plan), keys };
        }

        plan
    }

    fn lower_select(&self, item: &SelectItem) -> Expression {
        let inner = self.lower(&item.expr);
        match &item.alias {
            Some(name) => Expression::Alias {
                name: name.clone(),
                location: inner.location(),
                inner: Box::new(inner),
            },
            None => inner,
        }
    }

    pub fn lower(&self, expr: &Expr) -> Expression {
        let location = expr.location;
        let call = |name: &str, args: Vec<Expression>, distinct: bool, syntax: CallSyntax| {
            Expression::FunctionCall(FunctionCall {
                name: name.to_string(),
                args,
                distinct,
                syntax,
                resolution: Resolution::Pending,
                location,
            })
        };

        match &expr.kind {
            ExprKind::Column(name) => Expression::ColumnRef { name: name.clone(), location },
            ExprKind::Star(qualifier) => Expression::Wildcard { qualifier: qualifier.clone(), location },
            ExprKind::Literal(value) => Expression::literal(value.clone(), location),
            ExprKind::Function { name, args, distinct } => {
                call(name.as_str(), self.lower_all(args), *distinct, CallSyntax::Call)
            }
            ExprKind::Unary { op, operand } => {
                call(op.registry_name(), vec![self.lower(operand)], false, CallSyntax::Prefix)
            }
            ExprKind::Binary { op, left, right } => {
                call(op.symbol(), vec![self.lower(left), self.lower(right)], false, CallSyntax::Infix)
            }
            ExprKind::In { value, list, negated } => {
                let mut args = vec![self.lower(value)];
                args.extend(self.lower_all(list));
                call("IN", args, false, CallSyntax::In { negated: *negated })
            }
            ExprKind::Cast { operand, data_type } => match DataType::from_sql_name(data_type) {
                Some(data_type) => Expression::Cast { inner: Box::new(self.lower(operand)), data_type, location },
                None => Expression::unresolved(
                    data_type.clone(),
                    format!("Unknown data type [{}]", data_type),
                    location,
                ),
            },
            ExprKind::Extract { field, source } => {
                call(field.as_str(), vec![self.lower(source)], false, CallSyntax::Extract)
            }
        }
    }

    fn lower_all(&self, exprs: &[Expr]) -> Vec<Expression> {
        exprs.iter().map(|e| self.lower(e)).collect()
    }

    fn has_aggregate(&self, expr: &Expr) -> bool {
        match &expr.kind {
            ExprKind::Function { name, args, .. } => {
                self.registry.get(name).is_some_and(|def| def.is_aggregate())
                    || args.iter().any(|a| self.has_aggregate(a))
            }
            ExprKind::Unary { operand, .. } | ExprKind::Cast { operand, .. } => self.has_aggregate(operand),
            ExprKind::Extract { source, .. } => self.has_aggregate(source),
            ExprKind::Binary { left, right, .. } => self.has_aggregate(left) || self.has_aggregate(right),
            ExprKind::In { value, list, .. } => {
                self.has_aggregate(value) || list.iter().any(|a| self.has_aggregate(a))
            }
            ExprKind::Column(_) | ExprKind::Star(_) | ExprKind::Literal(_) => false,
        }
    }
}
