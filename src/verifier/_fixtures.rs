//! Bound plans built by hand for the rule tests.

use indexmap::IndexMap;

use crate::{
    analyzer::{CallSyntax, Expression, FunctionCall, Resolution},
    ast::{IntervalUnit, Literal, Location},
    catalog::{DataType, FieldDescriptor},
    diagnostics::Diagnostics,
    functions::FunctionRegistry,
    planner::{LogicalPlan, RelationRef, RelationStatus, SortKey},
};

pub fn loc(column: usize) -> Location {
    Location::new(1, column)
}

fn descriptor(path: &str, data_type: DataType, nested: bool) -> FieldDescriptor {
    FieldDescriptor {
        name: path.rsplit('.').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        data_type,
        aggregatable: true,
        alias: false,
        nested,
        children: IndexMap::new(),
    }
}

pub fn field(path: &str, data_type: DataType, column: usize) -> Expression {
    Expression::FieldRef { field: descriptor(path, data_type, false), location: loc(column) }
}

pub fn nested_field(path: &str, data_type: DataType, column: usize) -> Expression {
    Expression::FieldRef { field: descriptor(path, data_type, true), location: loc(column) }
}

pub fn int(value: i64, column: usize) -> Expression {
    Expression::literal(Literal::Integer(value), loc(column))
}

pub fn month(column: usize) -> Expression {
    Expression::literal(Literal::Interval { value: 1, unit: IntervalUnit::Month }, loc(column))
}

fn bound(name: &str, args: Vec<Expression>, syntax: CallSyntax, location: Location) -> Expression {
    let def = FunctionRegistry::builtin().get(name).unwrap_or_else(|| panic!("no built-in [{}]", name));
    Expression::FunctionCall(FunctionCall {
        name: name.to_string(),
        args,
        distinct: false,
        syntax,
        resolution: Resolution::Bound(def),
        location,
    })
}

pub fn call(name: &str, args: Vec<Expression>, column: usize) -> Expression {
    bound(name, args, CallSyntax::Call, loc(column))
}

/// Binary operator, located at its left operand.
pub fn infix(symbol: &str, left: Expression, right: Expression) -> Expression {
    let location = left.location();
    bound(symbol, vec![left, right], CallSyntax::Infix, location)
}

pub fn alias(name: &str, inner: Expression, column: usize) -> Expression {
    Expression::Alias { name: name.to_string(), inner: Box::new(inner), location: loc(column) }
}

pub fn relation() -> Box<LogicalPlan> {
    Box::new(LogicalPlan::Relation(RelationRef {
        name: "test".into(),
        location: loc(17),
        status: RelationStatus::Resolved,
    }))
}

pub fn project(selections: Vec<Expression>) -> LogicalPlan {
    LogicalPlan::Project { input: relation(), selections }
}

pub fn aggregate(groupings: Vec<Expression>, selections: Vec<Expression>) -> LogicalPlan {
    LogicalPlan::Aggregate { input: relation(), groupings, selections }
}

pub fn filtered(condition: Expression, groupings: Vec<Expression>, selections: Vec<Expression>) -> LogicalPlan {
    let input = Box::new(LogicalPlan::Filter { input: relation(), condition });
    LogicalPlan::Aggregate { input, groupings, selections }
}

pub fn having(input: LogicalPlan, condition: Expression) -> LogicalPlan {
    LogicalPlan::Having { input: Box::new(input), condition }
}

pub fn order_by(input: LogicalPlan, keys: Vec<Expression>) -> LogicalPlan {
    let keys = keys.into_iter().map(|expr| SortKey { expr, ascending: true }).collect();
    LogicalPlan::OrderBy { input: Box::new(input), keys }
}

/// Rendered `line L:C: message` entries in report order.
pub fn messages(diagnostics: Diagnostics) -> Vec<String> {
    diagnostics.into_sorted().iter().map(|d| d.to_string()).collect()
}
