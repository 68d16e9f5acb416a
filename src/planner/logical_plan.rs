use crate::{
    analyzer::{Expression, Failure, Resolution},
    ast::Location,
    planner::Clause,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationStatus {
    Pending,
    Resolved,
    Unknown,
}

/// The index pattern named in FROM.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationRef {
    pub name: String,
    pub location: Location,
    pub status: RelationStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub expr: Expression,
    pub ascending: bool,
}

/// Linear pipeline `Relation -> Filter? -> (Project | Aggregate) -> Having? -> OrderBy?`.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalPlan {
    /// SELECT without FROM
    Empty,

    Relation(RelationRef),

    /// WHERE
    Filter {
        input: Box<LogicalPlan>,
        condition: Expression,
    },

    Project {
        input: Box<LogicalPlan>,
        selections: Vec<Expression>,
    },

    /// GROUP BY, or an implicit single group when SELECT/HAVING aggregate.
    Aggregate {
        input: Box<LogicalPlan>,
        groupings: Vec<Expression>,
        selections: Vec<Expression>,
    },

    Having {
        input: Box<LogicalPlan>,
        condition: Expression,
    },

    OrderBy {
        input: Box<LogicalPlan>,
        keys: Vec<SortKey>,
    },
}

impl LogicalPlan {
    pub fn input(&self) -> Option<&LogicalPlan> {
        match self {
            LogicalPlan::Empty | LogicalPlan::Relation(_) => None,
            LogicalPlan::Filter { input, .. }
            | LogicalPlan::Project { input, .. }
            | LogicalPlan::Aggregate { input, .. }
            | LogicalPlan::Having { input, .. }
            | LogicalPlan::OrderBy { input, .. } => Some(input.as_ref()),
        }
    }

    /// Nodes from the leaf up to `self`.
    pub fn pipeline(&self) -> Vec<&LogicalPlan> {
        let mut nodes = vec![self];
        let mut current = self;
        while let Some(input) = current.input() {
            nodes.push(input);
            current = input;
        }
        nodes.reverse();
        nodes
    }

    pub fn relation(&self) -> Option<&RelationRef> {
        self.pipeline().into_iter().find_map(|node| match node {
            LogicalPlan::Relation(relation) => Some(relation),
            _ => None,
        })
    }

    pub fn filter(&self) -> Option<&Expression> {
        self.pipeline().into_iter().find_map(|node| match node {
            LogicalPlan::Filter { condition, .. } => Some(condition),
            _ => None,
        })
    }

    /// Grouping keys; `None` for a plain projection.
    pub fn groupings(&self) -> Option<&[Expression]> {
        self.pipeline().into_iter().find_map(|node| match node {
            LogicalPlan::Aggregate { groupings, .. } => Some(groupings.as_slice()),
            _ => None,
        })
    }

    pub fn selections(&self) -> &[Expression] {
        self.pipeline()
            .into_iter()
            .find_map(|node| match node {
                LogicalPlan::Project { selections, .. } | LogicalPlan::Aggregate { selections, .. } => {
                    Some(selections.as_slice())
                }
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn having(&self) -> Option<&Expression> {
        self.pipeline().into_iter().find_map(|node| match node {
            LogicalPlan::Having { condition, .. } => Some(condition),
            _ => None,
        })
    }

    pub fn order_by(&self) -> &[SortKey] {
        self.pipeline()
            .into_iter()
            .find_map(|node| match node {
                LogicalPlan::OrderBy { keys, .. } => Some(keys.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn is_aggregate(&self) -> bool {
        self.groupings().is_some()
    }

    /// Every expression of the plan tagged with its clause, in pipeline order.
    pub fn clause_expressions(&self) -> Vec<(Clause, &Expression)> {
        let mut out = Vec::new();
        for node in self.pipeline() {
            match node {
                LogicalPlan::Empty | LogicalPlan::Relation(_) => {}
                LogicalPlan::Filter { condition, .. } => out.push((Clause::Where, condition)),
                LogicalPlan::Project { selections, .. } => {
                    out.extend(selections.iter().map(|e| (Clause::Select, e)));
                }
                LogicalPlan::Aggregate { groupings, selections, .. } => {
                    out.extend(groupings.iter().map(|e| (Clause::GroupBy, e)));
                    out.extend(selections.iter().map(|e| (Clause::Select, e)));
                }
                LogicalPlan::Having { condition, .. } => out.push((Clause::Having, condition)),
                LogicalPlan::OrderBy { keys, .. } => out.extend(keys.iter().map(|k| (Clause::OrderBy, &k.expr))),
            }
        }
        out
    }

    /// Nodes left unbound after analysis, in pipeline order then pre-order.
    /// An unknown relation hides everything else, as nothing could be bound against it.
    pub fn failures(&self) -> Vec<(Clause, Failure)> {
        if let Some(relation) = self.relation() {
            if relation.status == RelationStatus::Unknown {
                let failure = Failure::new(format!("Unknown index [{}]", relation.name), relation.location);
                return vec![(Clause::Relation, failure)];
            }
        }

        let mut failures = Vec::new();
        for (clause, expr) in self.clause_expressions() {
            collect_failures(expr, clause, &mut failures);
        }
        failures
    }

    pub fn is_resolved(&self) -> bool {
        self.failures().is_empty()
    }
}

fn collect_failures(expr: &Expression, clause: Clause, out: &mut Vec<(Clause, Failure)>) {
    match expr {
        Expression::Unresolved { message, location, .. } => {
            out.push((clause, Failure::new(message.clone(), *location)));
        }
        Expression::ColumnRef { name, location } => {
            out.push((clause, Failure::new(format!("Unknown column [{}]", name), *location)));
        }
        // alias targets live in SELECT and are reported there
        Expression::Alias { .. } if clause != Clause::Select => {}
        Expression::FunctionCall(call) => {
            match &call.resolution {
                Resolution::Failed { failure, .. } => out.push((clause, failure.clone())),
                Resolution::Pending => out.push((
                    clause,
                    Failure::new(format!("Unknown function [{}]", call.name), call.location),
                )),
                Resolution::Bound(_) => {}
            }
            for arg in &call.args {
                collect_failures(arg, clause, out);
            }
        }
        other => {
            for child in other.children() {
                collect_failures(child, clause, out);
            }
        }
    }
}
