use crate::ast::{Expr, Location};

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self { expr, alias: Some(alias.into()) }
    }
}

/// `FROM` target: an index name or pattern (`emp*`, `"*"`, `a,b`).
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub expr: Expr,
    pub ascending: bool,
}

impl OrderItem {
    pub fn asc(expr: Expr) -> Self {
        Self { expr, ascending: true }
    }

    pub fn desc(expr: Expr) -> Self {
        Self { expr, ascending: false }
    }
}

/// Raw abstract syntax tree of a single `SELECT` statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub projection: Vec<SelectItem>,
    pub from: Option<TableRef>,
    pub criteria: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderItem>,
}

impl Query {
    pub fn select(projection: Vec<SelectItem>) -> Self {
        Self { projection, ..Default::default() }
    }

    pub fn from(mut self, name: impl Into<String>, location: Location) -> Self {
        self.from = Some(TableRef { name: name.into(), location });
        self
    }

    pub fn filter(mut self, criteria: Expr) -> Self {
        self.criteria = Some(criteria);
        self
    }

    pub fn group_by(mut self, keys: Vec<Expr>) -> Self {
        self.group_by = keys;
        self
    }

    pub fn having(mut self, having: Expr) -> Self {
        self.having = Some(having);
        self
    }

    pub fn order_by(mut self, keys: Vec<OrderItem>) -> Self {
        self.order_by = keys;
        self
    }
}
