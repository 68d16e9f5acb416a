use crate::ast::{Literal, Location};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    /// Key of the operator in the function registry.
    pub fn registry_name(&self) -> &'static str {
        match self {
            UnaryOp::Not => "NOT",
            UnaryOp::Neg => "NEG",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

/// Raw expression node handed over by the parser. Names are unresolved text.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Dotted column path, or a bare name that may turn out to be a SELECT alias.
    Column(String),
    /// `*` or `qualifier.*`
    Star(Option<String>),
    Literal(Literal),
    Function { name: String, args: Vec<Expr>, distinct: bool },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    In { value: Box<Expr>, list: Vec<Expr>, negated: bool },
    Cast { operand: Box<Expr>, data_type: String },
    /// `EXTRACT(<field> FROM <source>)`
    Extract { field: String, source: Box<Expr> },
}

impl Expr {
    pub fn new(kind: ExprKind, location: Location) -> Self {
        Self { kind, location }
    }

    pub fn column(name: impl Into<String>, location: Location) -> Self {
        Self::new(ExprKind::Column(name.into()), location)
    }

    pub fn star(location: Location) -> Self {
        Self::new(ExprKind::Star(None), location)
    }

    pub fn qualified_star(qualifier: impl Into<String>, location: Location) -> Self {
        Self::new(ExprKind::Star(Some(qualifier.into())), location)
    }

    pub fn literal(value: Literal, location: Location) -> Self {
        Self::new(ExprKind::Literal(value), location)
    }

    pub fn int(value: i64, location: Location) -> Self {
        Self::literal(Literal::Integer(value), location)
    }

    pub fn string(value: impl Into<String>, location: Location) -> Self {
        Self::literal(Literal::String(value.into()), location)
    }

    pub fn boolean(value: bool, location: Location) -> Self {
        Self::literal(Literal::Bool(value), location)
    }

    pub fn null(location: Location) -> Self {
        Self::literal(Literal::Null, location)
    }

    pub fn function(name: impl Into<String>, args: Vec<Expr>, location: Location) -> Self {
        Self::new(ExprKind::Function { name: name.into(), args, distinct: false }, location)
    }

    pub fn distinct_function(name: impl Into<String>, args: Vec<Expr>, location: Location) -> Self {
        Self::new(ExprKind::Function { name: name.into(), args, distinct: true }, location)
    }

    pub fn unary(op: UnaryOp, operand: Expr, location: Location) -> Self {
        Self::new(ExprKind::Unary { op, operand: Box::new(operand) }, location)
    }

    /// Binary expressions are located at their left operand, like the parser reports them.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let location = left.location;
        Self::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) }, location)
    }

    pub fn in_list(value: Expr, list: Vec<Expr>, negated: bool) -> Self {
        let location = value.location;
        Self::new(ExprKind::In { value: Box::new(value), list, negated }, location)
    }

    pub fn cast(operand: Expr, data_type: impl Into<String>, location: Location) -> Self {
        Self::new(ExprKind::Cast { operand: Box::new(operand), data_type: data_type.into() }, location)
    }

    pub fn extract(field: impl Into<String>, source: Expr, location: Location) -> Self {
        Self::new(ExprKind::Extract { field: field.into(), source: Box::new(source) }, location)
    }
}
