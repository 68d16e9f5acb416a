use std::{
    fmt::{self, Display},
    sync::Arc,
};

use crate::{
    ast::{Literal, Location},
    catalog::{DataType, FieldDescriptor},
    functions::{FunctionDef, FunctionKind},
};

/// A problem found while binding a node. Rendered as one diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub message: String,
    pub location: Location,
}

impl Failure {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self { message: message.into(), location }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Pending,
    Bound(Arc<FunctionDef>),
    /// `def` is kept when the name resolved but the arguments did not fit.
    Failed { def: Option<Arc<FunctionDef>>, failure: Failure },
}

/// How a call was written, used to render it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallSyntax {
    Call,
    /// `EXTRACT(<name> FROM <arg>)`
    Extract,
    Infix,
    Prefix,
    In { negated: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// Name as written in the query
    pub name: String,
    pub args: Vec<Expression>,
    pub distinct: bool,
    pub syntax: CallSyntax,
    pub resolution: Resolution,
    pub location: Location,
}

impl FunctionCall {
    pub fn def(&self) -> Option<&Arc<FunctionDef>> {
        match &self.resolution {
            Resolution::Bound(def) => Some(def),
            Resolution::Failed { def, .. } => def.as_ref(),
            Resolution::Pending => None,
        }
    }

    pub fn kind(&self) -> Option<FunctionKind> {
        self.def().map(|def| def.kind)
    }

    /// Canonical (registry) name, or the written one when unbound.
    pub fn canonical_name(&self) -> String {
        match self.def() {
            Some(def) => def.name.clone(),
            None => self.name.to_ascii_uppercase(),
        }
    }
}

/// Bound expression tree. Every node carries the location of its source text.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Column reference not yet looked up in the catalog
    ColumnRef { name: String, location: Location },
    FieldRef { field: FieldDescriptor, location: Location },
    Literal { value: Literal, data_type: DataType, location: Location },
    FunctionCall(FunctionCall),
    Alias { name: String, inner: Box<Expression>, location: Location },
    Cast { inner: Box<Expression>, data_type: DataType, location: Location },
    /// `*` / `q.*`; survives binding only as the argument of `COUNT(*)`
    Wildcard { qualifier: Option<String>, location: Location },
    Unresolved { name: String, message: String, location: Location },
}

impl Expression {
    pub fn literal(value: Literal, location: Location) -> Self {
        let data_type = value.data_type();
        Expression::Literal { value, data_type, location }
    }

    pub fn unresolved(name: impl Into<String>, message: impl Into<String>, location: Location) -> Self {
        Expression::Unresolved { name: name.into(), message: message.into(), location }
    }

    pub fn location(&self) -> Location {
        match self {
            Expression::ColumnRef { location, .. }
            | Expression::FieldRef { location, .. }
            | Expression::Literal { location, .. }
            | Expression::Alias { location, .. }
            | Expression::Cast { location, .. }
            | Expression::Wildcard { location, .. }
            | Expression::Unresolved { location, .. } => *location,
            Expression::FunctionCall(call) => call.location,
        }
    }

    /// Result type, `None` while the node (or something it depends on) is unresolved.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Expression::FieldRef { field, .. } => Some(field.data_type.clone()),
            Expression::Literal { data_type, .. } | Expression::Cast { data_type, .. } => Some(data_type.clone()),
            Expression::Alias { inner, .. } => inner.data_type(),
            Expression::FunctionCall(call) => {
                let def = call.def()?;
                let args: Vec<Option<DataType>> = call.args.iter().map(Expression::data_type).collect();
                Some(def.return_type(&args))
            }
            Expression::ColumnRef { .. } | Expression::Wildcard { .. } | Expression::Unresolved { .. } => None,
        }
    }

    pub fn strip_alias(&self) -> &Expression {
        match self {
            Expression::Alias { inner, .. } => inner.strip_alias(),
            other => other,
        }
    }

    pub fn as_call(&self) -> Option<&FunctionCall> {
        match self {
            Expression::FunctionCall(call) => Some(call),
            _ => None,
        }
    }

    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::FunctionCall(call) => call.args.iter().collect(),
            Expression::Alias { inner, .. } | Expression::Cast { inner, .. } => vec![inner.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Pre-order walk.
    pub fn for_each_down<'a>(&'a self, f: &mut impl FnMut(&'a Expression)) {
        f(self);
        for child in self.children() {
            child.for_each_down(f);
        }
    }

    /// Pre-order walk where `f` decides whether to descend into the node's children.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Expression) -> bool) {
        if f(self) {
            for child in self.children() {
                child.visit(f);
            }
        }
    }

    pub fn exists(&self, pred: &impl Fn(&Expression) -> bool) -> bool {
        pred(self) || self.children().into_iter().any(|child| child.exists(pred))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.strip_alias(), Expression::FunctionCall(call) if call.kind() == Some(FunctionKind::Aggregate))
    }

    pub fn is_grouping_function(&self) -> bool {
        matches!(self.strip_alias(), Expression::FunctionCall(call) if call.kind() == Some(FunctionKind::Grouping))
    }

    /// Evaluates to a constant without reading any field.
    pub fn is_foldable(&self) -> bool {
        match self {
            Expression::Literal { .. } => true,
            Expression::Alias { inner, .. } | Expression::Cast { inner, .. } => inner.is_foldable(),
            Expression::FunctionCall(call) => match call.def() {
                Some(def) => {
                    def.kind == FunctionKind::Scalar
                        && def.deterministic
                        && call.args.iter().all(Expression::is_foldable)
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Structural equality ignoring locations, aliases and the case of function names.
    pub fn semantic_eq(&self, other: &Expression) -> bool {
        match (self.strip_alias(), other.strip_alias()) {
            (Expression::FieldRef { field: a, .. }, Expression::FieldRef { field: b, .. }) => a.path == b.path,
            (Expression::ColumnRef { name: a, .. }, Expression::ColumnRef { name: b, .. }) => a == b,
            (Expression::Literal { value: a, .. }, Expression::Literal { value: b, .. }) => a == b,
            (
                Expression::Cast { inner: a, data_type: ta, .. },
                Expression::Cast { inner: b, data_type: tb, .. },
            ) => ta == tb && a.semantic_eq(b),
            (Expression::Wildcard { qualifier: a, .. }, Expression::Wildcard { qualifier: b, .. }) => a == b,
            (Expression::Unresolved { name: a, .. }, Expression::Unresolved { name: b, .. }) => a == b,
            (Expression::FunctionCall(a), Expression::FunctionCall(b)) => {
                a.name.eq_ignore_ascii_case(&b.name)
                    && a.distinct == b.distinct
                    && a.syntax == b.syntax
                    && a.args.len() == b.args.len()
                    && a.args.iter().zip(&b.args).all(|(x, y)| x.semantic_eq(y))
            }
            _ => false,
        }
    }
}

fn join(args: &[Expression]) -> String {
    args.iter().map(|a| a.to_string()).collect::<Vec<_>>().join(", ")
}

impl Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.syntax, self.args.as_slice()) {
            (CallSyntax::Extract, [source]) => write!(f, "EXTRACT({} FROM {})", self.name, source),
            (CallSyntax::Infix, [left, right]) => write!(f, "{} {} {}", left, self.name, right),
            (CallSyntax::Prefix, [operand]) if self.name.eq_ignore_ascii_case("NEG") => write!(f, "-{}", operand),
            (CallSyntax::Prefix, [operand]) => write!(f, "{} {}", self.name, operand),
            (CallSyntax::In { negated }, [value, list @ ..]) => {
                let not = if negated { "NOT " } else { "" };
                write!(f, "{} {}IN ({})", value, not, join(list))
            }
            _ if self.distinct => write!(f, "{}(DISTINCT {})", self.name, join(&self.args)),
            _ => write!(f, "{}({})", self.name, join(&self.args)),
        }
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::ColumnRef { name, .. } | Expression::Unresolved { name, .. } => write!(f, "{}", name),
            Expression::FieldRef { field, .. } => write!(f, "{}", field.path),
            Expression::Literal { value, .. } => write!(f, "{}", value),
            Expression::FunctionCall(call) => write!(f, "{}", call),
            Expression::Alias { inner, .. } => write!(f, "{}", inner),
            Expression::Cast { inner, data_type, .. } => {
                write!(f, "CAST({} AS {})", inner, data_type.name().to_ascii_uppercase())
            }
            Expression::Wildcard { qualifier: Some(q), .. } => write!(f, "{}.*", q),
            Expression::Wildcard { qualifier: None, .. } => write!(f, "*"),
        }
    }
}
