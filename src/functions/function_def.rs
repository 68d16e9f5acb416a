use crate::catalog::{DataType, TypeCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Scalar,
    Aggregate,
    /// Defines aggregation buckets (HISTOGRAM)
    Grouping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Fixed(usize),
    Range(usize, usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Fixed(n) => count == n,
            Arity::Range(min, max) => (min..=max).contains(&count),
            Arity::AtLeast(min) => count >= min,
        }
    }

    pub fn max(&self) -> Option<usize> {
        match *self {
            Arity::Fixed(n) | Arity::Range(_, n) => Some(n),
            Arity::AtLeast(_) => None,
        }
    }

    /// Human wording used in arity errors: `1`, `1 to 2`, `at least 2`.
    pub fn describe(&self) -> String {
        match *self {
            Arity::Fixed(n) => n.to_string(),
            Arity::Range(min, max) => format!("{} to {}", min, max),
            Arity::AtLeast(min) => format!("at least {}", min),
        }
    }
}

/// How a call is written in SQL, used to render it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notation {
    Call,
    Infix,
    Prefix,
    In,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReturnType {
    Fixed(DataType),
    /// Type of the argument at the given position
    SameAs(usize),
    /// First concretely typed argument (homogeneous functions)
    Common,
}

/// One row of the signature table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    pub name: String,
    pub kind: FunctionKind,
    pub arity: Arity,
    /// Expected category per position; the last entry repeats for variadic tails.
    pub params: Vec<TypeCategory>,
    pub returns: ReturnType,
    pub notation: Notation,
    pub deterministic: bool,
    /// All operands must share one type, seeded left to right
    pub homogeneous: bool,
    /// Usable as an `EXTRACT(<field> FROM ..)` field
    pub datetime_extract: bool,
    /// Positions that must be table columns (FIRST/LAST)
    pub column_args: Vec<usize>,
    /// Positions that must be constants (PERCENTILE)
    pub constant_args: Vec<usize>,
    /// Backed by top hits on string fields, which HAVING cannot filter on
    pub string_top_hits: bool,
}

impl FunctionDef {
    pub fn new(name: &str, kind: FunctionKind, arity: Arity) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            kind,
            arity,
            params: Vec::new(),
            returns: ReturnType::Common,
            notation: Notation::Call,
            deterministic: true,
            homogeneous: false,
            datetime_extract: false,
            column_args: Vec::new(),
            constant_args: Vec::new(),
            string_top_hits: false,
        }
    }

    pub fn scalar(name: &str, params: &[TypeCategory], returns: ReturnType) -> Self {
        Self::new(name, FunctionKind::Scalar, Arity::Fixed(params.len()))
            .params(params)
            .returns(returns)
    }

    pub fn aggregate(name: &str, params: &[TypeCategory], returns: ReturnType) -> Self {
        Self::new(name, FunctionKind::Aggregate, Arity::Fixed(params.len()))
            .params(params)
            .returns(returns)
    }

    pub fn params(mut self, params: &[TypeCategory]) -> Self {
        self.params = params.to_vec();
        self
    }

    pub fn returns(mut self, returns: ReturnType) -> Self {
        self.returns = returns;
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn notation(mut self, notation: Notation) -> Self {
        self.notation = notation;
        self
    }

    pub fn non_deterministic(mut self) -> Self {
        self.deterministic = false;
        self
    }

    pub fn homogeneous(mut self) -> Self {
        self.homogeneous = true;
        self
    }

    pub fn datetime_extract(mut self) -> Self {
        self.datetime_extract = true;
        self
    }

    pub fn column_args(mut self, positions: &[usize]) -> Self {
        self.column_args = positions.to_vec();
        self
    }

    pub fn constant_args(mut self, positions: &[usize]) -> Self {
        self.constant_args = positions.to_vec();
        self
    }

    pub fn string_top_hits(mut self) -> Self {
        self.string_top_hits = true;
        self
    }

    pub fn is_aggregate(&self) -> bool {
        self.kind == FunctionKind::Aggregate
    }

    pub fn is_grouping(&self) -> bool {
        self.kind == FunctionKind::Grouping
    }

    /// Expected category of the argument at `position`.
    pub fn param(&self, position: usize) -> TypeCategory {
        self.params
            .get(position)
            .or_else(|| self.params.last())
            .copied()
            .unwrap_or(TypeCategory::Any)
    }

    /// Type produced for the given argument types (`None` for unresolved arguments).
    pub fn return_type(&self, args: &[Option<DataType>]) -> DataType {
        match &self.returns {
            ReturnType::Fixed(ty) => ty.clone(),
            ReturnType::SameAs(i) => args.get(*i).cloned().flatten().unwrap_or(DataType::Null),
            ReturnType::Common => args
                .iter()
                .flatten()
                .find(|ty| **ty != DataType::Null)
                .cloned()
                .unwrap_or(DataType::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_shapes() {
        assert!(Arity::Fixed(2).accepts(2));
        assert!(!Arity::Fixed(2).accepts(1));
        assert!(Arity::Range(1, 2).accepts(1) && Arity::Range(1, 2).accepts(2));
        assert!(!Arity::Range(1, 2).accepts(3));
        assert!(Arity::AtLeast(2).accepts(7));
        assert_eq!(Arity::AtLeast(2).max(), None);
        assert_eq!(Arity::Range(1, 2).describe(), "1 to 2");
    }

    #[test]
    fn variadic_tail_repeats_last_param() {
        let concat = FunctionDef::scalar("concat", &[TypeCategory::String], ReturnType::Fixed(DataType::Keyword))
            .arity(Arity::AtLeast(1));
        assert_eq!(concat.name, "CONCAT");
        assert_eq!(concat.param(5), TypeCategory::String);
    }

    #[test]
    fn common_return_type_skips_nulls() {
        let coalesce = FunctionDef::scalar("COALESCE", &[TypeCategory::Any], ReturnType::Common)
            .arity(Arity::AtLeast(1))
            .homogeneous();
        let ty = coalesce.return_type(&[Some(DataType::Null), None, Some(DataType::Long)]);
        assert_eq!(ty, DataType::Long);
    }
}
