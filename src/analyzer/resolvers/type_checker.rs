use crate::{
    analyzer::{Expression, Failure, FunctionCall},
    catalog::DataType,
    functions::{FunctionDef, FunctionKind, Notation},
};

/// Validates argument types of a call whose name and arity already matched.
pub struct TypeChecker;

impl TypeChecker {
    pub fn check(call: &FunctionCall, def: &FunctionDef) -> Option<Failure> {
        Self::check_categories(call, def)
            .or_else(|| Self::check_homogeneous(call, def))
            .or_else(|| Self::check_interval_subtraction(call, def))
    }

    fn check_categories(call: &FunctionCall, def: &FunctionDef) -> Option<Failure> {
        let single = def.arity.max() == Some(1);
        for (position, arg) in call.args.iter().enumerate() {
            let Some(actual) = arg.data_type() else { continue };
            let expected = def.param(position);
            if expected.accepts(&actual) {
                continue;
            }
            let ordinal = if single { String::new() } else { format!("{} ", ordinal(position)) };
            return Some(Failure::new(
                format!(
                    "[{}] {}argument must be [{}], found value [{}] type [{}]",
                    Self::render(call, def),
                    ordinal,
                    expected,
                    arg,
                    actual
                ),
                call.location,
            ));
        }
        None
    }

    fn check_homogeneous(call: &FunctionCall, def: &FunctionDef) -> Option<Failure> {
        if !def.homogeneous {
            return None;
        }
        let typed: Vec<(&Expression, DataType)> = call
            .args
            .iter()
            .filter_map(|arg| arg.data_type().map(|ty| (arg, ty)))
            .collect();
        let seed = typed.iter().map(|(_, ty)| ty).find(|ty| **ty != DataType::Null)?;

        typed.iter().find(|(_, ty)| !DataType::compatible(seed, ty)).map(|(arg, ty)| {
            Failure::new(
                format!("expected data type [{}], value provided is of type [{}]", seed, ty),
                arg.location(),
            )
        })
    }

    fn check_interval_subtraction(call: &FunctionCall, def: &FunctionDef) -> Option<Failure> {
        if def.name != "-" {
            return None;
        }
        let [left, right] = call.args.as_slice() else { return None };
        let is_interval = matches!(
            left.data_type(),
            Some(DataType::IntervalYearToMonth | DataType::IntervalDayToSecond)
        );
        if is_interval && right.data_type() == Some(DataType::Datetime) {
            return Some(Failure::new(
                format!(
                    "Cannot subtract a datetime[{}] from an interval[{}]; do you mean the reverse?",
                    right, left
                ),
                call.location,
            ));
        }
        None
    }

    /// Single-argument scalar functions are named bare; everything else renders the whole call.
    fn render(call: &FunctionCall, def: &FunctionDef) -> String {
        if def.kind == FunctionKind::Scalar && def.notation == Notation::Call && def.arity.max() == Some(1) {
            def.name.clone()
        } else {
            call.to_string()
        }
    }
}

/// `first`, `second`, ... for a zero-based position.
pub fn ordinal(position: usize) -> String {
    const WORDS: [&str; 10] = [
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
    ];
    if let Some(word) = WORDS.get(position) {
        return word.to_string();
    }
    let n = position + 1;
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
