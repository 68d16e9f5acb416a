use crate::catalog::{DataType, TypeCategory};
use crate::functions::{Arity, FunctionDef, FunctionKind, Notation, ReturnType};

use crate::catalog::TypeCategory::{Any, Boolean, Datetime, Numeric, String as Str};

/// The built-in signature table: aggregates, grouping functions, scalars and operators.
pub fn builtin_functions() -> Vec<FunctionDef> {
    let mut defs = Vec::new();
    aggregates(&mut defs);
    grouping(&mut defs);
    numeric(&mut defs);
    strings(&mut defs);
    datetime(&mut defs);
    conditionals(&mut defs);
    operators(&mut defs);
    defs
}

fn aggregates(defs: &mut Vec<FunctionDef>) {
    let double = || ReturnType::Fixed(DataType::Double);

    defs.push(FunctionDef::aggregate("AVG", &[Numeric], double()));
    defs.push(FunctionDef::aggregate("SUM", &[Numeric], ReturnType::SameAs(0)));
    defs.push(FunctionDef::aggregate("COUNT", &[Any], ReturnType::Fixed(DataType::Long)));
    for name in ["MIN", "MAX"] {
        defs.push(FunctionDef::aggregate(name, &[Any], ReturnType::SameAs(0)).string_top_hits());
    }
    for name in ["FIRST", "LAST"] {
        defs.push(
            FunctionDef::aggregate(name, &[Any, Any], ReturnType::SameAs(0))
                .arity(Arity::Range(1, 2))
                .column_args(&[0, 1]),
        );
    }
    for name in ["PERCENTILE", "PERCENTILE_RANK"] {
        defs.push(FunctionDef::aggregate(name, &[Numeric, Numeric], double()).constant_args(&[1]));
    }
    for name in ["KURTOSIS", "SKEWNESS", "STDDEV_POP", "SUM_OF_SQUARES", "VAR_POP"] {
        defs.push(FunctionDef::aggregate(name, &[Numeric], double()));
    }
}

fn grouping(defs: &mut Vec<FunctionDef>) {
    defs.push(
        FunctionDef::new("HISTOGRAM", FunctionKind::Grouping, Arity::Fixed(2))
            .params(&[Any, Any])
            .returns(ReturnType::SameAs(0)),
    );
}

fn numeric(defs: &mut Vec<FunctionDef>) {
    for name in ["ABS", "SIGN", "CEIL", "FLOOR"] {
        defs.push(FunctionDef::scalar(name, &[Numeric], ReturnType::SameAs(0)));
    }
    for name in ["COS", "SIN", "TAN", "COT", "SQRT", "CBRT", "EXP", "LOG", "LOG10"] {
        defs.push(FunctionDef::scalar(name, &[Numeric], ReturnType::Fixed(DataType::Double)));
    }
    for name in ["ROUND", "TRUNCATE"] {
        defs.push(
            FunctionDef::scalar(name, &[Numeric, Numeric], ReturnType::SameAs(0)).arity(Arity::Range(1, 2)),
        );
    }
    defs.push(FunctionDef::scalar("POWER", &[Numeric, Numeric], ReturnType::Fixed(DataType::Double)));
    defs.push(FunctionDef::scalar("PI", &[], ReturnType::Fixed(DataType::Double)));
    defs.push(FunctionDef::scalar("SCORE", &[], ReturnType::Fixed(DataType::Float)).non_deterministic());
}

fn strings(defs: &mut Vec<FunctionDef>) {
    let keyword = || ReturnType::Fixed(DataType::Keyword);
    let integer = || ReturnType::Fixed(DataType::Integer);

    for name in ["LCASE", "UCASE", "LTRIM", "RTRIM"] {
        defs.push(FunctionDef::scalar(name, &[Str], keyword()));
    }
    defs.push(FunctionDef::scalar("LENGTH", &[Str], integer()));
    defs.push(FunctionDef::scalar("ASCII", &[Str], integer()));
    defs.push(FunctionDef::scalar("CHAR", &[Numeric], keyword()));
    defs.push(FunctionDef::scalar("SPACE", &[Numeric], keyword()));
    defs.push(FunctionDef::scalar("CONCAT", &[Str, Str], keyword()));
    defs.push(FunctionDef::scalar("REPLACE", &[Str, Str, Str], keyword()));
    defs.push(FunctionDef::scalar("INSERT", &[Str, Numeric, Numeric, Str], keyword()));
    defs.push(FunctionDef::scalar("LEFT", &[Str, Numeric], keyword()));
    defs.push(FunctionDef::scalar("RIGHT", &[Str, Numeric], keyword()));
    defs.push(FunctionDef::scalar("REPEAT", &[Str, Numeric], keyword()));
    defs.push(FunctionDef::scalar("SUBSTRING", &[Str, Numeric, Numeric], keyword()));
    defs.push(FunctionDef::scalar("POSITION", &[Str, Str], integer()));
    defs.push(FunctionDef::scalar("LOCATE", &[Str, Str, Numeric], integer()).arity(Arity::Range(2, 3)));
}

fn datetime(defs: &mut Vec<FunctionDef>) {
    const PARTS: &[&[&str]] = &[
        &["YEAR"],
        &["QUARTER"],
        &["MONTH", "MONTH_OF_YEAR"],
        &["WEEK_OF_YEAR", "WEEK"],
        &["ISO_WEEK_OF_YEAR", "IWOY"],
        &["DAY", "DAY_OF_MONTH", "DOM"],
        &["DAY_OF_WEEK", "DOW"],
        &["ISO_DAY_OF_WEEK", "IDOW"],
        &["DAY_OF_YEAR", "DOY"],
        &["HOUR", "HOUR_OF_DAY"],
        &["MINUTE", "MINUTE_OF_HOUR"],
        &["MINUTE_OF_DAY"],
        &["SECOND", "SECOND_OF_MINUTE"],
    ];
    for names in PARTS {
        for name in *names {
            defs.push(
                FunctionDef::scalar(name, &[Datetime], ReturnType::Fixed(DataType::Integer)).datetime_extract(),
            );
        }
    }
    for name in ["DAY_NAME", "DAYNAME", "MONTH_NAME", "MONTHNAME"] {
        defs.push(FunctionDef::scalar(name, &[Datetime], ReturnType::Fixed(DataType::Keyword)).datetime_extract());
    }
}

fn conditionals(defs: &mut Vec<FunctionDef>) {
    for name in ["COALESCE", "GREATEST", "LEAST"] {
        defs.push(
            FunctionDef::scalar(name, &[Any], ReturnType::Common)
                .arity(Arity::AtLeast(1))
                .homogeneous(),
        );
    }
    for name in ["IFNULL", "NULLIF"] {
        defs.push(FunctionDef::scalar(name, &[Any, Any], ReturnType::Common).homogeneous());
    }
}

fn operators(defs: &mut Vec<FunctionDef>) {
    let infix = |name: &str, params: &[TypeCategory], returns: ReturnType| {
        FunctionDef::scalar(name, params, returns).notation(Notation::Infix)
    };

    // interval and datetime arithmetic share these, so operands are not restricted
    for name in ["+", "-", "*", "/", "%"] {
        defs.push(infix(name, &[Any, Any], ReturnType::Common));
    }
    for name in ["=", "!=", "<", "<=", ">", ">="] {
        defs.push(infix(name, &[Any, Any], ReturnType::Fixed(DataType::Boolean)));
    }
    for name in ["AND", "OR"] {
        defs.push(infix(name, &[Boolean, Boolean], ReturnType::Fixed(DataType::Boolean)));
    }
    defs.push(
        FunctionDef::scalar("NOT", &[Boolean], ReturnType::Fixed(DataType::Boolean)).notation(Notation::Prefix),
    );
    defs.push(FunctionDef::scalar("NEG", &[Numeric], ReturnType::SameAs(0)).notation(Notation::Prefix));
    defs.push(
        FunctionDef::scalar("IN", &[Any], ReturnType::Fixed(DataType::Boolean))
            .arity(Arity::AtLeast(2))
            .notation(Notation::In)
            .homogeneous(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let defs = builtin_functions();
        let names: HashSet<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names.len(), defs.len());
    }

    #[test]
    fn positional_constraints_are_declared() {
        let defs = builtin_functions();
        let find = |name: &str| defs.iter().find(|d| d.name == name).cloned();

        assert_eq!(find("FIRST").map(|d| d.column_args), Some(vec![0, 1]));
        assert_eq!(find("PERCENTILE_RANK").map(|d| d.constant_args), Some(vec![1]));
        assert_eq!(find("SCORE").map(|d| d.deterministic), Some(false));
        assert_eq!(find("IN").map(|d| d.homogeneous), Some(true));
    }
}
