use ordered_float::NotNan;
use std::fmt::{self, Display};

use crate::catalog::DataType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl IntervalUnit {
    pub fn keyword(&self) -> &'static str {
        match self {
            IntervalUnit::Year => "YEAR",
            IntervalUnit::Month => "MONTH",
            IntervalUnit::Day => "DAY",
            IntervalUnit::Hour => "HOUR",
            IntervalUnit::Minute => "MINUTE",
            IntervalUnit::Second => "SECOND",
        }
    }
}

/// Constant values as they appear in the query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(NotNan<f64>),
    String(String),
    Interval { value: i64, unit: IntervalUnit },
}

impl Literal {
    /// Type a literal the way the backend would type it when sent as a parameter.
    pub fn data_type(&self) -> DataType {
        match self {
            Literal::Null => DataType::Null,
            Literal::Bool(_) => DataType::Boolean,
            Literal::Integer(value) => {
                if i32::try_from(*value).is_ok() { DataType::Integer } else { DataType::Long }
            }
            Literal::Decimal(_) => DataType::Double,
            Literal::String(_) => DataType::Keyword,
            Literal::Interval { unit, .. } => match unit {
                IntervalUnit::Year | IntervalUnit::Month => DataType::IntervalYearToMonth,
                _ => DataType::IntervalDayToSecond,
            },
        }
    }

    pub fn decimal(value: f64) -> Option<Literal> {
        NotNan::new(value).ok().map(Literal::Decimal)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Decimal(n) => write!(f, "{}", n.into_inner()),
            Literal::String(s) => write!(f, "'{}'", s),
            Literal::Interval { value, unit } => write!(f, "INTERVAL {} {}", value, unit.keyword()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_render_like_source_text() {
        assert_eq!(Literal::String("foo".into()).to_string(), "'foo'");
        assert_eq!(Literal::Bool(true).to_string(), "true");
        assert_eq!(Literal::decimal(1.2).unwrap().to_string(), "1.2");
        assert_eq!(
            Literal::Interval { value: 1, unit: IntervalUnit::Month }.to_string(),
            "INTERVAL 1 MONTH"
        );
    }

    #[test]
    fn integer_literals_widen_to_long() {
        assert_eq!(Literal::Integer(10).data_type(), DataType::Integer);
        assert_eq!(Literal::Integer(i64::from(i32::MAX) + 1).data_type(), DataType::Long);
        assert_eq!(Literal::String("x".into()).data_type(), DataType::Keyword);
    }
}
