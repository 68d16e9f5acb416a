use std::fmt;

use serde::{Deserialize, Serialize};

/// Field and expression types known to the analyzer.
///
/// Mapping types the analyzer cannot work with are preserved as
/// `Unsupported(<mapping type>)` so error messages can name them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Null,
    Boolean,
    Byte,
    Short,
    Integer,
    Long,
    Double,
    Float,
    HalfFloat,
    ScaledFloat,
    Keyword,
    Text,
    Datetime,
    Ip,
    Binary,
    Object,
    Nested,
    IntervalYearToMonth,
    IntervalDayToSecond,
    Unsupported(String),
}

impl DataType {
    /// Map an index-mapping type name onto a `DataType`.
    pub fn from_mapping(type_name: &str) -> DataType {
        match type_name {
            "null" => DataType::Null,
            "boolean" => DataType::Boolean,
            "byte" => DataType::Byte,
            "short" => DataType::Short,
            "integer" => DataType::Integer,
            "long" => DataType::Long,
            "double" => DataType::Double,
            "float" => DataType::Float,
            "half_float" => DataType::HalfFloat,
            "scaled_float" => DataType::ScaledFloat,
            "keyword" => DataType::Keyword,
            "text" => DataType::Text,
            "date" | "datetime" => DataType::Datetime,
            "ip" => DataType::Ip,
            "binary" => DataType::Binary,
            "object" => DataType::Object,
            "nested" => DataType::Nested,
            other => DataType::Unsupported(other.to_string()),
        }
    }

    /// Map a SQL type name (as used in `CAST(x AS <type>)`) onto a `DataType`.
    pub fn from_sql_name(type_name: &str) -> Option<DataType> {
        let ty = match type_name.to_ascii_uppercase().as_str() {
            "BOOLEAN" | "BOOL" => DataType::Boolean,
            "BYTE" | "TINYINT" => DataType::Byte,
            "SHORT" | "SMALLINT" => DataType::Short,
            "INTEGER" | "INT" => DataType::Integer,
            "LONG" | "BIGINT" => DataType::Long,
            "DOUBLE" => DataType::Double,
            "FLOAT" | "REAL" => DataType::Float,
            "KEYWORD" | "VARCHAR" | "STRING" => DataType::Keyword,
            "TEXT" => DataType::Text,
            "DATETIME" | "TIMESTAMP" | "DATE" => DataType::Datetime,
            "IP" => DataType::Ip,
            _ => return None,
        };
        Some(ty)
    }

    pub fn name(&self) -> &str {
        match self {
            DataType::Null => "null",
            DataType::Boolean => "boolean",
            DataType::Byte => "byte",
            DataType::Short => "short",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::Float => "float",
            DataType::HalfFloat => "half_float",
            DataType::ScaledFloat => "scaled_float",
            DataType::Keyword => "keyword",
            DataType::Text => "text",
            DataType::Datetime => "datetime",
            DataType::Ip => "ip",
            DataType::Binary => "binary",
            DataType::Object => "object",
            DataType::Nested => "nested",
            DataType::IntervalYearToMonth => "interval_year_to_month",
            DataType::IntervalDayToSecond => "interval_day_to_second",
            DataType::Unsupported(original) => original,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            DataType::Byte
                | DataType::Short
                | DataType::Integer
                | DataType::Long
                | DataType::Double
                | DataType::Float
                | DataType::HalfFloat
                | DataType::ScaledFloat
        )
    }

    pub fn is_string(&self) -> bool {
        matches!(self, DataType::Keyword | DataType::Text)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, DataType::Object | DataType::Nested)
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, DataType::Unsupported(_))
    }

    /// Whether values of both types can be compared with each other.
    pub fn compatible(a: &DataType, b: &DataType) -> bool {
        a == b
            || *a == DataType::Null
            || *b == DataType::Null
            || (a.is_numeric() && b.is_numeric())
            || (a.is_string() && b.is_string())
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse type family a function parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    Numeric,
    String,
    Boolean,
    Datetime,
    Any,
}

impl TypeCategory {
    pub fn accepts(&self, ty: &DataType) -> bool {
        if *ty == DataType::Null {
            return true;
        }
        match self {
            TypeCategory::Numeric => ty.is_numeric(),
            TypeCategory::String => ty.is_string(),
            TypeCategory::Boolean => *ty == DataType::Boolean,
            TypeCategory::Datetime => *ty == DataType::Datetime,
            TypeCategory::Any => true,
        }
    }
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeCategory::Numeric => "numeric",
            TypeCategory::String => "string",
            TypeCategory::Boolean => "boolean",
            TypeCategory::Datetime => "datetime",
            TypeCategory::Any => "any",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_mapping_types_keep_their_name() {
        let ty = DataType::from_mapping("ip_range");
        assert!(ty.is_unsupported());
        assert_eq!(ty.to_string(), "ip_range");
        assert_eq!(DataType::from_mapping("date"), DataType::Datetime);
    }

    #[test]
    fn compatibility_groups_numbers_and_strings() {
        assert!(DataType::compatible(&DataType::Integer, &DataType::Double));
        assert!(DataType::compatible(&DataType::Keyword, &DataType::Text));
        assert!(DataType::compatible(&DataType::Null, &DataType::Boolean));
        assert!(!DataType::compatible(&DataType::Integer, &DataType::Keyword));
    }

    #[test]
    fn null_satisfies_every_category() {
        assert!(TypeCategory::Numeric.accepts(&DataType::Null));
        assert!(TypeCategory::String.accepts(&DataType::Text));
        assert!(!TypeCategory::Boolean.accepts(&DataType::Integer));
        assert!(!TypeCategory::Datetime.accepts(&DataType::Keyword));
    }
}
