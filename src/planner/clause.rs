use std::fmt::{self, Display};

/// Query clause a plan node or diagnostic belongs to, in pipeline order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Clause {
    /// FROM
    Relation = 0,
    Where = 1,
    GroupBy = 2,
    #[default]
    Select = 3,
    Having = 4,
    OrderBy = 5,
}

impl Clause {
    /// Whether SELECT aliases are visible from this clause.
    pub fn sees_aliases(&self) -> bool {
        matches!(self, Clause::GroupBy | Clause::Having | Clause::OrderBy)
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Clause::Relation => "FROM",
            Clause::Where => "WHERE",
            Clause::GroupBy => "GROUP BY",
            Clause::Select => "SELECT",
            Clause::Having => "HAVING",
            Clause::OrderBy => "ORDER BY",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clauses_sort_in_pipeline_order() {
        let mut clauses = vec![Clause::OrderBy, Clause::Select, Clause::Where, Clause::Having, Clause::GroupBy];
        clauses.sort();
        assert_eq!(
            clauses,
            vec![Clause::Where, Clause::GroupBy, Clause::Select, Clause::Having, Clause::OrderBy]
        );
        assert!(!Clause::Where.sees_aliases());
        assert!(Clause::OrderBy.sees_aliases());
    }
}
