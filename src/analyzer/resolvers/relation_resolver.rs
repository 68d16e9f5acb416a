use std::borrow::Cow;

use tracing::debug;

use crate::{
    catalog::SchemaCatalog,
    planner::{RelationRef, RelationStatus},
};

pub struct RelationResolver;

impl RelationResolver {
    /// Fields visible to a query reading from `relation`: the catalog narrowed to the
    /// sources its index pattern names.
    pub fn scope<'c>(relation: &RelationRef, catalog: &'c SchemaCatalog) -> Option<Cow<'c, SchemaCatalog>> {
        let scope = catalog.scope(&relation.name);
        match &scope {
            Some(scope) => {
                debug!(index = %relation.name, sources = ?scope.sources().collect::<Vec<_>>(), "scoped relation")
            }
            None => debug!(index = %relation.name, "no source matches index"),
        }
        scope
    }

    pub fn resolve(relation: RelationRef, scope: Option<&SchemaCatalog>) -> RelationRef {
        let status = if scope.is_some() { RelationStatus::Resolved } else { RelationStatus::Unknown };
        RelationRef { status, ..relation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Location;
    use crate::catalog::{Lookup, SourceSchema};
    use serde_json::json;

    fn relation(name: &str) -> RelationRef {
        RelationRef { name: name.into(), location: Location::new(1, 17), status: RelationStatus::Pending }
    }

    #[test]
    fn marks_unknown_patterns() {
        let source = SourceSchema::from_json("test", &json!({ "properties": { "int": { "type": "integer" } } })).unwrap();
        let catalog = SchemaCatalog::single(source);

        for (name, status) in [
            ("test", RelationStatus::Resolved),
            ("te*", RelationStatus::Resolved),
            ("missing", RelationStatus::Unknown),
        ] {
            let relation = relation(name);
            let scope = RelationResolver::scope(&relation, &catalog);
            assert_eq!(RelationResolver::resolve(relation, scope.as_deref()).status, status);
        }
    }

    #[test]
    fn scope_follows_the_index_pattern() {
        let source = |name: &str, ty: &str| {
            SourceSchema::from_json(name, &json!({ "properties": { "emp_no": { "type": ty } } })).unwrap()
        };
        let catalog = SchemaCatalog::merge(vec![source("basic", "integer"), source("incompatible", "long")]).unwrap();

        let scope = RelationResolver::scope(&relation("basic"), &catalog).unwrap();
        assert!(matches!(scope.lookup("emp_no"), Lookup::Found(_)));

        let scope = RelationResolver::scope(&relation("\"*\""), &catalog).unwrap();
        assert!(matches!(scope.lookup("emp_no"), Lookup::Conflict(_)));
    }
}
