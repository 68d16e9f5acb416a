use crate::{
    analyzer::{did_you_mean, suggest_within, AnalysisContext, Expression},
    ast::Location,
    catalog::{FieldDescriptor, Lookup},
    planner::Clause,
};

pub struct ColumnResolver;

impl ColumnResolver {
    /// Bind a column reference to a catalog field, a SELECT alias, or an unresolved node.
    pub fn resolve(name: &str, location: Location, clause: Clause, ctx: &AnalysisContext) -> Expression {
        let Some(catalog) = ctx.catalog else {
            return Self::unknown(name, Vec::new(), location, ctx);
        };

        match catalog.lookup(name) {
            Lookup::Found(field) => Self::bind(field, location),
            Lookup::Conflict(conflict) => Expression::unresolved(name, conflict.message(), location),
            Lookup::Missing { siblings } => {
                if clause.sees_aliases() {
                    if let Some(target) = ctx.alias(name) {
                        return Expression::Alias {
                            name: name.to_string(),
                            inner: Box::new(target.clone()),
                            location,
                        };
                    }
                }
                Self::unknown(name, siblings, location, ctx)
            }
        }
    }

    /// A field is usable as a value only when it is a supported leaf.
    pub fn bind(field: &FieldDescriptor, location: Location) -> Expression {
        if let Some(message) = Self::unusable(field) {
            return Expression::unresolved(field.path.clone(), message, location);
        }
        Expression::FieldRef { field: field.clone(), location }
    }

    pub fn unusable(field: &FieldDescriptor) -> Option<String> {
        if field.data_type.is_unsupported() {
            Some(format!(
                "Cannot use field [{}] type [{}] as is unsupported",
                field.path, field.data_type
            ))
        } else if field.is_container() {
            Some(format!(
                "Cannot use field [{}] type [{}] only its subfields",
                field.path, field.data_type
            ))
        } else {
            None
        }
    }

    pub fn unknown(name: &str, candidates: Vec<String>, location: Location, ctx: &AnalysisContext) -> Expression {
        let suggestions = suggest_within(
            name,
            candidates,
            ctx.config.max_column_suggestions,
            ctx.config.similarity_threshold,
        );
        let message = format!("Unknown column [{}]{}", name, did_you_mean(&suggestions));
        Expression::unresolved(name, message, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SchemaCatalog, SourceSchema};
    use crate::config::AnalyzerConfig;
    use crate::functions::FunctionRegistry;
    use serde_json::json;

    fn catalog() -> SchemaCatalog {
        SchemaCatalog::single(SourceSchema::from_json("test", &json!({
            "properties": {
                "int": { "type": "integer" },
                "text": { "type": "text" },
                "unsupported": { "type": "ip_range" },
                "field": { "properties": { "alias": { "type": "alias", "path": "int" } } }
            }
        })).unwrap())
    }

    fn message(expr: &Expression) -> &str {
        match expr {
            Expression::Unresolved { message, .. } => message,
            other => panic!("expected unresolved, got {:?}", other),
        }
    }

    #[test]
    fn binds_fields_and_reports_unusable_ones() {
        let catalog = catalog();
        let registry = FunctionRegistry::builtin();
        let config = AnalyzerConfig::default();
        let ctx = AnalysisContext::new(Some(&catalog), &registry, &config);
        let at = Location::new(1, 8);

        assert!(matches!(ColumnResolver::resolve("int", at, Clause::Select, &ctx), Expression::FieldRef { .. }));
        assert!(matches!(ColumnResolver::resolve("field.alias", at, Clause::Select, &ctx), Expression::FieldRef { .. }));
        assert_eq!(
            message(&ColumnResolver::resolve("unsupported", at, Clause::Where, &ctx)),
            "Cannot use field [unsupported] type [ip_range] as is unsupported"
        );
        assert_eq!(
            message(&ColumnResolver::resolve("field", at, Clause::Select, &ctx)),
            "Cannot use field [field] type [object] only its subfields"
        );
    }

    #[test]
    fn unknown_columns_get_suggestions_from_their_level() {
        let catalog = catalog();
        let registry = FunctionRegistry::builtin();
        let config = AnalyzerConfig::default();
        let ctx = AnalysisContext::new(Some(&catalog), &registry, &config);
        let at = Location::new(1, 8);

        assert_eq!(message(&ColumnResolver::resolve("txt", at, Clause::Select, &ctx)), "Unknown column [txt], did you mean [text]?");
        assert_eq!(
            message(&ColumnResolver::resolve("field.alas", at, Clause::Select, &ctx)),
            "Unknown column [field.alas], did you mean [field.alias]?"
        );
        assert_eq!(message(&ColumnResolver::resolve("xxx", at, Clause::Select, &ctx)), "Unknown column [xxx]");
    }

    #[test]
    fn aliases_are_used_only_after_select_and_only_for_missing_columns() {
        let catalog = catalog();
        let registry = FunctionRegistry::builtin();
        let config = AnalyzerConfig::default();
        let mut ctx = AnalysisContext::new(Some(&catalog), &registry, &config);
        let at = Location::new(1, 40);
        let int = ColumnResolver::resolve("int", Location::new(1, 8), Clause::Select, &ctx);
        ctx.add_aliases(&[
            Expression::Alias { name: "i".into(), inner: Box::new(int.clone()), location: Location::new(1, 8) },
            Expression::Alias { name: "text".into(), inner: Box::new(int), location: Location::new(1, 8) },
        ]);

        assert!(matches!(ColumnResolver::resolve("i", at, Clause::GroupBy, &ctx), Expression::Alias { .. }));
        assert!(matches!(ColumnResolver::resolve("i", at, Clause::Where, &ctx), Expression::Unresolved { .. }));
        assert!(matches!(ColumnResolver::resolve("text", at, Clause::OrderBy, &ctx), Expression::FieldRef { .. }));
    }
}
