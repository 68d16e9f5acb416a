use tracing::trace;

use crate::{
    analyzer::{AnalysisContext, ColumnResolver, Expression},
    ast::Location,
    catalog::{FieldDescriptor, Lookup, MappedField},
};

pub struct WildcardResolver;

impl WildcardResolver {
    /// Expand every `*` / `q.*` of a projection into field references, in mapping order.
    pub fn expand_selections(selections: Vec<Expression>, ctx: &AnalysisContext) -> Vec<Expression> {
        let mut result = Vec::with_capacity(selections.len());
        for selection in selections {
            match selection {
                Expression::Wildcard { qualifier, location } => {
                    let expanded = Self::expand(qualifier.as_deref(), location, ctx);
                    trace!(columns = expanded.len(), "expanded wildcard");
                    result.extend(expanded);
                }
                other => result.push(other),
            }
        }
        result
    }

    pub fn expand(qualifier: Option<&str>, location: Location, ctx: &AnalysisContext) -> Vec<Expression> {
        let Some(catalog) = ctx.catalog else {
            let star = match qualifier {
                Some(q) => format!("{}.*", q),
                None => "*".to_string(),
            };
            return vec![Expression::unresolved(star.clone(), format!("Cannot determine columns for [{}]", star), location)];
        };

        let Some(qualifier) = qualifier else {
            let mut fields = Vec::new();
            for root in catalog.roots() {
                collect_top_level(root, location, &mut fields);
            }
            return fields;
        };

        match catalog.lookup(qualifier) {
            Lookup::Found(field) if field.is_container() => {
                let mut fields = Vec::new();
                for child in field.children.values() {
                    collect_descendants(child, location, &mut fields);
                }
                fields
            }
            Lookup::Found(field) => {
                let message = ColumnResolver::unusable(field)
                    .unwrap_or_else(|| format!("Cannot determine columns for [{}.*]", qualifier));
                vec![Expression::unresolved(format!("{}.*", qualifier), message, location)]
            }
            Lookup::Conflict(conflict) => {
                vec![Expression::unresolved(format!("{}.*", qualifier), conflict.message(), location)]
            }
            Lookup::Missing { siblings } => vec![ColumnResolver::unknown(qualifier, siblings, location, ctx)],
        }
    }
}

fn selectable(field: &FieldDescriptor) -> bool {
    !field.is_container() && !field.data_type.is_unsupported()
}

fn field_ref(field: &FieldDescriptor, location: Location) -> Expression {
    Expression::FieldRef { field: field.clone(), location }
}

// `*` walks objects only; nested documents need an explicit qualifier
fn collect_top_level(entry: &MappedField, location: Location, out: &mut Vec<Expression>) {
    let MappedField::Field(field) = entry else { return };
    if field.nested {
        return;
    }
    if field.is_container() {
        for child in field.children.values() {
            collect_top_level(child, location, out);
        }
    } else if selectable(field) {
        out.push(field_ref(field, location));
    }
}

fn collect_descendants(entry: &MappedField, location: Location, out: &mut Vec<Expression>) {
    let MappedField::Field(field) = entry else { return };
    if field.is_container() {
        for child in field.children.values() {
            collect_descendants(child, location, out);
        }
    } else if selectable(field) {
        out.push(field_ref(field, location));
    }
}
