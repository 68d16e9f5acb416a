use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{CatalogError, DataType, FieldDescriptor, MappedField};

#[derive(Debug, Default, Deserialize)]
struct IndexMapping {
    #[serde(default)]
    properties: IndexMap<String, PropertyMapping>,
}

#[derive(Debug, Default, Deserialize)]
struct PropertyMapping {
    #[serde(rename = "type")]
    ty: Option<String>,
    #[serde(default)]
    properties: IndexMap<String, PropertyMapping>,
    /// multi-fields of a leaf
    #[serde(default)]
    fields: IndexMap<String, PropertyMapping>,
    /// target of an `alias` field
    path: Option<String>,
    doc_values: Option<bool>,
}

/// The field catalog of one data source, as read from its index mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSchema {
    pub name: String,
    pub fields: IndexMap<String, MappedField>,
}

impl SourceSchema {
    /// Build a source from an index mapping of the shape
    /// `{"properties": {"<field>": {"type": "...", "properties": {...}, "fields": {...}}}}`.
    pub fn from_json(name: &str, mapping: &Value) -> Result<Self, CatalogError> {
        let mapping: IndexMapping = serde_json::from_value(mapping.clone())
            .map_err(|e| CatalogError::invalid(name, e.to_string()))?;
        Self::from_mapping(name, mapping)
    }

    pub fn from_json_str(name: &str, text: &str) -> Result<Self, CatalogError> {
        let mapping: IndexMapping = serde_json::from_str(text)
            .map_err(|e| CatalogError::invalid(name, e.to_string()))?;
        Self::from_mapping(name, mapping)
    }

    fn from_mapping(name: &str, mapping: IndexMapping) -> Result<Self, CatalogError> {
        if name.is_empty() {
            return Err(CatalogError::invalid(name, "source name cannot be empty"));
        }
        let mut aliases = Vec::new();
        let mut fields = build_level(name, None, false, &mapping.properties, &mut aliases)?;
        resolve_aliases(name, &mut fields, aliases)?;
        Ok(Self { name: name.to_string(), fields })
    }

    pub fn field(&self, path: &str) -> Option<&FieldDescriptor> {
        find_field(&self.fields, path)
    }
}

fn build_level(
    index: &str,
    parent: Option<&str>,
    nested: bool,
    properties: &IndexMap<String, PropertyMapping>,
    aliases: &mut Vec<(String, String)>,
) -> Result<IndexMap<String, MappedField>, CatalogError> {
    let mut level = IndexMap::with_capacity(properties.len());
    for (name, mapping) in properties {
        if name.is_empty() || name.contains('.') {
            return Err(CatalogError::invalid(index, format!("invalid field name [{}]", name)));
        }
        let path = match parent {
            Some(parent) => format!("{}.{}", parent, name),
            None => name.clone(),
        };

        let is_alias = mapping.ty.as_deref() == Some("alias");
        let data_type = match mapping.ty.as_deref() {
            None => DataType::Object,
            // typed once the alias target is known
            Some("alias") => DataType::Keyword,
            Some(ty) => DataType::from_mapping(ty),
        };

        if !data_type.is_container() && !mapping.properties.is_empty() {
            return Err(CatalogError::invalid(
                index,
                format!("field [{}] of type [{}] cannot declare properties", path, data_type),
            ));
        }
        if is_alias {
            let target = mapping.path.clone().ok_or_else(|| {
                CatalogError::invalid(index, format!("alias [{}] has no path", path))
            })?;
            aliases.push((path.clone(), target));
        }

        let nested_here = nested || data_type == DataType::Nested;
        let children = if data_type.is_container() {
            build_level(index, Some(&path), nested_here, &mapping.properties, aliases)?
        } else {
            build_level(index, Some(&path), nested_here, &mapping.fields, aliases)?
        };
        let aggregatable = match data_type {
            DataType::Text | DataType::Object | DataType::Nested | DataType::Unsupported(_) => false,
            _ => mapping.doc_values != Some(false),
        };

        level.insert(
            name.clone(),
            MappedField::Field(FieldDescriptor {
                name: name.clone(),
                path,
                data_type,
                aggregatable,
                alias: is_alias,
                nested: nested_here,
                children,
            }),
        );
    }
    Ok(level)
}

fn resolve_aliases(
    index: &str,
    fields: &mut IndexMap<String, MappedField>,
    aliases: Vec<(String, String)>,
) -> Result<(), CatalogError> {
    for (path, target) in aliases {
        // a target outside this mapping leaves the alias as a keyword
        let Some(target_field) = find_field(fields, &target) else {
            continue;
        };
        if target_field.is_container() {
            return Err(CatalogError::AliasToContainer {
                index: index.to_string(),
                path,
                target,
            });
        }
        let (data_type, aggregatable) = (target_field.data_type.clone(), target_field.aggregatable);
        if let Some(alias) = find_field_mut(fields, &path) {
            alias.data_type = data_type;
            alias.aggregatable = aggregatable;
        }
    }
    Ok(())
}

pub(crate) fn find_field<'a>(fields: &'a IndexMap<String, MappedField>, path: &str) -> Option<&'a FieldDescriptor> {
    let mut segments = path.split('.');
    let mut current = fields.get(segments.next()?)?.as_field()?;
    for segment in segments {
        current = current.children.get(segment)?.as_field()?;
    }
    Some(current)
}

fn find_field_mut<'a>(fields: &'a mut IndexMap<String, MappedField>, path: &str) -> Option<&'a mut FieldDescriptor> {
    let mut segments = path.split('.');
    let mut current = match fields.get_mut(segments.next()?)? {
        MappedField::Field(f) => f,
        MappedField::Conflict(_) => return None,
    };
    for segment in segments {
        current = match current.children.get_mut(segment)? {
            MappedField::Field(f) => f,
            MappedField::Conflict(_) => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_nested_hierarchy_with_paths() {
        let source = SourceSchema::from_json("test", &json!({
            "properties": {
                "int": { "type": "integer" },
                "some": { "properties": { "dotted": { "properties": { "field": { "type": "keyword" } } } } },
                "dep": { "type": "nested", "properties": { "dep_id": { "type": "text" } } }
            }
        })).unwrap();

        let dotted = source.field("some.dotted.field").unwrap();
        assert_eq!(dotted.path, "some.dotted.field");
        assert_eq!(dotted.data_type, DataType::Keyword);
        assert!(!dotted.nested);

        assert_eq!(source.field("some").unwrap().data_type, DataType::Object);
        let dep_id = source.field("dep.dep_id").unwrap();
        assert!(dep_id.nested);
        assert!(!dep_id.aggregatable);
    }

    #[test]
    fn multi_fields_become_children_of_the_leaf() {
        let source = SourceSchema::from_json("test", &json!({
            "properties": {
                "name": { "type": "text", "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } } }
            }
        })).unwrap();

        let name = source.field("name").unwrap();
        assert!(name.has_exact_match());
        assert_eq!(source.field("name.keyword").unwrap().path, "name.keyword");
    }

    #[test]
    fn aliases_take_the_type_of_their_target() {
        let source = SourceSchema::from_json("test", &json!({
            "properties": {
                "emp_no": { "type": "long" },
                "field": { "properties": { "alias": { "type": "alias", "path": "emp_no" } } }
            }
        })).unwrap();

        let alias = source.field("field.alias").unwrap();
        assert!(alias.alias);
        assert_eq!(alias.data_type, DataType::Long);
    }

    #[test]
    fn aliases_without_a_visible_target_stay_keywords() {
        let source = SourceSchema::from_json("test", &json!({
            "properties": { "field": { "properties": { "alias": { "type": "alias", "path": "hidden.parent" } } } }
        })).unwrap();

        let alias = source.field("field.alias").unwrap();
        assert!(alias.alias);
        assert_eq!(alias.data_type, DataType::Keyword);
    }

    #[test]
    fn malformed_mappings_are_rejected() {
        let dotted = SourceSchema::from_json("test", &json!({ "properties": { "a.b": { "type": "keyword" } } }));
        assert!(matches!(dotted, Err(CatalogError::InvalidMapping { .. })));

        let leaf_with_props = SourceSchema::from_json("test", &json!({
            "properties": { "a": { "type": "keyword", "properties": { "b": { "type": "long" } } } }
        }));
        assert!(matches!(leaf_with_props, Err(CatalogError::InvalidMapping { .. })));

        let to_container = SourceSchema::from_json("test", &json!({
            "properties": { "a": { "type": "alias", "path": "b" }, "b": { "properties": {} } }
        }));
        assert!(matches!(to_container, Err(CatalogError::AliasToContainer { .. })));

        assert!(SourceSchema::from_json_str("test", "{ not json").is_err());
    }
}
