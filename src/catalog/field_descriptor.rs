use indexmap::IndexMap;

use crate::catalog::DataType;

/// Metadata of a single mapped field.
///
/// Object and nested containers hold their properties in `children`; a `text`
/// field holds its multi-fields there (e.g. `text.keyword`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Last path segment
    pub name: String,
    /// Full dotted path
    pub path: String,
    pub data_type: DataType,
    pub aggregatable: bool,
    pub alias: bool,
    /// Set on a nested container and on everything below it
    pub nested: bool,
    pub children: IndexMap<String, MappedField>,
}

impl FieldDescriptor {
    pub fn is_container(&self) -> bool {
        self.data_type.is_container()
    }

    pub fn child(&self, name: &str) -> Option<&MappedField> {
        self.children.get(name)
    }

    /// Whether the field can be matched exactly (keyword, or text with a keyword multi-field).
    pub fn has_exact_match(&self) -> bool {
        match self.data_type {
            DataType::Text => self.children.values().any(|child| {
                matches!(child, MappedField::Field(f) if f.data_type == DataType::Keyword)
            }),
            _ => true,
        }
    }
}

/// A path mapped to different types by different sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub name: String,
    pub path: String,
    /// `(type, source)` pairs, sorted by source name
    pub types: Vec<(DataType, String)>,
}

impl Conflict {
    pub fn message(&self) -> String {
        // group the sources by type, keeping the source order of the first occurrence
        let mut grouped: IndexMap<&DataType, Vec<&str>> = IndexMap::new();
        for (ty, source) in &self.types {
            grouped.entry(ty).or_default().push(source);
        }
        let details: Vec<String> = grouped
            .iter()
            .map(|(ty, sources)| format!("[{}] in [{}]", ty, sources.join(", ")))
            .collect();
        format!(
            "Cannot use field [{}] due to ambiguities being mapped as [{}] incompatible types: {}",
            self.path,
            grouped.len(),
            details.join(", ")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedField {
    Field(FieldDescriptor),
    Conflict(Conflict),
}

impl MappedField {
    pub fn name(&self) -> &str {
        match self {
            MappedField::Field(f) => &f.name,
            MappedField::Conflict(c) => &c.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            MappedField::Field(f) => &f.path,
            MappedField::Conflict(c) => &c.path,
        }
    }

    pub fn as_field(&self) -> Option<&FieldDescriptor> {
        match self {
            MappedField::Field(f) => Some(f),
            MappedField::Conflict(_) => None,
        }
    }
}
