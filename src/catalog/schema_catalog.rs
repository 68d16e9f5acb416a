use std::{borrow::Cow, collections::HashSet};

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use crate::catalog::{CatalogError, Conflict, FieldDescriptor, MappedField, SourceSchema};

/// Outcome of looking up a dotted path in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a FieldDescriptor),
    Conflict(&'a Conflict),
    /// `siblings` holds the full paths available at the first segment that did not match.
    Missing { siblings: Vec<String> },
}

/// Merged, read-only view over every source a query can read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaCatalog {
    schemas: Vec<SourceSchema>,
    fields: IndexMap<String, MappedField>,
}

impl SchemaCatalog {
    /// Merge per-source schemas. Paths typed identically everywhere become a single
    /// descriptor, paths with diverging types become a [`Conflict`].
    pub fn merge(sources: Vec<SourceSchema>) -> Result<Self, CatalogError> {
        if sources.is_empty() {
            return Err(CatalogError::NoSources);
        }
        let mut seen = HashSet::new();
        for source in &sources {
            if !seen.insert(source.name.as_str()) {
                return Err(CatalogError::DuplicateSource(source.name.clone()));
            }
        }

        Ok(Self::merged(sources))
    }

    fn merged(schemas: Vec<SourceSchema>) -> Self {
        let levels: Vec<(&str, &IndexMap<String, MappedField>)> =
            schemas.iter().map(|s| (s.name.as_str(), &s.fields)).collect();
        let fields = merge_level(&levels);

        debug!(sources = schemas.len(), fields = fields.len(), "merged schema catalog");
        Self { schemas, fields }
    }

    /// Catalog over a single source.
    pub fn single(source: SourceSchema) -> Self {
        Self {
            fields: source.fields.clone(),
            schemas: vec![source],
        }
    }

    /// Names of the merged sources, in merge order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.name.as_str())
    }

    /// Top-level fields in mapping order.
    pub fn roots(&self) -> impl Iterator<Item = &MappedField> {
        self.fields.values()
    }

    pub fn lookup(&self, path: &str) -> Lookup<'_> {
        let mut level = &self.fields;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            match level.get(segment) {
                None => {
                    return Lookup::Missing {
                        siblings: level.values().map(|f| f.path().to_string()).collect(),
                    };
                }
                Some(MappedField::Conflict(conflict)) => return Lookup::Conflict(conflict),
                Some(MappedField::Field(field)) => {
                    if segments.peek().is_none() {
                        return Lookup::Found(field);
                    }
                    level = &field.children;
                }
            }
        }
        Lookup::Missing { siblings: Vec::new() }
    }

    /// Whether the index pattern (`*` wildcards, comma separated alternatives,
    /// optionally double quoted) names at least one source.
    pub fn matches_index(&self, pattern: &str) -> bool {
        !self.matching(pattern).is_empty()
    }

    /// The catalog restricted to the sources `pattern` names, or `None` when it names none.
    /// Conflicts between sources left out of the pattern disappear from the scoped view.
    pub fn scope(&self, pattern: &str) -> Option<Cow<'_, SchemaCatalog>> {
        let matching = self.matching(pattern);
        if matching.is_empty() {
            None
        } else if matching.len() == self.schemas.len() {
            Some(Cow::Borrowed(self))
        } else {
            Some(Cow::Owned(Self::merged(matching.into_iter().cloned().collect())))
        }
    }

    fn matching(&self, pattern: &str) -> Vec<&SourceSchema> {
        match index_pattern(pattern) {
            Some(re) => self.schemas.iter().filter(|s| re.is_match(&s.name)).collect(),
            None => Vec::new(),
        }
    }
}

fn index_pattern(pattern: &str) -> Option<Regex> {
    let pattern = pattern.trim().trim_matches('"');
    let alternatives: Vec<String> = pattern
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.split('*').map(regex::escape).collect::<Vec<_>>().join(".*"))
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    Regex::new(&format!("^(?:{})$", alternatives.join("|"))).ok()
}

fn merge_level(levels: &[(&str, &IndexMap<String, MappedField>)]) -> IndexMap<String, MappedField> {
    let mut merged = IndexMap::new();
    for (_, level) in levels {
        for key in level.keys() {
            if merged.contains_key(key) {
                continue;
            }
            let entries: Vec<(&str, &MappedField)> = levels
                .iter()
                .filter_map(|(source, l)| l.get(key).map(|f| (*source, f)))
                .collect();
            merged.insert(key.clone(), merge_entries(&entries));
        }
    }
    merged
}

fn merge_entries(entries: &[(&str, &MappedField)]) -> MappedField {
    let mut fields: Vec<(&str, &FieldDescriptor)> = Vec::with_capacity(entries.len());
    let mut types = Vec::new();
    for (source, entry) in entries {
        match entry {
            MappedField::Field(f) => {
                fields.push((*source, f));
                types.push((f.data_type.clone(), source.to_string()));
            }
            MappedField::Conflict(c) => types.extend(c.types.iter().cloned()),
        }
    }

    let first = match fields.first() {
        Some((_, first)) if fields.len() == entries.len() => Some(*first),
        _ => None,
    };
    let agreed = first.filter(|first| fields.iter().all(|(_, f)| f.data_type == first.data_type));
    let Some(first) = agreed else {
        types.sort_by(|a, b| a.1.cmp(&b.1));
        return MappedField::Conflict(Conflict {
            name: entries[0].1.name().to_string(),
            path: entries[0].1.path().to_string(),
            types,
        });
    };

    let children: Vec<(&str, &IndexMap<String, MappedField>)> =
        fields.iter().map(|(source, f)| (*source, &f.children)).collect();
    MappedField::Field(FieldDescriptor {
        name: first.name.clone(),
        path: first.path.clone(),
        data_type: first.data_type.clone(),
        aggregatable: fields.iter().all(|(_, f)| f.aggregatable),
        alias: fields.iter().all(|(_, f)| f.alias),
        nested: fields.iter().any(|(_, f)| f.nested),
        children: merge_level(&children),
    })
}
