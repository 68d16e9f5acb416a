use thiserror::Error;

/// Malformed catalog input. These are defects of the metadata provider, never
/// user query errors, so they abort instead of becoming diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("no source schemas to merge")]
    NoSources,

    #[error("source [{0}] is defined more than once")]
    DuplicateSource(String),

    #[error("invalid mapping in [{index}]: {reason}")]
    InvalidMapping { index: String, reason: String },

    #[error("alias [{path}] in [{index}] points to container field [{target}]")]
    AliasToContainer { index: String, path: String, target: String },
}

impl CatalogError {
    pub fn invalid(index: &str, reason: impl Into<String>) -> Self {
        CatalogError::InvalidMapping { index: index.to_string(), reason: reason.into() }
    }
}
