use thiserror::Error;

/// Inconsistent signature table. Raised while building a registry, never while analyzing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("function [{0}] is registered more than once")]
    Duplicate(String),

    #[error("invalid signature for [{name}]: {reason}")]
    InvalidSignature { name: String, reason: String },
}
