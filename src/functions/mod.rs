//! Signature table for functions and operators.

pub mod function_def;
pub use function_def::*;

pub mod registry_error;
pub use registry_error::*;

pub mod builtins;
pub use builtins::*;

pub mod function_registry;
pub use function_registry::*;
