//! Rules a fully bound plan must satisfy.

pub mod grouping_rules;
pub use grouping_rules::*;

pub mod filter_rules;
pub use filter_rules::*;

pub mod function_rules;
pub use function_rules::*;

#[allow(clippy::module_inception)]
pub mod verifier;
pub use verifier::*;

#[cfg(test)]
mod _fixtures;
