//! Name binding: columns against the catalog, calls against the function registry.

pub mod expression;
pub use expression::*;

pub mod suggester;
pub use suggester::*;

pub mod analysis_context;
pub use analysis_context::*;

pub mod resolvers;
pub use resolvers::*;

#[allow(clippy::module_inception)]
pub mod analyzer;
pub use analyzer::*;
