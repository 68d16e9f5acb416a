//! Raw syntax tree produced by the external query parser.

pub mod location;
pub use location::*;

pub mod literal;
pub use literal::*;

pub mod expr;
pub use expr::*;

pub mod query;
pub use query::*;
