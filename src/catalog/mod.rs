//! Field metadata of the data sources a query reads from.

pub mod data_type;
pub use data_type::*;

pub mod field_descriptor;
pub use field_descriptor::*;

pub mod catalog_error;
pub use catalog_error::*;

pub mod source_schema;
pub use source_schema::*;

pub mod schema_catalog;
pub use schema_catalog::*;
