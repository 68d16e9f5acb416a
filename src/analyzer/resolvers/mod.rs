pub mod relation_resolver;
pub use relation_resolver::*;

pub mod wildcard_resolver;
pub use wildcard_resolver::*;

pub mod column_resolver;
pub use column_resolver::*;

pub mod type_checker;
pub use type_checker::*;

pub mod function_resolver;
pub use function_resolver::*;

pub mod scalar_resolver;
pub use scalar_resolver::*;
