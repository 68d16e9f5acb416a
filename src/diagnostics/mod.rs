pub mod diagnostic;
pub use diagnostic::*;

pub mod analysis_error;
pub use analysis_error::*;
