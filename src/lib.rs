pub mod ast;

pub mod catalog;
pub use catalog::{CatalogError, DataType, FieldDescriptor, SchemaCatalog, SourceSchema};

pub mod functions;
pub use functions::{FunctionDef, FunctionRegistry, RegistryError};

pub mod config;
pub use config::AnalyzerConfig;

pub mod planner;
pub use planner::LogicalPlan;

pub mod analyzer;
pub use analyzer::{analyze, analyze_with, suggest};

pub mod verifier;
pub use verifier::verify;

pub mod diagnostics;
pub use diagnostics::{report, AnalysisError, Diagnostic};

pub mod compiler;
pub use compiler::{compile, QueryCompiler};
