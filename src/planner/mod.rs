//! Logical plan and the lowering from the raw syntax tree.

pub mod clause;
pub use clause::*;

pub mod logical_plan;
pub use logical_plan::*;

pub mod plan_builder;
pub use plan_builder::*;
