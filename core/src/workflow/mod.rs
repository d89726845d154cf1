// catalog_core/src/workflow/mod.rs

//! A small step engine: a `Workflow<TData, Err>` is an ordered list of named
//! steps run against one shared `ContextData<TData>`. The product service
//! expresses each mutating operation as a workflow so that validation, file
//! writes, record writes and cleanup happen in a fixed, inspectable order.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod step;

pub use context_data::ContextData;
pub use control::{StepControl, WorkflowOutcome};
pub use definition::{StepHandler, Workflow};
pub use step::{skip_when, SkipCondition, StepDef};
