// core/src/core/mod.rs

//! Building blocks shared by pipelines and the registry.

pub mod context_data;
pub mod control;
pub mod handler;
pub mod step;

pub use context_data::ContextData;
pub use control::{PipelineControl, PipelineResult};
pub use handler::Handler;
pub use step::StepDef;
