// core/src/lib.rs

//! apiary-flow: a small async step-pipeline engine.
//!
//! A pipeline is an ordered list of named steps operating on one shared
//! context. Each step may have `on` and `after` handlers, can be skipped by a
//! predicate, and can be marked optional: an optional step's failure is logged
//! and the run moves on, which is how best-effort side effects (emails, chat
//! messages) are expressed. Any handler may stop the run early.
//!
//! Pipelines are registered in a [`FlowRegistry`] keyed by their context type,
//! so callers only need to build a context and hand it to the registry.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::FlowRegistry;
