// core/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct and its step layout.

use crate::core::handler::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::{FlowError, FlowResult};
use std::collections::HashMap;

/// An ordered list of named steps over a root context `TData`.
///
/// Handlers return `Result<_, Err>`. `Err` must be buildable from [`FlowError`]
/// so that engine-level failures (for example a step with no handlers) come
/// back to the caller in the application's own error type.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Builds a pipeline from `(name, optional, skip_if)` triples.
  ///
  /// Step names must be unique.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> FlowResult<Self> {
    let mut steps: Vec<StepDef<TData>> = Vec::with_capacity(step_defs.len());
    for (name, optional, skip_if) in step_defs {
      if steps.iter().any(|s| s.name == *name) {
        return Err(FlowError::DuplicateStep {
          step_name: (*name).to_string(),
        });
      }
      steps.push(StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      });
    }

    Ok(Self {
      steps,
      on: HashMap::new(),
      after: HashMap::new(),
    })
  }

  /// Names of the steps in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub(crate) fn ensure_step_exists(&self, step_name: &str) -> FlowResult<()> {
    if self.steps.iter().any(|s| s.name == step_name) {
      Ok(())
    } else {
      Err(FlowError::StepNotFound {
        step_name: step_name.to_string(),
      })
    }
  }

  pub(crate) fn has_handlers(&self, step_name: &str) -> bool {
    let non_empty = |map: &HashMap<String, Vec<Handler<TData, Err>>>| map.get(step_name).is_some_and(|v| !v.is_empty());
    non_empty(&self.on) || non_empty(&self.after)
  }
}
