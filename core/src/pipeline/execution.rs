// core/src/pipeline/execution.rs

//! `Pipeline::run()`.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::handler::Handler;
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, Instrument, Level};

/// What happened inside one step.
enum StepOutcome {
  Continue,
  Stop,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx_data`.
  ///
  /// - a step whose `skip_if` returns `true` is skipped;
  /// - an optional step without handlers is skipped, a required one fails with
  ///   [`FlowError::HandlerMissing`];
  /// - `PipelineControl::Stop` ends the run with [`PipelineResult::Stopped`];
  /// - an error in a required step ends the run with that error, while an error
  ///   in an optional step is logged and the run moves to the next step.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(context_type = %std::any::type_name::<TData>(), num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = tracing::info_span!(
        "pipeline_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );

      match self.run_step(step_def, &ctx_data).instrument(step_span).await {
        Ok(StepOutcome::Continue) => {}
        Ok(StepOutcome::Stop) => return Ok(PipelineResult::Stopped),
        Err(e) if step_def.optional => {
          event!(Level::WARN, step_name = %step_def.name, error = %e, "Optional step failed; continuing.");
        }
        Err(e) => return Err(e),
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Result<StepOutcome, Err> {
    if let Some(skip_if) = &step_def.skip_if {
      if skip_if(ctx_data.clone()) {
        event!(Level::INFO, "Step skipped by its skip condition.");
        return Ok(StepOutcome::Continue);
      }
    }

    if !self.has_handlers(&step_def.name) {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(StepOutcome::Continue);
      }
      event!(Level::ERROR, "Required step has no handlers.");
      return Err(Err::from(FlowError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase, handlers) in [("on", self.on.get(&step_def.name)), ("after", self.after.get(&step_def.name))] {
      if let Some(handlers) = handlers {
        if let StepOutcome::Stop = run_phase(phase, handlers, ctx_data).await? {
          return Ok(StepOutcome::Stop);
        }
      }
    }

    event!(Level::DEBUG, "Step finished.");
    Ok(StepOutcome::Continue)
  }
}

async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<StepOutcome, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    match handler_fn(ctx_data.clone()).await {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => {
        event!(Level::INFO, phase, handler_index = handler_idx, "Pipeline stopped by a handler.");
        return Ok(StepOutcome::Stop);
      }
      Err(e) => {
        event!(Level::DEBUG, phase, handler_index = handler_idx, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(StepOutcome::Continue)
}
