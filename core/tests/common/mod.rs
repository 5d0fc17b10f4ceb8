// tests/common/mod.rs
#![allow(dead_code)]

use apiary_flow::{ContextData, FlowError, PipelineControl};
use std::future::{ready, Ready};
use tracing::Level;

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub steps_executed: Vec<String>,
  pub stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum TestError {
  #[error("flow error: {0}")]
  Flow(#[from] FlowError),

  #[error("handler failed: {0}")]
  Handler(String),
}

/// Handler that records `label`, bumps the counter and stops if `stop_at` names it.
pub fn recording(
  label: &'static str,
) -> impl Fn(ContextData<TestContext>) -> Ready<Result<PipelineControl, TestError>> + Send + Sync + 'static {
  move |ctx| {
    let mut guard = ctx.write();
    guard.counter += 1;
    guard.steps_executed.push(label.to_string());
    let control = if guard.stop_at.as_deref() == Some(label) {
      PipelineControl::Stop
    } else {
      PipelineControl::Continue
    };
    ready(Ok(control))
  }
}

/// Handler that records `label` and then fails.
pub fn failing(
  label: &'static str,
) -> impl Fn(ContextData<TestContext>) -> Ready<Result<PipelineControl, TestError>> + Send + Sync + 'static {
  move |ctx| {
    ctx.write().steps_executed.push(label.to_string());
    ready(Err(TestError::Handler(format!("{label} failed"))))
  }
}

use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
