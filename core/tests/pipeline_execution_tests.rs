// tests/pipeline_execution_tests.rs
mod common;

use apiary_flow::{ContextData, FlowError, Pipeline, PipelineControl, PipelineResult, SkipCondition};
use common::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn runs_steps_in_declared_order() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TestContext, TestError>::new(&[("step1", false, None), ("step2", false, None), ("step3", false, None)])
      .unwrap();

  // Registered out of order on purpose; execution follows the declaration.
  pipeline.on_root("step3", recording("step3")).unwrap();
  pipeline.on_root("step1", recording("step1")).unwrap();
  pipeline.on_root("step2", recording("step2")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
}

#[tokio::test]
async fn stop_halts_remaining_steps() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("stepA", false, None),
    ("stopStep", false, None),
    ("stepC", false, None),
  ])
  .unwrap();
  pipeline.on_root("stepA", recording("stepA")).unwrap();
  pipeline.on_root("stopStep", recording("stopStep")).unwrap();
  pipeline.on_root("stepC", recording("stepC")).unwrap();

  let ctx = ContextData::new(TestContext {
    stop_at: Some("stopStep".to_string()),
    ..Default::default()
  });
  let result = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["stepA", "stopStep"]);
}

#[tokio::test]
async fn stop_in_on_handler_skips_after_handler() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("only", false, None)]).unwrap();
  pipeline.on_root("only", recording("on")).unwrap();
  pipeline.after_root("only", recording("after")).unwrap();

  let ctx = ContextData::new(TestContext {
    stop_at: Some("on".to_string()),
    ..Default::default()
  });
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["on"]);
}

#[tokio::test]
async fn on_then_after_handlers_run_in_order() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("main", false, None), ("next", false, None)]).unwrap();
  pipeline.after_root("main", recording("after_main")).unwrap();
  pipeline.on_root("main", recording("on_main_1")).unwrap();
  pipeline.on_root("main", recording("on_main_2")).unwrap();
  pipeline.on_root("next", recording("on_next")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(
    ctx.read().steps_executed,
    vec!["on_main_1", "on_main_2", "after_main", "on_next"]
  );
}

#[tokio::test]
async fn required_step_error_is_returned() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("good", false, None),
    ("bad", false, None),
    ("never", false, None),
  ])
  .unwrap();
  pipeline.on_root("good", recording("good")).unwrap();
  pipeline.on_root("bad", failing("bad")).unwrap();
  pipeline.on_root("never", recording("never")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  let err = pipeline.run(ctx.clone()).await.unwrap_err();

  match err {
    TestError::Handler(msg) => assert_eq!(msg, "bad failed"),
    other => panic!("expected handler error, got {other:?}"),
  }
  assert_eq!(ctx.read().steps_executed, vec!["good", "bad"]);
}

#[tokio::test]
async fn optional_step_error_is_swallowed() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("first", false, None),
    ("best_effort", true, None),
    ("last", false, None),
  ])
  .unwrap();
  pipeline.on_root("first", recording("first")).unwrap();
  pipeline.on_root("best_effort", failing("best_effort")).unwrap();
  pipeline.on_root("last", recording("last")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  let result = pipeline.run(ctx.clone()).await.unwrap();

  assert_eq!(result, PipelineResult::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["first", "best_effort", "last"]);
}

#[tokio::test]
async fn skip_condition_is_evaluated_against_current_context() {
  setup_tracing();
  let skip_when_counted: SkipCondition<TestContext> = Arc::new(|ctx: ContextData<TestContext>| ctx.read().counter > 0);
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[
    ("step1", false, None),
    ("maybe", false, Some(skip_when_counted)),
    ("step3", false, None),
  ])
  .unwrap();
  pipeline.on_root("step1", recording("step1")).unwrap();
  pipeline.on_root("maybe", recording("maybe")).unwrap();
  pipeline.on_root("step3", recording("step3")).unwrap();

  let ctx = ContextData::new(TestContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().steps_executed, vec!["step1", "step3"]);
}

#[tokio::test]
async fn missing_handler_on_required_step_fails() {
  setup_tracing();
  let pipeline = Pipeline::<TestContext, TestError>::new(&[("no_handler", false, None)]).unwrap();

  let err = pipeline.run(ContextData::new(TestContext::default())).await.unwrap_err();
  match err {
    TestError::Flow(FlowError::HandlerMissing { step_name }) => assert_eq!(step_name, "no_handler"),
    other => panic!("expected HandlerMissing, got {other:?}"),
  }
}

#[tokio::test]
async fn missing_handler_on_optional_step_is_skipped() {
  setup_tracing();
  let pipeline = Pipeline::<TestContext, TestError>::new(&[("optional_no_handler", true, None)]).unwrap();
  let result = pipeline.run(ContextData::new(TestContext::default())).await.unwrap();
  assert_eq!(result, PipelineResult::Completed);
}

#[tokio::test]
async fn async_handlers_observe_writes_of_earlier_steps() {
  setup_tracing();
  let mut pipeline = Pipeline::<TestContext, TestError>::new(&[("produce", false, None), ("consume", false, None)]).unwrap();
  pipeline
    .on_root("produce", |ctx: ContextData<TestContext>| async move {
      tokio::time::sleep(Duration::from_millis(5)).await;
      ctx.update(|c| c.counter = 41);
      Ok::<_, TestError>(PipelineControl::Continue)
    })
    .unwrap();
  pipeline
    .on_root("consume", |ctx: ContextData<TestContext>| async move {
      let seen = ctx.with(|c| c.counter);
      ctx.update(|c| c.counter = seen + 1);
      Ok::<_, TestError>(PipelineControl::Continue)
    })
    .unwrap();

  let ctx = ContextData::new(TestContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().counter, 42);
}
