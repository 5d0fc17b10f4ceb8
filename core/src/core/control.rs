// core/src/core/control.rs

/// Returned by every handler to tell the pipeline whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt the run; no further handlers or steps execute.
  Stop,
}

/// How a pipeline run ended when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step either ran or was skipped.
  Completed,
  /// A handler returned [`PipelineControl::Stop`].
  Stopped,
}
