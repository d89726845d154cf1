// catalog_core/src/workflow/control.rs

/// Returned by a step handler to tell the workflow whether to go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  /// Halt the workflow now. Later handlers and steps do not run.
  Stop,
}

/// How a workflow run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
  Completed,
  Stopped,
}
