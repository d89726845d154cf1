// catalog_core/src/workflow/execution.rs

//! `Workflow::run()`: executes steps in order against a shared context.

use super::context_data::ContextData;
use super::control::{StepControl, WorkflowOutcome};
use super::definition::Workflow;
use crate::error::WorkflowError;
use tracing::{event, info_span, instrument, Instrument, Level};

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// - a step whose `skip_if` returns true is skipped;
  /// - a non-optional step without handlers fails with `HandlerMissing`;
  /// - a failing handler of a non-optional step fails the run, while a
  ///   failing handler of an optional step is logged and the run goes on;
  /// - `StepControl::Stop` ends the run with `WorkflowOutcome::Stopped`.
  #[instrument(
    name = "Workflow::run",
    skip_all,
    fields(workflow = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<WorkflowOutcome, Err> {
    event!(Level::DEBUG, "Workflow starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        if skip_if(ctx_data.clone()) {
          event!(Level::DEBUG, step = step_name, "Step skipped.");
          continue;
        }
      }

      let handlers = match self.handlers.get(step_name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step_def.optional => {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers.");
          continue;
        }
        _ => {
          event!(Level::ERROR, step = step_name, "Non-optional step has no handlers.");
          return Err(Err::from(WorkflowError::HandlerMissing {
            workflow: self.name.clone(),
            step_name: step_def.name.clone(),
          }));
        }
      };

      let step_span = info_span!(
        "workflow_step",
        step = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      for handler in handlers {
        match handler(ctx_data.clone()).instrument(step_span.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => {
            event!(Level::INFO, step = step_name, "Workflow stopped by handler.");
            return Ok(WorkflowOutcome::Stopped);
          }
          Err(e) if step_def.optional => {
            event!(Level::WARN, step = step_name, error = %e, "Optional step failed; continuing.");
            break;
          }
          Err(e) => {
            event!(Level::ERROR, step = step_name, error = %e, "Step failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Workflow completed.");
    Ok(WorkflowOutcome::Completed)
  }
}
