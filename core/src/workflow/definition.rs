// catalog_core/src/workflow/definition.rs

//! `Workflow<TData, Err>` construction: step list and handler registration.

use super::context_data::ContextData;
use super::control::StepControl;
use super::step::{SkipCondition, StepDef};
use crate::error::WorkflowError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

/// A registered step handler. It receives a clone of the run's context and
/// resolves to a `StepControl` or the workflow's error type.
pub type StepHandler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>
    + Send
    + Sync,
>;

pub struct Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) handlers: HashMap<String, Vec<StepHandler<TData, Err>>>,
}

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  /// Builds a workflow from `(step_name, optional, skip_if)` triples.
  pub fn new(
    name: impl Into<String>,
    step_defs: &[(&str, bool, Option<SkipCondition<TData>>)],
  ) -> Result<Self, WorkflowError> {
    let mut workflow = Self {
      name: name.into(),
      steps: Vec::with_capacity(step_defs.len()),
      handlers: HashMap::new(),
    };
    for (step_name, optional, skip_if) in step_defs {
      workflow.ensure_step_absent(step_name)?;
      workflow.steps.push(StepDef {
        name: (*step_name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      });
    }
    Ok(workflow)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  fn position(&self, step_name: &str) -> Result<usize, WorkflowError> {
    self
      .steps
      .iter()
      .position(|s| s.name == step_name)
      .ok_or_else(|| WorkflowError::StepNotFound {
        workflow: self.name.clone(),
        step_name: step_name.to_string(),
      })
  }

  fn ensure_step_absent(&self, step_name: &str) -> Result<(), WorkflowError> {
    if self.steps.iter().any(|s| s.name == step_name) {
      return Err(WorkflowError::DuplicateStep {
        workflow: self.name.clone(),
        step_name: step_name.to_string(),
      });
    }
    Ok(())
  }

  /// Inserts a new step right after `existing_step`.
  pub fn insert_after(
    &mut self,
    existing_step: &str,
    new_step: &str,
    optional: bool,
    skip_if: Option<SkipCondition<TData>>,
  ) -> Result<(), WorkflowError> {
    let idx = self.position(existing_step)?;
    self.ensure_step_absent(new_step)?;
    self.steps.insert(
      idx + 1,
      StepDef {
        name: new_step.to_string(),
        optional,
        skip_if,
      },
    );
    Ok(())
  }

  /// Registers a handler for `step_name`. Handlers of one step run in
  /// registration order.
  pub fn on<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) -> Result<(), WorkflowError>
  where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.position(step_name)?;
    let handler: StepHandler<TData, Err> = Box::new(move |ctx_data| {
      let fut = handler_fn(ctx_data);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.handlers.entry(step_name.to_string()).or_default().push(handler);
    Ok(())
  }
}
