// catalog_core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failures raised by the workflow engine itself, as opposed to failures
/// returned by step handlers.
#[derive(Debug, Error)]
pub enum WorkflowError {
  #[error("Step not found in workflow '{workflow}': {step_name}")]
  StepNotFound { workflow: String, step_name: String },

  #[error("Step defined twice in workflow '{workflow}': {step_name}")]
  DuplicateStep { workflow: String, step_name: String },

  #[error("Handler missing for non-optional step '{step_name}' in workflow '{workflow}'")]
  HandlerMissing { workflow: String, step_name: String },

  #[error("Workflow '{workflow}' finished without producing {missing}")]
  MissingOutput { workflow: String, missing: &'static str },

  #[error("Workflow '{workflow}' was stopped before completion")]
  Halted { workflow: String },
}

#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Authentication required: {0}")]
  Unauthorized(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Payload too large: {0}")]
  PayloadTooLarge(String),

  #[error("Storage failure while {action}: {source}")]
  Storage {
    action: String,
    #[source]
    source: AnyhowError,
  },

  #[error("Workflow Error: {0}")]
  Workflow(#[from] WorkflowError),
}

impl CatalogError {
  pub fn storage(action: impl Into<String>, source: impl Into<AnyhowError>) -> Self {
    CatalogError::Storage {
      action: action.into(),
      source: source.into(),
    }
  }

  pub fn product_not_found() -> Self {
    CatalogError::NotFound("Product not found".to_string())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn storage_errors_keep_their_source() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
    let err = CatalogError::storage("writing image", io);
    assert_eq!(err.to_string(), "Storage failure while writing image: read-only");
  }

  #[test]
  fn workflow_errors_convert() {
    let err: CatalogError = WorkflowError::Halted {
      workflow: "create_product".to_string(),
    }
    .into();
    assert!(matches!(err, CatalogError::Workflow(WorkflowError::Halted { .. })));
    assert_eq!(
      CatalogError::product_not_found().to_string(),
      "Resource Not Found: Product not found"
    );
  }
}
