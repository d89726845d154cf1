// catalog_core/src/service/common_steps.rs

//! Steps shared by the create and update workflows.

use tracing::{info, instrument, warn};

use super::contexts::{CatalogDeps, MutationCtx, SubmissionCtx};
use crate::error::CatalogError;
use crate::workflow::{ContextData, StepControl};

/// Every mutation starts here: only admins get past this step.
pub async fn authorize<T: MutationCtx>(ctx: ContextData<T>) -> Result<StepControl, CatalogError> {
  let identity = ctx.snapshot(|c| c.identity().clone());
  if let Err(e) = identity.require_admin() {
    warn!(subject = %identity.subject, role = %identity.role, "Rejected product mutation.");
    return Err(e);
  }
  Ok(StepControl::Continue)
}

/// Validates the form and, when present, the image, before anything is written.
pub async fn validate_submission<T: SubmissionCtx>(ctx: ContextData<T>) -> Result<StepControl, CatalogError> {
  let mut guard = ctx.write();
  let fields = guard.submission().form.validate()?;
  if let Some(image) = &guard.submission().image {
    guard.deps().images.check(image)?;
  }
  guard.submission_mut().fields = Some(fields);
  Ok(StepControl::Continue)
}

/// Writes the uploaded image and records its public path.
pub async fn store_image<T: SubmissionCtx>(ctx: ContextData<T>) -> Result<StepControl, CatalogError> {
  let (images, upload) = {
    let mut guard = ctx.write();
    let images = guard.deps().images.clone();
    (images, guard.submission_mut().image.take())
  };
  let Some(upload) = upload else {
    return Ok(StepControl::Continue);
  };

  let public_path = images.save(&upload).await?;
  info!(%public_path, "Stored product image.");
  ctx.write().submission_mut().stored_image = Some(public_path);
  Ok(StepControl::Continue)
}

/// Removes an image written earlier in a run whose record write failed.
#[instrument(name = "common_step::discard_stored_image", skip(deps))]
pub async fn discard_stored_image(deps: &CatalogDeps, public_path: &str) {
  if let Err(e) = deps.images.remove(public_path).await {
    warn!(error = %e, "Could not discard image after failed write.");
  }
}
