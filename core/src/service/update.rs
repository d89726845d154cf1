// catalog_core/src/service/update.rs

use tracing::{error, info, warn};

use super::common_steps;
use super::contexts::UpdateProductCtx;
use crate::error::{CatalogError, WorkflowError};
use crate::workflow::{skip_when, ContextData, StepControl, Workflow};

pub const WORKFLOW_NAME: &str = "update_product";

pub fn build_update_workflow() -> Result<Workflow<UpdateProductCtx, CatalogError>, WorkflowError> {
  let mut wf = Workflow::<UpdateProductCtx, CatalogError>::new(
    WORKFLOW_NAME,
    &[
      ("authorize", false, None),
      ("load_existing", false, None),
      ("validate_submission", false, None),
      (
        "store_image",
        false,
        skip_when(|c: &UpdateProductCtx| c.submission.image.is_none()),
      ),
      ("save_product", false, None),
      (
        "remove_superseded_image",
        true,
        skip_when(|c: &UpdateProductCtx| c.superseded_image.is_none()),
      ),
    ],
  )?;

  wf.on("authorize", common_steps::authorize::<UpdateProductCtx>)?;
  wf.on("load_existing", load_existing)?;
  wf.on("validate_submission", common_steps::validate_submission::<UpdateProductCtx>)?;
  wf.on("store_image", common_steps::store_image::<UpdateProductCtx>)?;
  wf.on("save_product", save_product)?;
  wf.on("remove_superseded_image", remove_superseded_image)?;

  Ok(wf)
}

async fn load_existing(ctx: ContextData<UpdateProductCtx>) -> Result<StepControl, CatalogError> {
  let (deps, product_id) = ctx.snapshot(|c| (c.deps.clone(), c.product_id));
  match deps.repository.get(product_id).await? {
    Some(existing) => {
      ctx.write().existing = Some(existing);
      Ok(StepControl::Continue)
    }
    None => {
      warn!(%product_id, "Update target not found.");
      Err(CatalogError::product_not_found())
    }
  }
}

async fn save_product(ctx: ContextData<UpdateProductCtx>) -> Result<StepControl, CatalogError> {
  let (deps, existing, fields, stored_image) = {
    let guard = ctx.read();
    (
      guard.deps.clone(),
      guard.existing.clone(),
      guard.submission.fields.clone(),
      guard.submission.stored_image.clone(),
    )
  };
  let missing = |what: &'static str| WorkflowError::MissingOutput {
    workflow: WORKFLOW_NAME.to_string(),
    missing: what,
  };
  let existing = existing.ok_or_else(|| missing("the existing product"))?;
  let fields = fields.ok_or_else(|| missing("validated fields"))?;

  let updated = existing.apply(fields, stored_image.clone());
  let outcome = deps.repository.update(&updated).await;
  let saved = match outcome {
    Ok(saved) => saved,
    Err(e) => {
      error!(error = %e, product_id = %updated.id, "Failed to save product.");
      if let Some(path) = &stored_image {
        common_steps::discard_stored_image(&deps, path).await;
      }
      return Err(e);
    }
  };
  if !saved {
    // Deleted between load and save.
    if let Some(path) = &stored_image {
      common_steps::discard_stored_image(&deps, path).await;
    }
    return Err(CatalogError::product_not_found());
  }

  info!(product_id = %updated.id, "Product updated.");
  let superseded = match (&existing.image, &stored_image) {
    (Some(old), Some(new)) if old != new => Some(old.clone()),
    _ => None,
  };
  let mut guard = ctx.write();
  guard.superseded_image = superseded;
  guard.updated = Some(updated);
  Ok(StepControl::Continue)
}

async fn remove_superseded_image(ctx: ContextData<UpdateProductCtx>) -> Result<StepControl, CatalogError> {
  let (deps, superseded) = ctx.snapshot(|c| (c.deps.clone(), c.superseded_image.clone()));
  if let Some(path) = superseded {
    deps.images.remove(&path).await?;
    info!(%path, "Removed superseded product image.");
  }
  Ok(StepControl::Continue)
}
