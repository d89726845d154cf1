// catalog_core/src/service/delete.rs

use tracing::{info, warn};

use super::common_steps;
use super::contexts::DeleteProductCtx;
use crate::error::{CatalogError, WorkflowError};
use crate::workflow::{skip_when, ContextData, StepControl, Workflow};

pub const WORKFLOW_NAME: &str = "delete_product";

pub fn build_delete_workflow() -> Result<Workflow<DeleteProductCtx, CatalogError>, WorkflowError> {
  let mut wf = Workflow::<DeleteProductCtx, CatalogError>::new(
    WORKFLOW_NAME,
    &[
      ("authorize", false, None),
      ("remove_record", false, None),
      (
        "remove_image",
        true,
        skip_when(|c: &DeleteProductCtx| c.removed.as_ref().and_then(|p| p.image.as_ref()).is_none()),
      ),
    ],
  )?;

  wf.on("authorize", common_steps::authorize::<DeleteProductCtx>)?;
  wf.on("remove_record", remove_record)?;
  wf.on("remove_image", remove_image)?;

  Ok(wf)
}

async fn remove_record(ctx: ContextData<DeleteProductCtx>) -> Result<StepControl, CatalogError> {
  let (deps, product_id) = ctx.snapshot(|c| (c.deps.clone(), c.product_id));
  match deps.repository.delete(product_id).await? {
    Some(removed) => {
      info!(%product_id, "Product record removed.");
      ctx.write().removed = Some(removed);
      Ok(StepControl::Continue)
    }
    None => {
      warn!(%product_id, "Delete target not found.");
      Err(CatalogError::product_not_found())
    }
  }
}

async fn remove_image(ctx: ContextData<DeleteProductCtx>) -> Result<StepControl, CatalogError> {
  let (deps, image) = ctx.snapshot(|c| (c.deps.clone(), c.removed.as_ref().and_then(|p| p.image.clone())));
  if let Some(path) = image {
    if deps.images.remove(&path).await? {
      info!(%path, "Removed product image.");
    }
  }
  Ok(StepControl::Continue)
}
