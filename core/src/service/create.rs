// catalog_core/src/service/create.rs

use tracing::{error, info};

use super::common_steps;
use super::contexts::CreateProductCtx;
use crate::error::{CatalogError, WorkflowError};
use crate::product::Product;
use crate::workflow::{skip_when, ContextData, StepControl, Workflow};

pub const WORKFLOW_NAME: &str = "create_product";

pub fn build_create_workflow() -> Result<Workflow<CreateProductCtx, CatalogError>, WorkflowError> {
  let mut wf = Workflow::<CreateProductCtx, CatalogError>::new(
    WORKFLOW_NAME,
    &[
      ("authorize", false, None),
      ("validate_submission", false, None),
      (
        "store_image",
        false,
        skip_when(|c: &CreateProductCtx| c.submission.image.is_none()),
      ),
      ("insert_product", false, None),
    ],
  )?;

  wf.on("authorize", common_steps::authorize::<CreateProductCtx>)?;
  wf.on("validate_submission", common_steps::validate_submission::<CreateProductCtx>)?;
  wf.on("store_image", common_steps::store_image::<CreateProductCtx>)?;
  wf.on("insert_product", insert_product)?;

  Ok(wf)
}

async fn insert_product(ctx: ContextData<CreateProductCtx>) -> Result<StepControl, CatalogError> {
  let (deps, fields, stored_image) = {
    let guard = ctx.read();
    (
      guard.deps.clone(),
      guard.submission.fields.clone(),
      guard.submission.stored_image.clone(),
    )
  };
  let fields = fields.ok_or(WorkflowError::MissingOutput {
    workflow: WORKFLOW_NAME.to_string(),
    missing: "validated fields",
  })?;

  let product = Product::create(fields, stored_image.clone());
  if let Err(e) = deps.repository.insert(&product).await {
    error!(error = %e, "Failed to insert product.");
    if let Some(path) = stored_image {
      common_steps::discard_stored_image(&deps, &path).await;
    }
    return Err(e);
  }

  info!(product_id = %product.id, name = %product.name, "Product created.");
  ctx.write().created = Some(product);
  Ok(StepControl::Continue)
}
