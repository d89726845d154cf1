// catalog_core/src/service/mod.rs

//! The product service: listing and lookup read the repository directly,
//! every mutation runs through a workflow built once at construction.

pub mod common_steps;
pub mod contexts;
pub mod create;
pub mod delete;
pub mod update;

use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::auth::Identity;
use crate::error::{CatalogError, WorkflowError};
use crate::image_store::ImageStore;
use crate::product::{ImageUpload, Product, ProductForm};
use crate::query::{ListQuery, ProductPage};
use crate::repository::ProductRepository;
use crate::workflow::{ContextData, Workflow, WorkflowOutcome};

pub use contexts::{CatalogDeps, CreateProductCtx, DeleteProductCtx, Submission, UpdateProductCtx};

pub struct ProductService {
  deps: CatalogDeps,
  create_workflow: Workflow<CreateProductCtx, CatalogError>,
  update_workflow: Workflow<UpdateProductCtx, CatalogError>,
  delete_workflow: Workflow<DeleteProductCtx, CatalogError>,
}

/// Runs `workflow` and hands back the context data once it completed.
async fn run_to_completion<T>(
  workflow: &Workflow<T, CatalogError>,
  ctx_data: ContextData<T>,
) -> Result<ContextData<T>, CatalogError>
where
  T: Send + Sync + 'static,
{
  match workflow.run(ctx_data.clone()).await? {
    WorkflowOutcome::Completed => Ok(ctx_data),
    WorkflowOutcome::Stopped => Err(
      WorkflowError::Halted {
        workflow: workflow.name().to_string(),
      }
      .into(),
    ),
  }
}

fn missing_output(workflow: &str, missing: &'static str) -> CatalogError {
  WorkflowError::MissingOutput {
    workflow: workflow.to_string(),
    missing,
  }
  .into()
}

impl ProductService {
  pub fn new(
    repository: Arc<dyn ProductRepository>,
    images: Arc<ImageStore>,
  ) -> Result<Self, CatalogError> {
    Ok(Self {
      deps: CatalogDeps { repository, images },
      create_workflow: create::build_create_workflow()?,
      update_workflow: update::build_update_workflow()?,
      delete_workflow: delete::build_delete_workflow()?,
    })
  }

  pub fn images(&self) -> &ImageStore {
    &self.deps.images
  }

  /// One page of products matching `query`, newest first.
  #[instrument(name = "product_service::list", skip(self), fields(page = query.page, limit = query.limit, search = %query.search))]
  pub async fn list(&self, query: ListQuery) -> Result<ProductPage, CatalogError> {
    let slice = self.deps.repository.list(&query).await?;
    debug!(total = slice.total, returned = slice.products.len(), "Listed products.");
    Ok(ProductPage::from_slice(slice, query.limit))
  }

  #[instrument(name = "product_service::get", skip(self))]
  pub async fn get(&self, id: Uuid) -> Result<Product, CatalogError> {
    self
      .deps
      .repository
      .get(id)
      .await?
      .ok_or_else(CatalogError::product_not_found)
  }

  #[instrument(name = "product_service::create", skip(self, form, image), fields(subject = %identity.subject, has_image = image.is_some()))]
  pub async fn create(
    &self,
    identity: &Identity,
    form: ProductForm,
    image: Option<ImageUpload>,
  ) -> Result<Product, CatalogError> {
    let ctx_data = ContextData::new(CreateProductCtx {
      deps: self.deps.clone(),
      identity: identity.clone(),
      submission: Submission::new(form, image),
      created: None,
    });
    let ctx_data = run_to_completion(&self.create_workflow, ctx_data).await?;
    let created = ctx_data.write().created.take();
    created.ok_or_else(|| missing_output(create::WORKFLOW_NAME, "the created product"))
  }

  #[instrument(name = "product_service::update", skip(self, form, image), fields(subject = %identity.subject, has_image = image.is_some()))]
  pub async fn update(
    &self,
    identity: &Identity,
    id: Uuid,
    form: ProductForm,
    image: Option<ImageUpload>,
  ) -> Result<Product, CatalogError> {
    let ctx_data = ContextData::new(UpdateProductCtx {
      deps: self.deps.clone(),
      identity: identity.clone(),
      product_id: id,
      submission: Submission::new(form, image),
      existing: None,
      updated: None,
      superseded_image: None,
    });
    let ctx_data = run_to_completion(&self.update_workflow, ctx_data).await?;
    let updated = ctx_data.write().updated.take();
    updated.ok_or_else(|| missing_output(update::WORKFLOW_NAME, "the updated product"))
  }

  /// Removes the product and its image file. Returns the removed record.
  #[instrument(name = "product_service::delete", skip(self), fields(subject = %identity.subject))]
  pub async fn delete(&self, identity: &Identity, id: Uuid) -> Result<Product, CatalogError> {
    let ctx_data = ContextData::new(DeleteProductCtx {
      deps: self.deps.clone(),
      identity: identity.clone(),
      product_id: id,
      removed: None,
    });
    let ctx_data = run_to_completion(&self.delete_workflow, ctx_data).await?;
    let removed = ctx_data.write().removed.take();
    removed.ok_or_else(|| missing_output(delete::WORKFLOW_NAME, "the removed product"))
  }
}
