// catalog_core/src/service/contexts.rs

//! Data carried through the product workflows. Handlers receive these wrapped
//! in `ContextData`.

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::Identity;
use crate::image_store::ImageStore;
use crate::product::{ImageUpload, Product, ProductFields, ProductForm};
use crate::repository::ProductRepository;

/// Collaborators every workflow step may reach.
#[derive(Clone)]
pub struct CatalogDeps {
  pub repository: Arc<dyn ProductRepository>,
  pub images: Arc<ImageStore>,
}

/// What the client sent for a create or an update, and what validation and
/// image storage made of it.
#[derive(Debug, Default)]
pub struct Submission {
  pub form: ProductForm,
  pub image: Option<ImageUpload>,
  pub fields: Option<ProductFields>,
  /// Public path of the image written during this run, if any.
  pub stored_image: Option<String>,
}

impl Submission {
  pub fn new(form: ProductForm, image: Option<ImageUpload>) -> Self {
    Self {
      form,
      image,
      ..Default::default()
    }
  }
}

pub trait MutationCtx: Send + Sync + 'static {
  fn deps(&self) -> &CatalogDeps;
  fn identity(&self) -> &Identity;
}

pub trait SubmissionCtx: MutationCtx {
  fn submission(&self) -> &Submission;
  fn submission_mut(&mut self) -> &mut Submission;
}

pub struct CreateProductCtx {
  pub deps: CatalogDeps,
  pub identity: Identity,
  pub submission: Submission,
  pub created: Option<Product>,
}

pub struct UpdateProductCtx {
  pub deps: CatalogDeps,
  pub identity: Identity,
  pub product_id: Uuid,
  pub submission: Submission,
  pub existing: Option<Product>,
  pub updated: Option<Product>,
  /// Image path the update replaced; removed once the new record is saved.
  pub superseded_image: Option<String>,
}

pub struct DeleteProductCtx {
  pub deps: CatalogDeps,
  pub identity: Identity,
  pub product_id: Uuid,
  pub removed: Option<Product>,
}

macro_rules! mutation_ctx {
  ($ty:ty) => {
    impl MutationCtx for $ty {
      fn deps(&self) -> &CatalogDeps {
        &self.deps
      }

      fn identity(&self) -> &Identity {
        &self.identity
      }
    }
  };
}

mutation_ctx!(CreateProductCtx);
mutation_ctx!(UpdateProductCtx);
mutation_ctx!(DeleteProductCtx);

impl SubmissionCtx for CreateProductCtx {
  fn submission(&self) -> &Submission {
    &self.submission
  }

  fn submission_mut(&mut self) -> &mut Submission {
    &mut self.submission
  }
}

impl SubmissionCtx for UpdateProductCtx {
  fn submission(&self) -> &Submission {
    &self.submission
  }

  fn submission_mut(&mut self) -> &mut Submission {
    &mut self.submission
  }
}
