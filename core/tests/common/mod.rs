// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use catalog_core::{
  CatalogError, Identity, ImageStore, ImageUpload, InMemoryProductRepository, ListQuery, Product, ProductForm,
  ProductRepository, ProductService, ProductSlice, Role,
};
use catalog_core::{ContextData, StepControl, WorkflowError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;
use tempfile::TempDir;
use tracing::Level;

// --- Workflow fixtures ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Workflow framework error: {0}")]
  Workflow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<WorkflowError> for TestError {
  fn from(we: WorkflowError) -> Self {
    TestError::Workflow(format!("{:?}", we))
  }
}

pub async fn record_step(
  ctx: ContextData<TestContext>,
  step_name: &'static str,
  message: &'static str,
) -> Result<StepControl, TestError> {
  let mut guard = ctx.write();
  guard.counter += 1;
  guard.message.push_str(message);
  guard.steps_executed.push(step_name.to_string());
  if guard.should_stop_at.as_deref() == Some(step_name) {
    return Ok(StepControl::Stop);
  }
  Ok(StepControl::Continue)
}

pub async fn fail_step(ctx: ContextData<TestContext>, step_name: &'static str) -> Result<StepControl, TestError> {
  ctx.write().steps_executed.push(step_name.to_string());
  Err(TestError::Handler(format!("{step_name} failed")))
}

// --- Catalog fixtures ---
pub struct Catalog {
  pub service: ProductService,
  pub repository: Arc<InMemoryProductRepository>,
  pub images: Arc<ImageStore>,
  // Held so the upload directory outlives the test.
  pub upload_dir: TempDir,
}

impl Catalog {
  /// Number of files currently under the product image directory.
  pub fn stored_files(&self) -> usize {
    std::fs::read_dir(self.upload_dir.path().join("products"))
      .expect("image dir")
      .count()
  }
}

pub async fn catalog() -> Catalog {
  catalog_with(64 * 1024).await
}

pub async fn catalog_with(max_image_bytes: usize) -> Catalog {
  let repository = Arc::new(InMemoryProductRepository::new());
  build_catalog(repository.clone(), repository, max_image_bytes).await
}

/// A catalog whose record writes can be made to fail on demand.
pub async fn faulty_catalog() -> (Catalog, Arc<FaultyRepository>) {
  let inner = Arc::new(InMemoryProductRepository::new());
  let faulty = Arc::new(FaultyRepository::new(inner.clone()));
  (build_catalog(faulty.clone(), inner, 64 * 1024).await, faulty)
}

async fn build_catalog(
  service_repo: Arc<dyn ProductRepository>,
  repository: Arc<InMemoryProductRepository>,
  max_image_bytes: usize,
) -> Catalog {
  let upload_dir = tempfile::tempdir().expect("temp dir");
  let images = Arc::new(ImageStore::new(upload_dir.path(), max_image_bytes));
  images.init().await.expect("image store init");
  let service = ProductService::new(service_repo, images.clone()).expect("service");
  Catalog {
    service,
    repository,
    images,
    upload_dir,
  }
}

/// Delegates to an in-memory repository unless a fault is switched on.
pub struct FaultyRepository {
  inner: Arc<InMemoryProductRepository>,
  pub fail_insert: AtomicBool,
  pub fail_update: AtomicBool,
  /// `update` reports the record as gone, like a concurrent delete.
  pub lose_on_update: AtomicBool,
}

impl FaultyRepository {
  pub fn new(inner: Arc<InMemoryProductRepository>) -> Self {
    Self {
      inner,
      fail_insert: AtomicBool::new(false),
      fail_update: AtomicBool::new(false),
      lose_on_update: AtomicBool::new(false),
    }
  }

  fn down(action: &str) -> CatalogError {
    CatalogError::storage(action.to_string(), anyhow::anyhow!("db down"))
  }
}

#[async_trait]
impl ProductRepository for FaultyRepository {
  async fn list(&self, query: &ListQuery) -> Result<ProductSlice, CatalogError> {
    self.inner.list(query).await
  }

  async fn get(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    self.inner.get(id).await
  }

  async fn insert(&self, product: &Product) -> Result<(), CatalogError> {
    if self.fail_insert.load(Ordering::SeqCst) {
      return Err(Self::down("insert"));
    }
    self.inner.insert(product).await
  }

  async fn update(&self, product: &Product) -> Result<bool, CatalogError> {
    if self.fail_update.load(Ordering::SeqCst) {
      return Err(Self::down("update"));
    }
    if self.lose_on_update.load(Ordering::SeqCst) {
      return Ok(false);
    }
    self.inner.update(product).await
  }

  async fn delete(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    self.inner.delete(id).await
  }
}

pub fn admin() -> Identity {
  Identity::new("ops@example.com", Role::Admin)
}

pub fn shopper() -> Identity {
  Identity::new("jo@example.com", Role::User)
}

pub fn form(name: &str, price: &str, category: &str) -> ProductForm {
  ProductForm {
    name: Some(name.to_string()),
    price: Some(price.to_string()),
    category: Some(category.to_string()),
    description: None,
    stock: None,
  }
}

pub fn png(name: &str) -> ImageUpload {
  ImageUpload {
    file_name: name.to_string(),
    content_type: Some("image/png".to_string()),
    bytes: vec![0x89, b'P', b'N', b'G', 1, 2, 3, 4],
  }
}

// --- Tracing ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
