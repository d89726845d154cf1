// catalog_core/src/repository.rs

//! Persistence seam for products.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::CatalogError;
use crate::product::Product;
use crate::query::{ListQuery, ProductSlice};

/// Storage of product records.
///
/// Listing orders by `created_at` descending (newest first), breaking ties by
/// `id` descending so pages are stable between calls.
#[async_trait]
pub trait ProductRepository: Send + Sync {
  /// Returns the page selected by `query` and the total number of matches.
  async fn list(&self, query: &ListQuery) -> Result<ProductSlice, CatalogError>;

  async fn get(&self, id: Uuid) -> Result<Option<Product>, CatalogError>;

  async fn insert(&self, product: &Product) -> Result<(), CatalogError>;

  /// Overwrites an existing record. Returns `false` when no record has
  /// `product.id`.
  async fn update(&self, product: &Product) -> Result<bool, CatalogError>;

  /// Removes a record, returning it when it existed.
  async fn delete(&self, id: Uuid) -> Result<Option<Product>, CatalogError>;
}

/// Process-local repository, used by tests and for running without a database.
#[derive(Debug, Default)]
pub struct InMemoryProductRepository {
  products: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryProductRepository {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.products.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.products.read().is_empty()
  }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
  #[instrument(name = "memory_repo::list", skip(self), fields(page = query.page, limit = query.limit))]
  async fn list(&self, query: &ListQuery) -> Result<ProductSlice, CatalogError> {
    let filter = query.filter();
    let mut matches: Vec<Product> = {
      let guard = self.products.read();
      guard.values().filter(|p| filter.matches(p)).cloned().collect()
    };
    matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

    let total = matches.len() as u64;
    let products = matches
      .into_iter()
      .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
      .take(query.limit as usize)
      .collect::<Vec<_>>();
    debug!(total, returned = products.len(), "Listed products from memory.");
    Ok(ProductSlice { products, total })
  }

  async fn get(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    Ok(self.products.read().get(&id).cloned())
  }

  async fn insert(&self, product: &Product) -> Result<(), CatalogError> {
    let mut guard = self.products.write();
    if guard.contains_key(&product.id) {
      return Err(CatalogError::storage(
        "inserting product",
        anyhow::anyhow!("duplicate product id {}", product.id),
      ));
    }
    guard.insert(product.id, product.clone());
    Ok(())
  }

  async fn update(&self, product: &Product) -> Result<bool, CatalogError> {
    let mut guard = self.products.write();
    match guard.get_mut(&product.id) {
      Some(existing) => {
        *existing = product.clone();
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    Ok(self.products.write().remove(&id))
  }
}
