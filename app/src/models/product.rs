// catalog_app/src/models/product.rs

use catalog_core::Product;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of the `products` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
  pub id: Uuid,
  pub name: String,
  pub price: f64,
  pub category: String,
  pub description: Option<String>,
  pub stock: Option<i32>,
  pub image: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
  fn from(row: ProductRow) -> Self {
    Product {
      id: row.id,
      name: row.name,
      price: row.price,
      category: row.category,
      description: row.description,
      stock: row.stock,
      image: row.image,
      created_at: row.created_at,
      updated_at: row.updated_at,
    }
  }
}
