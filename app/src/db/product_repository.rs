// catalog_app/src/db/product_repository.rs

use async_trait::async_trait;
use catalog_core::{CatalogError, ListQuery, Product, ProductRepository, ProductSlice};
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::models::ProductRow;

const PRODUCT_COLUMNS: &str = "id, name, price, category, description, stock, image, created_at, updated_at";

// $1 is the escaped LIKE pattern, NULL for "no search". Both sides go through
// lower() so matching follows the same lowercase mapping as the in-memory store.
const SEARCH_CLAUSE: &str = r"($1::text IS NULL
  OR lower(name) LIKE lower($1) ESCAPE '\'
  OR lower(category) LIKE lower($1) ESCAPE '\'
  OR lower(description) LIKE lower($1) ESCAPE '\')";

fn db_failure(action: &'static str) -> impl FnOnce(sqlx::Error) -> CatalogError {
  move |e| CatalogError::storage(action, e)
}

#[derive(Debug, Clone)]
pub struct PgProductRepository {
  pool: PgPool,
}

impl PgProductRepository {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Creates the `products` table when it does not exist yet. Existing tables
  /// are left untouched.
  #[instrument(name = "pg_repo::ensure_schema", skip(self), err(Display))]
  pub async fn ensure_schema(&self) -> Result<(), CatalogError> {
    sqlx::query(
      "CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
        category TEXT NOT NULL,
        description TEXT NULL,
        stock INTEGER NULL CHECK (stock >= 0),
        image TEXT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
      )",
    )
    .execute(&self.pool)
    .await
    .map_err(db_failure("creating products table"))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS products_created_at_idx ON products (created_at DESC, id DESC)")
      .execute(&self.pool)
      .await
      .map_err(db_failure("creating products index"))?;

    info!("Products schema ready.");
    Ok(())
  }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
  /// Count and page come from the same snapshot, so `total` always agrees
  /// with the rows returned.
  #[instrument(name = "pg_repo::list", skip(self), fields(page = query.page, limit = query.limit), err(Display))]
  async fn list(&self, query: &ListQuery) -> Result<ProductSlice, CatalogError> {
    let pattern = query.filter().like_pattern();
    let offset = i64::try_from(query.offset()).unwrap_or(i64::MAX);

    let mut tx = self.pool.begin().await.map_err(db_failure("opening list transaction"))?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
      .execute(&mut *tx)
      .await
      .map_err(db_failure("setting isolation level"))?;

    let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products WHERE {}", SEARCH_CLAUSE))
      .bind(pattern.as_deref())
      .fetch_one(&mut *tx)
      .await
      .map_err(db_failure("counting products"))?;

    let rows: Vec<ProductRow> = sqlx::query_as(&format!(
      "SELECT {} FROM products WHERE {} ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
      PRODUCT_COLUMNS, SEARCH_CLAUSE
    ))
    .bind(pattern.as_deref())
    .bind(i64::from(query.limit))
    .bind(offset)
    .fetch_all(&mut *tx)
    .await
    .map_err(db_failure("listing products"))?;

    tx.commit().await.map_err(db_failure("closing list transaction"))?;

    debug!(total, returned = rows.len(), "Listed products from database.");
    Ok(ProductSlice {
      products: rows.into_iter().map(Product::from).collect(),
      total: u64::try_from(total).unwrap_or(0),
    })
  }

  #[instrument(name = "pg_repo::get", skip(self), err(Display))]
  async fn get(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    let row: Option<ProductRow> =
      sqlx::query_as(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_failure("fetching product"))?;
    Ok(row.map(Product::from))
  }

  #[instrument(name = "pg_repo::insert", skip(self, product), fields(product_id = %product.id), err(Display))]
  async fn insert(&self, product: &Product) -> Result<(), CatalogError> {
    sqlx::query(&format!(
      "INSERT INTO products ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
      PRODUCT_COLUMNS
    ))
    .bind(product.id)
    .bind(&product.name)
    .bind(product.price)
    .bind(&product.category)
    .bind(product.description.as_deref())
    .bind(product.stock)
    .bind(product.image.as_deref())
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&self.pool)
    .await
    .map_err(db_failure("inserting product"))?;
    Ok(())
  }

  #[instrument(name = "pg_repo::update", skip(self, product), fields(product_id = %product.id), err(Display))]
  async fn update(&self, product: &Product) -> Result<bool, CatalogError> {
    let result = sqlx::query(
      "UPDATE products
       SET name = $2, price = $3, category = $4, description = $5, stock = $6, image = $7, updated_at = $8
       WHERE id = $1",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(product.price)
    .bind(&product.category)
    .bind(product.description.as_deref())
    .bind(product.stock)
    .bind(product.image.as_deref())
    .bind(product.updated_at)
    .execute(&self.pool)
    .await
    .map_err(db_failure("updating product"))?;
    Ok(result.rows_affected() == 1)
  }

  #[instrument(name = "pg_repo::delete", skip(self), err(Display))]
  async fn delete(&self, id: Uuid) -> Result<Option<Product>, CatalogError> {
    let row: Option<ProductRow> =
      sqlx::query_as(&format!("DELETE FROM products WHERE id = $1 RETURNING {}", PRODUCT_COLUMNS))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_failure("deleting product"))?;
    Ok(row.map(Product::from))
  }
}
