// catalog_core/src/product.rs

//! The catalog's single entity and the form it is created and updated from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CatalogError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub price: f64,
  pub category: String,
  pub description: Option<String>,
  pub stock: Option<i32>,
  /// Public relative path under `/uploads`, `None` when no image was uploaded.
  pub image: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// A brand-new record with a fresh identifier and creation time.
  pub fn create(fields: ProductFields, image: Option<String>) -> Self {
    let now = Utc::now();
    Self {
      id: Uuid::new_v4(),
      name: fields.name,
      price: fields.price,
      category: fields.category,
      description: fields.description,
      stock: fields.stock,
      image,
      created_at: now,
      updated_at: now,
    }
  }

  /// Replaces every editable field. The image is only swapped when a new one
  /// is supplied; identity and creation time never change.
  pub fn apply(&self, fields: ProductFields, new_image: Option<String>) -> Self {
    Self {
      id: self.id,
      name: fields.name,
      price: fields.price,
      category: fields.category,
      description: fields.description,
      stock: fields.stock,
      image: new_image.or_else(|| self.image.clone()),
      created_at: self.created_at,
      updated_at: Utc::now(),
    }
  }

  /// Case-insensitive substring match over name, category and description.
  /// `needle` must already be lowercased.
  pub fn matches_search(&self, needle: &str) -> bool {
    if needle.is_empty() {
      return true;
    }
    self.name.to_lowercase().contains(needle)
      || self.category.to_lowercase().contains(needle)
      || self
        .description
        .as_deref()
        .map_or(false, |d| d.to_lowercase().contains(needle))
  }
}

/// Raw, unvalidated form values as they arrive from a client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductForm {
  pub name: Option<String>,
  pub price: Option<String>,
  pub category: Option<String>,
  pub description: Option<String>,
  pub stock: Option<String>,
}

/// Validated field values of a product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
  pub name: String,
  pub price: f64,
  pub category: String,
  pub description: Option<String>,
  pub stock: Option<i32>,
}

fn non_blank(value: &Option<String>) -> Option<String> {
  value
    .as_deref()
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_string)
}

impl ProductForm {
  pub fn validate(&self) -> Result<ProductFields, CatalogError> {
    let name = non_blank(&self.name);
    let price = non_blank(&self.price);
    let category = non_blank(&self.category);

    let missing: Vec<&str> = [("name", &name), ("price", &price), ("category", &category)]
      .iter()
      .filter(|(_, v)| v.is_none())
      .map(|(field, _)| *field)
      .collect();
    if !missing.is_empty() {
      return Err(CatalogError::Validation(format!(
        "Missing required fields: {}",
        missing.join(", ")
      )));
    }

    let price = price
      .as_deref()
      .unwrap_or_default()
      .parse::<f64>()
      .ok()
      .filter(|p| p.is_finite() && *p >= 0.0)
      .ok_or_else(|| CatalogError::Validation("Price must be a non-negative number".to_string()))?;

    let stock = match non_blank(&self.stock) {
      None => None,
      Some(raw) => Some(
        raw
          .parse::<i32>()
          .ok()
          .filter(|s| *s >= 0)
          .ok_or_else(|| CatalogError::Validation("Stock must be a non-negative integer".to_string()))?,
      ),
    };

    Ok(ProductFields {
      name: name.unwrap_or_default(),
      price,
      category: category.unwrap_or_default(),
      description: non_blank(&self.description),
      stock,
    })
  }
}

/// An uploaded image file as received from the client.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
  pub file_name: String,
  pub content_type: Option<String>,
  pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ImageUpload")
      .field("file_name", &self.file_name)
      .field("content_type", &self.content_type)
      .field("len", &self.bytes.len())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form(name: &str, price: &str, category: &str) -> ProductForm {
    ProductForm {
      name: Some(name.to_string()),
      price: Some(price.to_string()),
      category: Some(category.to_string()),
      ..Default::default()
    }
  }

  #[test]
  fn validate_reports_every_missing_field() {
    let err = ProductForm::default().validate().unwrap_err();
    match err {
      CatalogError::Validation(msg) => assert_eq!(msg, "Missing required fields: name, price, category"),
      other => panic!("expected validation error, got {other:?}"),
    }

    let err = form("Widget", "  ", "Tools").validate().unwrap_err();
    assert!(err.to_string().contains("price"));
  }

  #[test]
  fn validate_parses_numbers_and_blanks() {
    let mut f = form(" Widget ", "9.99", "Tools");
    f.stock = Some("5".to_string());
    f.description = Some("".to_string());
    let fields = f.validate().unwrap();
    assert_eq!(fields.name, "Widget");
    assert_eq!(fields.price, 9.99);
    assert_eq!(fields.stock, Some(5));
    assert_eq!(fields.description, None);

    // zero is a legitimate price
    assert_eq!(form("Free", "0", "Promo").validate().unwrap().price, 0.0);
  }

  #[test]
  fn validate_rejects_bad_numbers() {
    assert!(form("Widget", "abc", "Tools").validate().is_err());
    assert!(form("Widget", "-1", "Tools").validate().is_err());
    assert!(form("Widget", "NaN", "Tools").validate().is_err());

    let mut f = form("Widget", "1", "Tools");
    f.stock = Some("2.5".to_string());
    assert!(matches!(f.validate(), Err(CatalogError::Validation(_))));
  }

  #[test]
  fn apply_preserves_identity_and_image() {
    let original = Product::create(form("Widget", "1", "Tools").validate().unwrap(), Some("/uploads/products/a.png".into()));
    let updated = original.apply(form("Gadget", "2", "Toys").validate().unwrap(), None);
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.name, "Gadget");
    assert_eq!(updated.image.as_deref(), Some("/uploads/products/a.png"));

    let replaced = original.apply(form("Widget", "1", "Tools").validate().unwrap(), Some("/uploads/products/b.png".into()));
    assert_eq!(replaced.image.as_deref(), Some("/uploads/products/b.png"));
  }

  #[test]
  fn search_matches_any_text_field() {
    let mut fields = form("Blue Widget", "1", "Tools").validate().unwrap();
    fields.description = Some("Stainless STEEL".to_string());
    let product = Product::create(fields, None);
    assert!(product.matches_search("widget"));
    assert!(product.matches_search("tool"));
    assert!(product.matches_search("steel"));
    assert!(product.matches_search(""));
    assert!(!product.matches_search("hammer"));
  }

  #[test]
  fn search_folds_non_ascii_case() {
    let product = Product::create(form("ÉCLAIR Tin", "1", "Pâtisserie").validate().unwrap(), None);
    assert!(product.matches_search("éclair"));
    assert!(product.matches_search("pâtis"));
    assert!(!product.matches_search("eclair"));
  }

  #[test]
  fn serializes_camel_case() {
    let product = Product::create(form("Widget", "1", "Tools").validate().unwrap(), None);
    let json = serde_json::to_value(&product).unwrap();
    assert!(json.get("createdAt").is_some());
    assert!(json.get("image").unwrap().is_null());
  }
}
