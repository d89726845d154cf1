// catalog_app/src/web/forms.rs

//! Reads the multipart product form: text fields plus an optional `image` file.

use actix_multipart::{Field, Multipart};
use catalog_core::{CatalogError, ImageUpload, ProductForm};
use futures_util::TryStreamExt;
use tracing::{debug, instrument};

use crate::errors::AppError;

pub const IMAGE_FIELD: &str = "image";
pub const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// Reads a field body, failing as soon as it grows past `limit`.
async fn read_limited(field: &mut Field, limit: usize, too_large: impl Fn() -> CatalogError) -> Result<Vec<u8>, AppError> {
  let mut bytes = Vec::new();
  while let Some(chunk) = field.try_next().await? {
    if bytes.len() + chunk.len() > limit {
      return Err(too_large().into());
    }
    bytes.extend_from_slice(&chunk);
  }
  Ok(bytes)
}

/// Collects the form. Unknown fields are drained and ignored; a file part
/// with no file name (nothing selected in the browser) counts as no image.
#[instrument(name = "forms::read_product_form", skip(payload), err(Display))]
pub async fn read_product_form(
  mut payload: Multipart,
  max_image_bytes: usize,
) -> Result<(ProductForm, Option<ImageUpload>), AppError> {
  let mut form = ProductForm::default();
  let mut image = None;

  while let Some(mut field) = payload.try_next().await? {
    let name = field.name().unwrap_or_default().to_string();

    if name == IMAGE_FIELD {
      let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .unwrap_or_default()
        .to_string();
      let content_type = field.content_type().map(|m| m.to_string());
      let bytes = read_limited(&mut field, max_image_bytes, || {
        CatalogError::PayloadTooLarge(format!("Image exceeds the {} byte limit", max_image_bytes))
      })
      .await?;
      if file_name.is_empty() && bytes.is_empty() {
        continue;
      }
      if image.is_none() {
        image = Some(ImageUpload {
          file_name,
          content_type,
          bytes,
        });
      }
      continue;
    }

    let slot = match name.as_str() {
      "name" => &mut form.name,
      "price" => &mut form.price,
      "category" => &mut form.category,
      "description" => &mut form.description,
      "stock" => &mut form.stock,
      other => {
        debug!(field = other, "Ignoring unknown form field.");
        while field.try_next().await?.is_some() {}
        continue;
      }
    };
    let bytes = read_limited(&mut field, MAX_TEXT_FIELD_BYTES, || {
      CatalogError::PayloadTooLarge(format!("Field '{}' is too long", name))
    })
    .await?;
    let text = String::from_utf8(bytes)
      .map_err(|_| CatalogError::Validation(format!("Field '{}' must be valid UTF-8 text", name)))?;
    *slot = Some(text);
  }

  Ok((form, image))
}
