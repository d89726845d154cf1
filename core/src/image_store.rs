// catalog_core/src/image_store.rs

//! Directory-backed storage for uploaded product images.
//!
//! Files live under `<root>/products/` and are referenced from product
//! records by their public path, `/uploads/products/<file>`. Every stored
//! file gets a generated name, so concurrent uploads never collide.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::CatalogError;
use crate::product::ImageUpload;

pub const PUBLIC_PREFIX: &str = "/uploads";
pub const PRODUCT_IMAGE_DIR: &str = "products";
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ImageStore {
  root: PathBuf,
  max_bytes: usize,
}

impl ImageStore {
  pub fn new(root: impl Into<PathBuf>, max_bytes: usize) -> Self {
    Self {
      root: root.into(),
      max_bytes,
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn max_bytes(&self) -> usize {
    self.max_bytes
  }

  /// Creates the storage directories if they are missing.
  pub async fn init(&self) -> Result<(), CatalogError> {
    let dir = self.root.join(PRODUCT_IMAGE_DIR);
    fs::create_dir_all(&dir)
      .await
      .map_err(|e| CatalogError::storage(format!("creating image directory {}", dir.display()), e))?;
    info!(root = %self.root.display(), "Image store ready.");
    Ok(())
  }

  fn extension_of(file_name: &str) -> Result<String, CatalogError> {
    let ext = Path::new(file_name)
      .extension()
      .and_then(|e| e.to_str())
      .map(str::to_ascii_lowercase)
      .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
      Ok(ext)
    } else {
      Err(CatalogError::Validation(format!(
        "Unsupported image type '{}'; allowed: {}",
        file_name,
        ALLOWED_EXTENSIONS.join(", ")
      )))
    }
  }

  /// Checks an upload without touching the disk.
  pub fn check(&self, upload: &ImageUpload) -> Result<(), CatalogError> {
    if upload.bytes.is_empty() {
      return Err(CatalogError::Validation("Uploaded image is empty".to_string()));
    }
    if upload.bytes.len() > self.max_bytes {
      return Err(CatalogError::PayloadTooLarge(format!(
        "Image exceeds the {} byte limit",
        self.max_bytes
      )));
    }
    Self::extension_of(&upload.file_name).map(|_| ())
  }

  /// Writes the upload under a generated unique name and returns its public path.
  #[instrument(name = "image_store::save", skip(self, upload), fields(file_name = %upload.file_name, len = upload.bytes.len()))]
  pub async fn save(&self, upload: &ImageUpload) -> Result<String, CatalogError> {
    self.check(upload)?;
    let ext = Self::extension_of(&upload.file_name)?;
    let file_name = format!("{}-{}.{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple(), ext);
    let path = self.root.join(PRODUCT_IMAGE_DIR).join(&file_name);

    fs::write(&path, &upload.bytes)
      .await
      .map_err(|e| CatalogError::storage(format!("writing image {}", path.display()), e))?;

    let public_path = format!("{}/{}/{}", PUBLIC_PREFIX, PRODUCT_IMAGE_DIR, file_name);
    debug!(%public_path, "Stored image.");
    Ok(public_path)
  }

  /// Maps a public path back to a file under the root. Paths outside
  /// `/uploads` or containing `..` are rejected.
  pub fn resolve(&self, public_path: &str) -> Result<PathBuf, CatalogError> {
    let invalid = || CatalogError::Validation(format!("Invalid image path '{}'", public_path));
    let relative = public_path
      .strip_prefix(PUBLIC_PREFIX)
      .and_then(|rest| rest.strip_prefix('/'))
      .ok_or_else(invalid)?;

    let relative = Path::new(relative);
    let is_plain = relative.components().all(|c| matches!(c, Component::Normal(_)));
    if !is_plain || relative.as_os_str().is_empty() {
      return Err(invalid());
    }
    Ok(self.root.join(relative))
  }

  pub async fn exists(&self, public_path: &str) -> bool {
    match self.resolve(public_path) {
      Ok(path) => fs::try_exists(path).await.unwrap_or(false),
      Err(_) => false,
    }
  }

  /// Deletes the file behind `public_path`. Returns `false` when it was
  /// already gone.
  #[instrument(name = "image_store::remove", skip(self))]
  pub async fn remove(&self, public_path: &str) -> Result<bool, CatalogError> {
    let path = self.resolve(public_path)?;
    match fs::remove_file(&path).await {
      Ok(()) => {
        debug!("Removed image file.");
        Ok(true)
      }
      Err(e) if e.kind() == ErrorKind::NotFound => {
        warn!("Image file already missing.");
        Ok(false)
      }
      Err(e) => Err(CatalogError::storage(format!("removing image {}", path.display()), e)),
    }
  }
}
