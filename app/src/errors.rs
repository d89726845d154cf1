// catalog_app/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use catalog_core::CatalogError;
use serde_json::json;
use thiserror::Error;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Malformed multipart body: {0}")]
  Multipart(#[from] actix_multipart::MultipartError),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<CatalogError>() {
      Ok(catalog_err) => AppError::Catalog(catalog_err),
      Err(err) => AppError::Internal(format!("{:#}", err)),
    }
  }
}

impl AppError {
  /// Text safe to show a client. Server-side failures never leak details.
  fn client_message(&self) -> String {
    match self {
      AppError::Catalog(
        CatalogError::Validation(m)
        | CatalogError::NotFound(m)
        | CatalogError::Unauthorized(m)
        | CatalogError::Forbidden(m)
        | CatalogError::PayloadTooLarge(m),
      ) => m.clone(),
      AppError::Multipart(e) => format!("Malformed multipart body: {}", e),
      _ => INTERNAL_ERROR_MESSAGE.to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Catalog(err) => match err {
        CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        CatalogError::Forbidden(_) => StatusCode::FORBIDDEN,
        CatalogError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        CatalogError::Storage { .. } | CatalogError::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
      AppError::Multipart(_) => StatusCode::BAD_REQUEST,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      // Log the full chain; the client only gets the generic message.
      tracing::error!(application_error = ?self, "Responding with error");
    } else {
      tracing::warn!(status = status.as_u16(), application_error = %self, "Rejected request");
    }
    HttpResponse::build(status).json(json!({ "message": self.client_message() }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
