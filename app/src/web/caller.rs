// catalog_app/src/web/caller.rs

use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use catalog_core::Identity;
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub const TOKEN_COOKIE: &str = "token";

/// The identity behind a request, resolved through the configured `AuthGate`.
///
/// Requests without a credential become guests; role checks happen in the
/// product service.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

/// `Authorization: Bearer <key>` wins over the `token` cookie.
pub fn credential_of(req: &HttpRequest) -> Option<String> {
  let bearer = req
    .headers()
    .get(AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|token| !token.is_empty())
    .map(str::to_string);

  bearer.or_else(|| req.cookie(TOKEN_COOKIE).map(|c| c.value().to_string()))
}

impl FromRequest for Caller {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let credential = credential_of(req);
    let state = req.app_data::<web::Data<AppState>>().cloned();

    Box::pin(async move {
      let state = state.ok_or_else(|| {
        warn!("Caller extractor: AppState is not registered.");
        AppError::Internal("Application state missing".to_string())
      })?;
      let identity = state.auth.identify(credential.as_deref()).await?;
      Ok(Caller(identity))
    })
  }
}
