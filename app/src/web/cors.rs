// catalog_app/src/web/cors.rs

use actix_cors::Cors;
use actix_web::http::header;

use crate::config::{CorsMode, CorsSettings};

const MAX_AGE_SECS: usize = 3600;

/// Builds the CORS middleware for one worker. Credentials are allowed so the
/// browser client can send its `token` cookie.
pub fn build_cors(settings: &CorsSettings) -> Cors {
  let base = Cors::default()
    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
    .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
    .supports_credentials()
    .max_age(MAX_AGE_SECS);

  match settings.mode {
    CorsMode::Static => settings
      .allowed_origins
      .iter()
      .fold(base, |cors, origin| cors.allowed_origin(origin)),
    CorsMode::DynamicOriginCheck => {
      let settings = settings.clone();
      base.allowed_origin_fn(move |origin, _req_head| {
        origin.to_str().map(|o| settings.allows(o)).unwrap_or(false)
      })
    }
  }
}
