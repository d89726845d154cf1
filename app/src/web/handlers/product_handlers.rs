// catalog_app/src/web/handlers/product_handlers.rs

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use catalog_core::{CatalogError, ListQuery};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::caller::Caller;
use crate::web::forms::read_product_form;

/// Raw query string values; normalization happens in `ListQuery`.
#[derive(Deserialize, Debug, Default)]
pub struct ListProductsQuery {
  pub page: Option<String>,
  pub limit: Option<String>,
  pub search: Option<String>,
}

/// A path id that is not a UUID cannot name a product.
fn parse_product_id(raw: &str) -> Result<Uuid, AppError> {
  Uuid::parse_str(raw).map_err(|_| CatalogError::product_not_found().into())
}

#[instrument(name = "handler::list_products", skip(app_state, query_params))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query_params: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let params = query_params.into_inner();
  let query = ListQuery::from_params(params.page.as_deref(), params.limit.as_deref(), params.search.as_deref());
  let page = app_state.catalog.list(query).await?;
  Ok(HttpResponse::Ok().json(page))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = parse_product_id(&path)?;
  let product = app_state.catalog.get(product_id).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::create_product", skip(app_state, caller, payload), fields(subject = %caller.0.subject))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  caller: Caller,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  // Reject before reading a possibly large body.
  caller.0.require_admin()?;
  let (form, image) = read_product_form(payload, app_state.config.max_image_bytes).await?;
  let product = app_state.catalog.create(&caller.0, form, image).await?;
  info!(product_id = %product.id, "Product created.");
  Ok(HttpResponse::Created().json(product))
}

#[instrument(name = "handler::update_product", skip(app_state, caller, path, payload), fields(subject = %caller.0.subject, product_id = %path.as_str()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  caller: Caller,
  path: web::Path<String>,
  payload: Multipart,
) -> Result<HttpResponse, AppError> {
  caller.0.require_admin()?;
  let product_id = parse_product_id(&path)?;
  let (form, image) = read_product_form(payload, app_state.config.max_image_bytes).await?;
  let product = app_state.catalog.update(&caller.0, product_id, form, image).await?;
  info!("Product updated.");
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::delete_product", skip(app_state, caller, path), fields(subject = %caller.0.subject, product_id = %path.as_str()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  caller: Caller,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  caller.0.require_admin()?;
  let product_id = parse_product_id(&path)?;
  app_state.catalog.delete(&caller.0, product_id).await?;
  info!("Product deleted.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Product deleted" })))
}
