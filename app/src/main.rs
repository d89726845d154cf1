// catalog_app/src/main.rs

mod config;
mod db;
mod errors;
mod models;
mod services;
mod state;
mod web;

use crate::config::AppConfig;
use crate::db::PgProductRepository;
use crate::errors::Result as AppResult;
use crate::services::ApiKeyGate;
use crate::state::AppState;

use actix_web::{web as actix_data, App, HttpServer};
use catalog_core::image_store::PUBLIC_PREFIX;
use catalog_core::{ImageStore, ProductService};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan; // For span events in tracing

async fn build_state(app_config: Arc<AppConfig>) -> AppResult<AppState> {
  let db_pool = PgPoolOptions::new()
    .max_connections(app_config.database_max_connections)
    .connect(&app_config.database_url)
    .await?;
  tracing::info!("Successfully connected to the database.");

  let repository = PgProductRepository::new(db_pool);
  repository.ensure_schema().await?;

  let images = ImageStore::new(app_config.upload_dir.clone(), app_config.max_image_bytes);
  images.init().await?;

  let gate = ApiKeyGate::new(&app_config.admin_key_hashes, &app_config.user_key_hashes)?;
  tracing::info!(keys = gate.key_count(), "API key gate ready.");

  let catalog = ProductService::new(Arc::new(repository), Arc::new(images))?;

  Ok(AppState {
    catalog: Arc::new(catalog),
    auth: Arc::new(gate),
    config: app_config,
  })
}

/// `catalog_server hash-key <key>` prints the PHC string to put in
/// `ADMIN_API_KEY_HASHES` or `USER_API_KEY_HASHES`.
fn hash_key_command(key: Option<String>) -> std::io::Result<()> {
  let key = key.ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "usage: catalog_server hash-key <key>"))?;
  let hash = services::auth_service::hash_key(&key).map_err(|e| std::io::Error::other(e.to_string()))?;
  println!("{}", hash);
  Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .init();

  let mut args = std::env::args().skip(1);
  if args.next().as_deref() == Some("hash-key") {
    return hash_key_command(args.next());
  }

  tracing::info!("Starting product catalog server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  let app_state = match build_state(app_config.clone()).await {
    Ok(state) => state,
    Err(e) => {
      tracing::error!(error = ?e, "Failed to initialise the application.");
      return Err(std::io::Error::other(e.to_string()));
    }
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone())) // Share AppState with handlers
      .wrap(web::build_cors(&app_state.config.cors))
      .wrap(tracing_actix_web::TracingLogger::default()) // Actix middleware for tracing requests
      .configure(web::configure_app_routes)
      .service(actix_files::Files::new(PUBLIC_PREFIX, app_state.config.upload_dir.clone()))
  })
  .bind(&server_address)?
  .run()
  .await
}
