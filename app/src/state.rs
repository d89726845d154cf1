// catalog_app/src/state.rs
use crate::config::AppConfig;
use catalog_core::{AuthGate, ProductService};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub catalog: Arc<ProductService>,
  pub auth: Arc<dyn AuthGate>,
  pub config: Arc<AppConfig>, // Share loaded config
}
