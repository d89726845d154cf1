// catalog_app/src/web/mod.rs

pub mod caller;
pub mod cors;
pub mod forms;
pub mod handlers;
pub mod routes;

pub use cors::build_cors;
pub use routes::configure_app_routes;
