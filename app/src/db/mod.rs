// catalog_app/src/db/mod.rs

//! Postgres-backed persistence.

pub mod product_repository;

pub use product_repository::PgProductRepository;
