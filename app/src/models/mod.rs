// catalog_app/src/models/mod.rs

//! Row types read from the database.

pub mod product;

pub use product::ProductRow;
