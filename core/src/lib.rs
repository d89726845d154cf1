// src/lib.rs

//! Catalog core: the product domain behind the catalog HTTP service.
//!
//!  - `Product` records with validated fields and an optional image.
//!  - Paginated listing with case-insensitive substring search over name,
//!    category and description.
//!  - A directory-backed `ImageStore` whose files follow their product's
//!    lifecycle (replaced images and deleted products leave no files behind).
//!  - A `ProductRepository` seam, with an in-memory implementation here and a
//!    Postgres one in the server crate.
//!  - An `AuthGate` seam; every mutation re-checks the admin role.
//!  - A small `workflow` engine that runs each mutation as ordered, named steps.

pub mod auth;
pub mod error;
pub mod image_store;
pub mod product;
pub mod query;
pub mod repository;
pub mod service;
pub mod workflow;

pub use crate::auth::{AuthGate, Identity, Role};
pub use crate::error::{CatalogError, WorkflowError};
pub use crate::image_store::ImageStore;
pub use crate::product::{ImageUpload, Product, ProductFields, ProductForm};
pub use crate::query::{ListQuery, ProductPage, ProductSlice, SearchFilter};
pub use crate::repository::{InMemoryProductRepository, ProductRepository};
pub use crate::service::ProductService;
pub use crate::workflow::{ContextData, StepControl, Workflow, WorkflowOutcome};
