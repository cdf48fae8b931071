//! # Domain Clients
//!
//! Type-safe wrappers that hide the mediator behind catalog-specific methods.

pub mod catalog_client;

pub use catalog_client::CatalogClient;
