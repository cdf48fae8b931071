//! # Catalog Sample
//!
//! An item catalog built on `mediator-framework`, exposed as a library for integration
//! testing.
//!
//! ## Core Components
//!
//! - **[model]**: [`Item`](model::Item) and the requests/notifications about it.
//! - **[store]**: In-memory [`ItemStore`](store::ItemStore).
//! - **[handlers]**: One request handler per catalog operation.
//! - **[validation]**: Validators run by `ValidationBehavior` before the handlers.
//! - **[listeners]**: [`AuditLog`](listeners::AuditLog) and [`SearchIndex`](listeners::SearchIndex), reacting to events.
//! - **[clients]**: [`CatalogClient`](clients::CatalogClient), the API callers use.
//! - **[lifecycle]**: [`CatalogSystem`](lifecycle::CatalogSystem), which wires it all together.

pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod listeners;
pub mod model;
pub mod store;
pub mod validation;
