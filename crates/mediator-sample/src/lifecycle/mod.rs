//! # System Wiring
//!
//! Builds the whole catalog in one place: store, handlers, behaviors, listeners,
//! registry, mediator and client.
//!
//! ## The CatalogSystem Pattern
//!
//! ```rust,ignore
//! let system = CatalogSystem::new(CatalogConfig::from_env()?);
//!
//! let id = system.client.create_item("Desk Lamp", 39.0).await?;
//! let hits = system.search.search("lamp").await;
//! ```
//!
//! ## Chain Layout
//!
//! ```text
//! CreateItem, RenameItem : LoggingBehavior -> ValidationBehavior -> handler
//! GetItem, DeleteItem    : LoggingBehavior -> handler
//! ItemCreated            : LoggingBehavior -> PanicBoundary -> AuditLog | SearchIndex
//! ItemRenamed            : LoggingBehavior -> PanicBoundary -> SearchIndex
//! ItemDeleted            : LoggingBehavior -> PanicBoundary -> AuditLog | SearchIndex
//! ```
//!
//! Logging sits outermost so rejected requests are logged too. Every listener gets its
//! own notification chain.

use crate::clients::CatalogClient;
use crate::config::CatalogConfig;
use crate::handlers::{CreateItemHandler, DeleteItemHandler, GetItemHandler, RenameItemHandler};
use crate::listeners::{AuditLog, SearchIndex};
use crate::model::{
    CreateItem, DeleteItem, GetItem, ItemCreated, ItemDeleted, ItemRenamed, RenameItem,
};
use crate::store::ItemStore;
use crate::validation::{CreateItemValidator, RenameItemValidator};
use mediator_framework::{
    HandlerRegistry, LoggingBehavior, Mediator, PanicBoundary, ValidationBehavior,
};
use std::sync::Arc;
use tracing::info;

/// The assembled catalog.
pub struct CatalogSystem {
    /// Entry point for catalog operations
    pub client: CatalogClient,

    pub mediator: Mediator,

    pub store: Arc<ItemStore>,

    pub audit: AuditLog,

    pub search: SearchIndex,
}

impl CatalogSystem {
    pub fn new(config: CatalogConfig) -> Self {
        let store = Arc::new(ItemStore::new());
        let audit = AuditLog::new();
        let search = SearchIndex::new();

        let registry = build_registry(&config, store.clone(), &audit, &search);
        info!(
            requests = ?registry.registered_requests(),
            notifications = ?registry.registered_notifications(),
            publish_strategy = %config.publish_strategy,
            "Catalog wired"
        );

        let mediator = Mediator::new(registry).with_config(config.mediator_config());
        Self {
            client: CatalogClient::new(mediator.clone()),
            mediator,
            store,
            audit,
            search,
        }
    }
}

/// Registers every catalog handler, behavior and listener.
pub fn build_registry(
    config: &CatalogConfig,
    store: Arc<ItemStore>,
    audit: &AuditLog,
    search: &SearchIndex,
) -> HandlerRegistry {
    HandlerRegistry::builder()
        // Requests
        .handler::<CreateItem, _>(CreateItemHandler::new(store.clone()))
        .behavior::<CreateItem, _>(LoggingBehavior)
        .behavior::<CreateItem, _>(ValidationBehavior::new(CreateItemValidator::new(
            config.max_name_len,
        )))
        .handler::<GetItem, _>(GetItemHandler::new(store.clone()))
        .behavior::<GetItem, _>(LoggingBehavior)
        .handler::<RenameItem, _>(RenameItemHandler::new(store.clone()))
        .behavior::<RenameItem, _>(LoggingBehavior)
        .behavior::<RenameItem, _>(ValidationBehavior::new(RenameItemValidator::new(
            config.max_name_len,
        )))
        .handler::<DeleteItem, _>(DeleteItemHandler::new(store))
        .behavior::<DeleteItem, _>(LoggingBehavior)
        // Notifications
        .notification_handler::<ItemCreated, _>(audit.clone())
        .notification_handler::<ItemCreated, _>(search.clone())
        .notification_behavior::<ItemCreated, _>(LoggingBehavior)
        .notification_behavior::<ItemCreated, _>(PanicBoundary)
        .notification_handler::<ItemRenamed, _>(search.clone())
        .notification_behavior::<ItemRenamed, _>(LoggingBehavior)
        .notification_behavior::<ItemRenamed, _>(PanicBoundary)
        .notification_handler::<ItemDeleted, _>(audit.clone())
        .notification_handler::<ItemDeleted, _>(search.clone())
        .notification_behavior::<ItemDeleted, _>(LoggingBehavior)
        .notification_behavior::<ItemDeleted, _>(PanicBoundary)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_message_type_is_registered() {
        let registry = build_registry(
            &CatalogConfig::default(),
            Arc::new(ItemStore::new()),
            &AuditLog::new(),
            &SearchIndex::new(),
        );

        assert_eq!(
            registry.registered_requests(),
            ["CreateItem", "GetItem", "RenameItem", "DeleteItem"]
        );
        assert_eq!(registry.handler_count::<CreateItem>(), 1);
        assert_eq!(registry.behavior_count::<CreateItem>(), 2);
        assert_eq!(registry.notification_handler_count::<ItemDeleted>(), 2);
    }
}
