//! # Catalog Client
//!
//! Provides a high-level API over the mediator for catalog operations.
//! Each write sends its request, and on success publishes the matching event so the
//! listeners can react. Both error channels are folded into [`CatalogError`].
//!
//! Once the write is committed the call succeeds: a listener failure or a
//! cancellation while announcing the event is logged, never returned.
use crate::error::CatalogError;
use crate::model::{
    CreateItem, DeleteItem, GetItem, Item, ItemCreated, ItemDeleted, ItemId, ItemRenamed,
    RenameItem,
};
use mediator_framework::{CancellationSignal, Failure, Mediator, Notification, ResultExt};
use tracing::{debug, instrument, warn};

/// Client for the catalog.
#[derive(Clone)]
pub struct CatalogClient {
    mediator: Mediator,
    cancel: CancellationSignal,
}

impl CatalogClient {
    pub fn new(mediator: Mediator) -> Self {
        Self {
            mediator,
            cancel: CancellationSignal::never(),
        }
    }

    /// Same client, but every call observes `cancel`.
    pub fn with_cancellation(&self, cancel: CancellationSignal) -> Self {
        Self {
            mediator: self.mediator.clone(),
            cancel,
        }
    }

    #[instrument(skip(self))]
    pub async fn create_item(&self, name: &str, price: f64) -> Result<ItemId, CatalogError> {
        debug!("Sending request");
        let request = CreateItem {
            name: name.to_string(),
            price,
        };
        let id = self
            .mediator
            .send(request, &self.cancel)
            .await?
            .on_failure(|failure| warn!(code = failure.code(), "Item not created"))?;

        self.announce(ItemCreated {
            id,
            name: name.trim().to_string(),
        })
        .await;
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn get_item(&self, id: ItemId) -> Result<Option<Item>, CatalogError> {
        debug!("Sending request");
        Ok(self.mediator.send(GetItem { id }, &self.cancel).await??)
    }

    /// Like [`get_item`](Self::get_item), but a missing item is an error.
    #[instrument(skip(self))]
    pub async fn require_item(&self, id: ItemId) -> Result<Item, CatalogError> {
        let item = self
            .mediator
            .send(GetItem { id }, &self.cancel)
            .await?
            .bind(|found| found.ok_or_else(|| Failure::not_found(id)))?;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn rename_item(&self, id: ItemId, name: &str) -> Result<Item, CatalogError> {
        debug!("Sending request");
        let request = RenameItem {
            id,
            name: name.to_string(),
        };
        let item = self.mediator.send(request, &self.cancel).await??;

        self.announce(ItemRenamed {
            id: item.id,
            name: item.name.clone(),
        })
        .await;
        Ok(item)
    }

    #[instrument(skip(self))]
    pub async fn delete_item(&self, id: ItemId) -> Result<(), CatalogError> {
        debug!("Sending request");
        self.mediator.send(DeleteItem { id }, &self.cancel).await??;
        self.announce(ItemDeleted { id }).await;
        Ok(())
    }

    async fn announce<N: Notification>(&self, event: N) {
        if let Err(e) = self.mediator.publish(event, &self.cancel).await {
            warn!(error = %e, "Change committed but not fully announced");
        }
    }

    /// Human-readable one-liner for an item, or the reason there is none.
    #[instrument(skip(self))]
    pub async fn describe_item(&self, id: ItemId) -> Result<String, CatalogError> {
        let outcome = self.mediator.send(GetItem { id }, &self.cancel).await?;
        Ok(outcome
            .bind(|found| found.ok_or_else(|| Failure::not_found(id)))
            .map(|item| format!("{} '{}' at {:.2}", item.id, item.name, item.price))
            .match_with(|line| line, |failure| failure.message().to_string()))
    }
}
