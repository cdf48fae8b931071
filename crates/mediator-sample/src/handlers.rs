//! # Catalog Request Handlers
//!
//! One handler per request type, each holding a shared [`ItemStore`]. Handlers assume
//! their request already passed validation; they only enforce what needs the store
//! (existence, unique names).

use crate::model::{CreateItem, DeleteItem, GetItem, Item, ItemId, RenameItem};
use crate::store::ItemStore;
use async_trait::async_trait;
use mediator_framework::{CancellationSignal, Outcome, RequestHandler, ResultExt};
use std::sync::Arc;
use tracing::{debug, info};

pub struct CreateItemHandler {
    store: Arc<ItemStore>,
}

impl CreateItemHandler {
    pub fn new(store: Arc<ItemStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<CreateItem> for CreateItemHandler {
    async fn handle(&self, request: &CreateItem, cancel: &CancellationSignal) -> Outcome<ItemId> {
        cancel.check()?;
        self.store
            .insert(request.name.trim(), request.price)
            .await
            .on_success(|item| info!(id = %item.id, name = %item.name, "Item created"))
            .map(|item| item.id)
    }
}

pub struct GetItemHandler {
    store: Arc<ItemStore>,
}

impl GetItemHandler {
    pub fn new(store: Arc<ItemStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<GetItem> for GetItemHandler {
    async fn handle(
        &self,
        request: &GetItem,
        _cancel: &CancellationSignal,
    ) -> Outcome<Option<Item>> {
        let item = self.store.get(request.id).await;
        debug!(id = %request.id, found = item.is_some(), "Item lookup");
        Ok(item)
    }
}

pub struct RenameItemHandler {
    store: Arc<ItemStore>,
}

impl RenameItemHandler {
    pub fn new(store: Arc<ItemStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<RenameItem> for RenameItemHandler {
    async fn handle(&self, request: &RenameItem, cancel: &CancellationSignal) -> Outcome<Item> {
        cancel.check()?;
        self.store
            .rename(request.id, request.name.trim())
            .await
            .on_success(|item| info!(id = %item.id, name = %item.name, "Item renamed"))
    }
}

pub struct DeleteItemHandler {
    store: Arc<ItemStore>,
}

impl DeleteItemHandler {
    pub fn new(store: Arc<ItemStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestHandler<DeleteItem> for DeleteItemHandler {
    async fn handle(&self, request: &DeleteItem, cancel: &CancellationSignal) -> Outcome<()> {
        cancel.check()?;
        self.store
            .remove(request.id)
            .await
            .on_success(|item| info!(id = %item.id, "Item deleted"))
            .map(|_| ())
    }
}
