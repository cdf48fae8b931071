//! # Notification Listeners
//!
//! Read-side reactions to catalog events. Both listeners are `Clone` and share their
//! state between clones, so the same instance can be registered for several
//! notification types and still be inspected afterwards.

use crate::model::{fold_name, ItemCreated, ItemDeleted, ItemId, ItemRenamed};
use async_trait::async_trait;
use mediator_framework::{CancellationSignal, NotificationHandler, Outcome};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Append-only record of catalog changes.
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entries(&self) -> Vec<String> {
        self.entries.lock().await.clone()
    }

    async fn append(&self, entry: String) {
        debug!(%entry, "Audit entry");
        self.entries.lock().await.push(entry);
    }
}

#[async_trait]
impl NotificationHandler<ItemCreated> for AuditLog {
    async fn handle(&self, event: &ItemCreated, _cancel: &CancellationSignal) -> Outcome<()> {
        self.append(format!("created {} '{}'", event.id, event.name))
            .await;
        Ok(())
    }
}

#[async_trait]
impl NotificationHandler<ItemDeleted> for AuditLog {
    async fn handle(&self, event: &ItemDeleted, _cancel: &CancellationSignal) -> Outcome<()> {
        self.append(format!("deleted {}", event.id)).await;
        Ok(())
    }
}

/// Case-insensitive substring search over item names.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    names: Arc<RwLock<BTreeMap<ItemId, String>>>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of every indexed item whose name contains `term`, ordered by id.
    pub async fn search(&self, term: &str) -> Vec<ItemId> {
        let term = fold_name(term);
        self.names
            .read()
            .await
            .iter()
            .filter(|(_, name)| name.contains(&term))
            .map(|(id, _)| *id)
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.names.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl NotificationHandler<ItemCreated> for SearchIndex {
    async fn handle(&self, event: &ItemCreated, _cancel: &CancellationSignal) -> Outcome<()> {
        self.names
            .write()
            .await
            .insert(event.id, fold_name(&event.name));
        Ok(())
    }
}

#[async_trait]
impl NotificationHandler<ItemRenamed> for SearchIndex {
    async fn handle(&self, event: &ItemRenamed, _cancel: &CancellationSignal) -> Outcome<()> {
        self.names
            .write()
            .await
            .insert(event.id, fold_name(&event.name));
        Ok(())
    }
}

#[async_trait]
impl NotificationHandler<ItemDeleted> for SearchIndex {
    async fn handle(&self, event: &ItemDeleted, _cancel: &CancellationSignal) -> Outcome<()> {
        self.names.write().await.remove(&event.id);
        Ok(())
    }
}
