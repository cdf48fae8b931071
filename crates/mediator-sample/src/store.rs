//! # Item Store
//!
//! In-memory storage behind the catalog handlers. Ids are assigned sequentially starting
//! at 1. Names are unique (case-insensitive); the uniqueness check and the write happen
//! under the same lock.
//!
//! Store operations answer with [`Outcome`], so handlers can return them as-is.

use crate::model::{fold_name, Item, ItemId};
use mediator_framework::{Failure, Outcome};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct State {
    items: BTreeMap<ItemId, Item>,
    next_id: u64,
}

impl State {
    fn name_taken(&self, name: &str, except: Option<ItemId>) -> bool {
        let folded = fold_name(name);
        self.items
            .values()
            .any(|item| Some(item.id) != except && fold_name(&item.name) == folded)
    }
}

#[derive(Debug, Default)]
pub struct ItemStore {
    state: RwLock<State>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, name: &str, price: f64) -> Outcome<Item> {
        let mut state = self.state.write().await;
        if state.name_taken(name, None) {
            return Err(Failure::conflict(format!("an item named '{name}' already exists")));
        }
        state.next_id += 1;
        let item = Item::new(ItemId(state.next_id), name, price);
        state.items.insert(item.id, item.clone());
        debug!(id = %item.id, "Item stored");
        Ok(item)
    }

    pub async fn get(&self, id: ItemId) -> Option<Item> {
        self.state.read().await.items.get(&id).cloned()
    }

    pub async fn rename(&self, id: ItemId, name: &str) -> Outcome<Item> {
        let mut state = self.state.write().await;
        if !state.items.contains_key(&id) {
            return Err(Failure::not_found(id));
        }
        if state.name_taken(name, Some(id)) {
            return Err(Failure::conflict(format!("an item named '{name}' already exists")));
        }
        let item = state
            .items
            .get_mut(&id)
            .ok_or_else(|| Failure::not_found(id))?;
        item.name = name.to_string();
        Ok(item.clone())
    }

    pub async fn remove(&self, id: ItemId) -> Outcome<Item> {
        self.state
            .write()
            .await
            .items
            .remove(&id)
            .ok_or_else(|| Failure::not_found(id))
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.items.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All items, ordered by id.
    pub async fn list(&self) -> Vec<Item> {
        self.state.read().await.items.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediator_framework::FailureKind;

    #[tokio::test]
    async fn ids_are_sequential_from_one() {
        let store = ItemStore::new();
        let a = store.insert("lamp", 10.0).await.unwrap();
        let b = store.insert("desk", 90.0).await.unwrap();
        assert_eq!(a.id, ItemId(1));
        assert_eq!(b.id, ItemId(2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn duplicate_names_conflict_regardless_of_case() {
        let store = ItemStore::new();
        store.insert("Lamp", 10.0).await.unwrap();
        let failure = store.insert("lamp", 12.0).await.unwrap_err();
        assert_eq!(failure.kind(), FailureKind::Conflict);
        assert_eq!(store.len().await, 1);

        store.insert("Äpfel", 3.0).await.unwrap();
        let failure = store.insert("äpfel", 3.5).await.unwrap_err();
        assert_eq!(failure.kind(), FailureKind::Conflict);
    }

    #[tokio::test]
    async fn rename_keeps_the_id_and_allows_own_name() {
        let store = ItemStore::new();
        let item = store.insert("lamp", 10.0).await.unwrap();
        let renamed = store.rename(item.id, "LAMP").await.unwrap();
        assert_eq!(renamed.id, item.id);
        assert_eq!(renamed.name, "LAMP");
    }

    #[tokio::test]
    async fn missing_items_are_not_found() {
        let store = ItemStore::new();
        assert!(store.get(ItemId(9)).await.is_none());
        let failure = store.remove(ItemId(9)).await.unwrap_err();
        assert_eq!(failure.kind(), FailureKind::NotFound);
        assert_eq!(failure.message(), "item_9 was not found");
        assert!(store.rename(ItemId(9), "x").await.is_err());
        assert!(store.is_empty().await);
    }
}
