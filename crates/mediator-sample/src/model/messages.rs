//! Requests and notifications understood by the catalog.

use super::{Item, ItemId};
use mediator_framework::{Notification, Request};

/// Adds a new item. Answers with the assigned id.
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub name: String,
    pub price: f64,
}

impl Request for CreateItem {
    type Response = ItemId;
}

/// Looks an item up. A missing item is `Ok(None)`, not a failure.
#[derive(Debug, Clone)]
pub struct GetItem {
    pub id: ItemId,
}

impl Request for GetItem {
    type Response = Option<Item>;
}

#[derive(Debug, Clone)]
pub struct RenameItem {
    pub id: ItemId,
    pub name: String,
}

impl Request for RenameItem {
    type Response = Item;
}

#[derive(Debug, Clone)]
pub struct DeleteItem {
    pub id: ItemId,
}

impl Request for DeleteItem {
    type Response = ();
}

#[derive(Debug, Clone)]
pub struct ItemCreated {
    pub id: ItemId,
    pub name: String,
}

impl Notification for ItemCreated {}

#[derive(Debug, Clone)]
pub struct ItemRenamed {
    pub id: ItemId,
    pub name: String,
}

impl Notification for ItemRenamed {}

#[derive(Debug, Clone)]
pub struct ItemDeleted {
    pub id: ItemId,
}

impl Notification for ItemDeleted {}
