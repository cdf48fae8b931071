//! # Catalog Model
//!
//! Pure data: the [`Item`] entity and the messages that travel through the mediator.

pub mod item;
pub mod messages;

pub use item::*;
pub use messages::*;
