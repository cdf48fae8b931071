//! # Requests & Notifications
//!
//! The two kinds of message the mediator understands:
//!
//! - A [`Request`] describes an operation with **exactly one** handler. Its associated
//!   `Response` type is what a successful handler produces. A request with nothing to
//!   return declares `type Response = ();` and is dispatched to an `Outcome<()>`.
//! - A [`Notification`] describes something that already happened. Any number of
//!   handlers (including none) may react to it, and the caller gets no value back.
//!
//! Both are plain data owned by the caller. The mediator lends them to behaviors and
//! handlers as shared references, so nothing in the chain can modify them.
//!
//! ```rust
//! use mediator_framework::{Notification, Request};
//!
//! #[derive(Debug)]
//! struct CreateItem { name: String }
//!
//! impl Request for CreateItem {
//!     type Response = u64;
//! }
//!
//! #[derive(Debug)]
//! struct ItemCreated { id: u64 }
//!
//! impl Notification for ItemCreated {}
//! ```

/// An operation dispatched to a single handler.
pub trait Request: Send + Sync + 'static {
    /// The value a successful handler returns.
    type Response: Send + 'static;
}

/// An event broadcast to every interested handler.
pub trait Notification: Send + Sync + 'static {}

/// Last path segment of a type name, without generic arguments.
///
/// Used as the `request_type` / `notification_type` field in logs and errors.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping;
    struct Wrapper<T>(T);

    #[test]
    fn short_names_drop_module_path_and_generics() {
        assert_eq!(short_type_name::<Ping>(), "Ping");
        assert_eq!(short_type_name::<Wrapper<Ping>>(), "Wrapper");
        assert_eq!(short_type_name::<u32>(), "u32");
    }
}
