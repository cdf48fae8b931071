//! # Framework Errors
//!
//! Errors raised by the mediator itself. They are kept strictly apart from
//! [`Failure`]: a `Failure` is a business outcome travelling as data inside
//! `Outcome`, while a [`DispatchError`] means the call could not be carried out as
//! wired (no handler, two handlers, a broken notification handler).
//!
//! `send` and `publish` return them on the *outer* `Result`, so callers can `?` them
//! away and keep working with the inner `Outcome`:
//!
//! ```rust,ignore
//! let outcome: Outcome<ItemId> = mediator.send(create, &cancel).await?;
//! ```

use crate::outcome::Failure;

/// Errors that can occur within the mediator itself.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Nothing was registered to handle this request type. A wiring defect.
    #[error("No handler registered for request {request_type}")]
    MissingHandler { request_type: &'static str },

    /// More than one handler was registered for this request type. A wiring defect.
    #[error("{count} handlers registered for request {request_type}, expected exactly one")]
    AmbiguousHandler {
        request_type: &'static str,
        count: usize,
    },

    /// A notification handler failed and the broadcast stopped there.
    #[error("Notification handler #{handler_index} for {notification_type} failed: {source}")]
    NotificationFailed {
        notification_type: &'static str,
        handler_index: usize,
        source: Failure,
    },

    /// One or more notification handlers failed; every handler was still invoked.
    #[error(
        "{count} notification handler(s) for {notification_type} failed",
        count = .failures.len()
    )]
    NotificationsFailed {
        notification_type: &'static str,
        failures: Vec<HandlerFailure>,
    },

    /// The broadcast was cancelled before handler #`delivered` started. Handlers
    /// before it ran; it and the rest never did.
    #[error("Publishing {notification_type} was cancelled after {delivered} handler(s)")]
    PublishCancelled {
        notification_type: &'static str,
        delivered: usize,
    },
}

impl DispatchError {
    /// True for registration problems that no retry can fix.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            DispatchError::MissingHandler { .. } | DispatchError::AmbiguousHandler { .. }
        )
    }

    /// Failure causes reported by notification handlers, in handler order.
    pub fn handler_failures(&self) -> Vec<&Failure> {
        match self {
            DispatchError::NotificationFailed { source, .. } => vec![source],
            DispatchError::NotificationsFailed { failures, .. } => {
                failures.iter().map(|f| &f.failure).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// A failed notification handler, identified by its registration index.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerFailure {
    pub handler_index: usize,
    pub failure: Failure,
}
