//! # Handler Traits
//!
//! A handler is the terminal link of a chain: the code that actually performs a
//! request or reacts to a notification. Handlers are `#[async_trait]` so they can
//! await I/O or other services.
//!
//! Handlers borrow the message and the [`CancellationSignal`] for the duration of
//! the call. They never see the behaviors wrapped around them.

use crate::cancel::CancellationSignal;
use crate::outcome::Outcome;
use crate::request::{Notification, Request};
use async_trait::async_trait;

/// Performs a request. Exactly one must be registered per request type.
///
/// Expected failures are returned as `Err(Failure)`. A panic is *not* an expected
/// failure and unwinds through every behavior unless a boundary catches it.
///
/// ```rust
/// use async_trait::async_trait;
/// use mediator_framework::{CancellationSignal, Outcome, Request, RequestHandler};
///
/// struct Add(i32, i32);
/// impl Request for Add { type Response = i32; }
///
/// struct AddHandler;
///
/// #[async_trait]
/// impl RequestHandler<Add> for AddHandler {
///     async fn handle(&self, request: &Add, _cancel: &CancellationSignal) -> Outcome<i32> {
///         Ok(request.0 + request.1)
///     }
/// }
/// ```
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    async fn handle(&self, request: &R, cancel: &CancellationSignal) -> Outcome<R::Response>;
}

/// Reacts to a notification. Zero, one or many may be registered per type.
///
/// Returning `Err` means the reaction could not complete. With the default publish
/// strategy this stops the broadcast; see
/// [`PublishStrategy`](crate::config::PublishStrategy).
#[async_trait]
pub trait NotificationHandler<N: Notification>: Send + Sync + 'static {
    async fn handle(&self, notification: &N, cancel: &CancellationSignal) -> Outcome<()>;
}
