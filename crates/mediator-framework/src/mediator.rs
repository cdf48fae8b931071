//! # Mediator
//!
//! The entry point callers talk to. It has two operations:
//!
//! - [`Mediator::send`] dispatches a [`Request`] to its single handler through the
//!   request's behavior chain and hands back the handler's `Outcome`.
//! - [`Mediator::publish`] broadcasts a [`Notification`] to every registered handler,
//!   each wrapped in its own freshly built behavior chain.
//!
//! ## Two Error Channels
//!
//! ```text
//! send(request) -> Result<Outcome<Response>, DispatchError>
//!                  │       │
//!                  │       └── business outcome, returned as produced by the chain
//!                  └────────── wiring problem (no handler, two handlers)
//! ```
//!
//! The mediator never looks inside an `Outcome`: a failure produced deep in the chain
//! reaches the caller as the very same `Failure` value.
//!
//! ## Statelessness
//!
//! Each call resolves its handler and behaviors from the [`HandlerLookup`] and builds
//! a new chain. Nothing is cached between calls and there is no pending-dispatch state.
//! The mediator is cheap to clone; clones share the lookup.
//!
//! ## Concurrency
//!
//! The mediator never spawns. A call runs on the caller's task and completes only once
//! every nested link has completed. Notification handlers run one after another in
//! registration order.

use crate::behavior::{Next, NotificationNext};
use crate::cancel::CancellationSignal;
use crate::config::{MediatorConfig, PublishStrategy};
use crate::error::{DispatchError, HandlerFailure};
use crate::outcome::Outcome;
use crate::registry::{HandlerLookup, HandlerRegistry};
use crate::request::{short_type_name, Notification, Request};
use std::sync::Arc;
use tracing::{debug, error, info_span, warn, Instrument};

/// Dispatches requests and broadcasts notifications.
///
/// ```rust
/// use async_trait::async_trait;
/// use mediator_framework::{
///     CancellationSignal, HandlerRegistry, Mediator, Outcome, Request, RequestHandler,
/// };
///
/// struct Double(i64);
/// impl Request for Double { type Response = i64; }
///
/// struct DoubleHandler;
///
/// #[async_trait]
/// impl RequestHandler<Double> for DoubleHandler {
///     async fn handle(&self, request: &Double, _: &CancellationSignal) -> Outcome<i64> {
///         Ok(request.0 * 2)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let registry = HandlerRegistry::builder()
///         .handler::<Double, _>(DoubleHandler)
///         .build();
///     let mediator = Mediator::new(registry);
///
///     let outcome = mediator.send_default(Double(21)).await.unwrap();
///     assert_eq!(outcome, Ok(42));
/// }
/// ```
pub struct Mediator<L: HandlerLookup = HandlerRegistry> {
    lookup: Arc<L>,
    config: MediatorConfig,
}

impl<L: HandlerLookup> Clone for Mediator<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: self.lookup.clone(),
            config: self.config.clone(),
        }
    }
}

impl<L: HandlerLookup> Mediator<L> {
    pub fn new(lookup: L) -> Self {
        Self::from_arc(Arc::new(lookup))
    }

    /// Builds a mediator over a lookup that is already shared elsewhere.
    pub fn from_arc(lookup: Arc<L>) -> Self {
        Self {
            lookup,
            config: MediatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MediatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &MediatorConfig {
        &self.config
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Dispatches `request` to its handler through the registered behaviors.
    ///
    /// Returns `Err(DispatchError)` only for wiring problems; every business outcome,
    /// failures included, comes back as `Ok(outcome)`.
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: &CancellationSignal,
    ) -> Result<Outcome<R::Response>, DispatchError> {
        let request_type = short_type_name::<R>();

        let handler = match self.lookup.resolve_handler::<R>() {
            Ok(handler) => handler,
            Err(e) => {
                error!(request_type, error = %e, "Dispatch failed");
                return Err(e);
            }
        };
        let behaviors = self.lookup.resolve_behaviors::<R>();
        debug!(request_type, behaviors = behaviors.len(), "Dispatching request");

        let chain = Next::chain(handler.as_ref(), &behaviors);
        let outcome = if self.config.instrument {
            chain
                .run(&request, cancel)
                .instrument(info_span!("send", request_type))
                .await
        } else {
            chain.run(&request, cancel).await
        };

        debug!(request_type, ok = outcome.is_ok(), "Request completed");
        Ok(outcome)
    }

    /// [`send`](Self::send) with a signal that is never cancelled.
    pub async fn send_default<R: Request>(
        &self,
        request: R,
    ) -> Result<Outcome<R::Response>, DispatchError> {
        self.send(request, &CancellationSignal::never()).await
    }

    /// Broadcasts `notification` to every registered handler, in registration order.
    ///
    /// Behaviors are resolved again for each handler, so each handler gets its own
    /// chain. No handlers is not an error. What happens when a handler fails depends
    /// on [`MediatorConfig::publish_strategy`]. Cancellation is checked before each
    /// handler and ends the broadcast with [`DispatchError::PublishCancelled`] under
    /// either strategy.
    pub async fn publish<N: Notification>(
        &self,
        notification: N,
        cancel: &CancellationSignal,
    ) -> Result<(), DispatchError> {
        let notification_type = short_type_name::<N>();
        let handlers = self.lookup.resolve_notification_handlers::<N>();
        if handlers.is_empty() {
            debug!(notification_type, "No handlers registered, nothing to publish");
            return Ok(());
        }
        debug!(
            notification_type,
            handlers = handlers.len(),
            "Publishing notification"
        );

        let mut failures = Vec::new();
        for (handler_index, handler) in handlers.iter().enumerate() {
            if cancel.is_cancelled() {
                debug!(
                    notification_type,
                    delivered = handler_index,
                    "Publish cancelled, skipping remaining handlers"
                );
                return Err(DispatchError::PublishCancelled {
                    notification_type,
                    delivered: handler_index,
                });
            }
            let behaviors = self.lookup.resolve_notification_behaviors::<N>();
            let chain = NotificationNext::chain(handler.as_ref(), &behaviors);
            let outcome = if self.config.instrument {
                chain
                    .run(&notification, cancel)
                    .instrument(info_span!("publish", notification_type, handler_index))
                    .await
            } else {
                chain.run(&notification, cancel).await
            };

            let Err(failure) = outcome else { continue };
            warn!(
                notification_type,
                handler_index,
                error = %failure,
                "Notification handler failed"
            );
            match self.config.publish_strategy {
                PublishStrategy::StopOnFirstError => {
                    return Err(DispatchError::NotificationFailed {
                        notification_type,
                        handler_index,
                        source: failure,
                    });
                }
                PublishStrategy::ContinueOnError => failures.push(HandlerFailure {
                    handler_index,
                    failure,
                }),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError::NotificationsFailed {
                notification_type,
                failures,
            })
        }
    }

    /// [`publish`](Self::publish) with a signal that is never cancelled.
    pub async fn publish_default<N: Notification>(
        &self,
        notification: N,
    ) -> Result<(), DispatchError> {
        self.publish(notification, &CancellationSignal::never())
            .await
    }
}
