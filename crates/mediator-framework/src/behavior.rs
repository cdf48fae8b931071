//! # Behaviors and the Chain
//!
//! A behavior wraps handler execution with cross-cutting logic: validation, logging,
//! authorization, panic boundaries. Each behavior receives the message, the
//! cancellation signal and a one-shot continuation ([`Next`]) that represents *the rest
//! of the chain*.
//!
//! ## Onion Ordering
//!
//! The chain is built per call by starting from the handler and wrapping it with the
//! registered behaviors in **reverse** registration order. The first registered
//! behavior therefore ends up outermost:
//!
//! ```text
//! registered: [A, B, C]
//!
//! A ─▶ B ─▶ C ─▶ handler
//! A ◀─ B ◀─ C ◀─┘
//!
//! A-before, B-before, C-before, handler, C-after, B-after, A-after
//! ```
//!
//! ## Short-Circuiting
//!
//! A behavior that returns without calling `next.run(..)` ends the call right there.
//! Nothing deeper runs, the handler included. This is how validation rejects a request.
//!
//! ## Invariants
//!
//! - `Next` is consumed by `run`, so a behavior can continue the chain at most once.
//! - Behaviors MUST return the inner outcome unchanged unless they deliberately
//!   replace it; the mediator never inspects outcomes itself.
//! - Every link boundary checks the [`CancellationSignal`]; once cancelled, deeper
//!   links are skipped and the outcome is [`Failure::cancelled`].
//!
//! ```rust
//! use async_trait::async_trait;
//! use mediator_framework::{CancellationSignal, Next, Outcome, PipelineBehavior, Request};
//!
//! struct Timed;
//!
//! #[async_trait]
//! impl<R: Request> PipelineBehavior<R> for Timed {
//!     async fn handle(
//!         &self,
//!         request: &R,
//!         cancel: &CancellationSignal,
//!         next: Next<'_, R>,
//!     ) -> Outcome<R::Response> {
//!         let started = std::time::Instant::now();
//!         let outcome = next.run(request, cancel).await;
//!         tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
//!         outcome
//!     }
//! }
//! ```

use crate::cancel::CancellationSignal;
use crate::handler::{NotificationHandler, RequestHandler};
use crate::outcome::{Failure, Outcome};
use crate::request::{short_type_name, Notification, Request};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Interceptor around a request handler.
#[async_trait]
pub trait PipelineBehavior<R: Request>: Send + Sync + 'static {
    /// Name used in logs. Defaults to the implementing type's short name.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationSignal,
        next: Next<'_, R>,
    ) -> Outcome<R::Response>;
}

/// Interceptor around a single notification handler.
#[async_trait]
pub trait NotificationBehavior<N: Notification>: Send + Sync + 'static {
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    async fn handle(
        &self,
        notification: &N,
        cancel: &CancellationSignal,
        next: NotificationNext<'_, N>,
    ) -> Outcome<()>;
}

/// The rest of a request chain.
pub struct Next<'a, R: Request> {
    inner: NextInner<'a, R>,
}

enum NextInner<'a, R: Request> {
    Behavior {
        behavior: &'a dyn PipelineBehavior<R>,
        next: Box<Next<'a, R>>,
    },
    Handler(&'a dyn RequestHandler<R>),
}

impl<'a, R: Request> Next<'a, R> {
    /// Builds the full chain: `behaviors[0]` outermost, `handler` innermost.
    pub(crate) fn chain(
        handler: &'a dyn RequestHandler<R>,
        behaviors: &'a [Arc<dyn PipelineBehavior<R>>],
    ) -> Self {
        let mut next = Self {
            inner: NextInner::Handler(handler),
        };
        for behavior in behaviors.iter().rev() {
            next = Self {
                inner: NextInner::Behavior {
                    behavior: behavior.as_ref(),
                    next: Box::new(next),
                },
            };
        }
        next
    }

    /// Continues the chain. Consumes `self`, so it runs at most once.
    pub async fn run(self, request: &R, cancel: &CancellationSignal) -> Outcome<R::Response> {
        if cancel.is_cancelled() {
            debug!(request_type = short_type_name::<R>(), "Cancelled before next link");
            return Err(Failure::cancelled());
        }
        match self.inner {
            NextInner::Behavior { behavior, next } => {
                behavior.handle(request, cancel, *next).await
            }
            NextInner::Handler(handler) => handler.handle(request, cancel).await,
        }
    }

    /// True when the next link is the handler itself.
    pub fn is_handler(&self) -> bool {
        matches!(self.inner, NextInner::Handler(_))
    }
}

/// The rest of a notification chain for one handler.
pub struct NotificationNext<'a, N: Notification> {
    inner: NotificationNextInner<'a, N>,
}

enum NotificationNextInner<'a, N: Notification> {
    Behavior {
        behavior: &'a dyn NotificationBehavior<N>,
        next: Box<NotificationNext<'a, N>>,
    },
    Handler(&'a dyn NotificationHandler<N>),
}

impl<'a, N: Notification> NotificationNext<'a, N> {
    pub(crate) fn chain(
        handler: &'a dyn NotificationHandler<N>,
        behaviors: &'a [Arc<dyn NotificationBehavior<N>>],
    ) -> Self {
        let mut next = Self {
            inner: NotificationNextInner::Handler(handler),
        };
        for behavior in behaviors.iter().rev() {
            next = Self {
                inner: NotificationNextInner::Behavior {
                    behavior: behavior.as_ref(),
                    next: Box::new(next),
                },
            };
        }
        next
    }

    pub async fn run(self, notification: &N, cancel: &CancellationSignal) -> Outcome<()> {
        if cancel.is_cancelled() {
            debug!(
                notification_type = short_type_name::<N>(),
                "Cancelled before next link"
            );
            return Err(Failure::cancelled());
        }
        match self.inner {
            NotificationNextInner::Behavior { behavior, next } => {
                behavior.handle(notification, cancel, *next).await
            }
            NotificationNextInner::Handler(handler) => handler.handle(notification, cancel).await,
        }
    }

    pub fn is_handler(&self) -> bool {
        matches!(self.inner, NotificationNextInner::Handler(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationSource;
    use std::sync::Mutex;

    struct Echo(u32);
    impl Request for Echo {
        type Response = u32;
    }

    struct EchoHandler;

    #[async_trait]
    impl RequestHandler<Echo> for EchoHandler {
        async fn handle(&self, request: &Echo, _cancel: &CancellationSignal) -> Outcome<u32> {
            Ok(request.0)
        }
    }

    /// Adds `delta` to the inner response.
    struct AddOnReturn {
        delta: u32,
        seen: Arc<Mutex<Vec<u32>>>,
    }

    #[async_trait]
    impl PipelineBehavior<Echo> for AddOnReturn {
        async fn handle(
            &self,
            request: &Echo,
            cancel: &CancellationSignal,
            next: Next<'_, Echo>,
        ) -> Outcome<u32> {
            let outcome = next.run(request, cancel).await;
            if let Ok(value) = &outcome {
                self.seen.lock().unwrap().push(*value);
            }
            outcome.map(|value| value + self.delta)
        }
    }

    #[tokio::test]
    async fn empty_chain_goes_straight_to_the_handler() {
        let behaviors: Vec<Arc<dyn PipelineBehavior<Echo>>> = Vec::new();
        let next = Next::chain(&EchoHandler, &behaviors);
        assert!(next.is_handler());
        let outcome = next.run(&Echo(7), &CancellationSignal::never()).await;
        assert_eq!(outcome, Ok(7));
    }

    #[tokio::test]
    async fn inner_results_flow_outward_through_each_behavior() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let behaviors: Vec<Arc<dyn PipelineBehavior<Echo>>> = vec![
            Arc::new(AddOnReturn {
                delta: 100,
                seen: seen.clone(),
            }),
            Arc::new(AddOnReturn {
                delta: 10,
                seen: seen.clone(),
            }),
        ];
        let next = Next::chain(&EchoHandler, &behaviors);
        assert!(!next.is_handler());

        let outcome = next.run(&Echo(1), &CancellationSignal::never()).await;

        assert_eq!(outcome, Ok(111));
        // innermost sees the handler's value first
        assert_eq!(*seen.lock().unwrap(), vec![1, 11]);
    }

    #[tokio::test]
    async fn cancelled_signal_stops_at_the_first_boundary() {
        let (source, signal) = CancellationSource::new();
        source.cancel();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let behaviors: Vec<Arc<dyn PipelineBehavior<Echo>>> = vec![Arc::new(AddOnReturn {
            delta: 1,
            seen: seen.clone(),
        })];

        let outcome = Next::chain(&EchoHandler, &behaviors)
            .run(&Echo(1), &signal)
            .await;

        assert_eq!(outcome, Err(Failure::cancelled()));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn default_behavior_name_is_the_short_type_name() {
        let behavior = AddOnReturn {
            delta: 0,
            seen: Arc::default(),
        };
        assert_eq!(PipelineBehavior::<Echo>::name(&behavior), "AddOnReturn");
    }
}
