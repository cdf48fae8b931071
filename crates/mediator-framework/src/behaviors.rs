//! # Built-in Behaviors
//!
//! Ready-made interceptors for the concerns most applications need:
//!
//! | Behavior | Applies to | Effect |
//! |----------|------------|--------|
//! | [`LoggingBehavior`] | requests, notifications | logs entry, exit and elapsed time |
//! | [`ValidationBehavior`] | requests | rejects invalid requests before the handler runs |
//! | [`PanicBoundary`] | requests, notifications | turns a panic deeper in the chain into a failure |
//!
//! Register them like any other behavior. Order matters: put `LoggingBehavior` first so
//! it also sees requests that validation rejects.
//!
//! ```rust,ignore
//! let registry = HandlerRegistry::builder()
//!     .handler::<CreateItem, _>(CreateItemHandler::new(store))
//!     .behavior::<CreateItem, _>(LoggingBehavior)
//!     .behavior::<CreateItem, _>(ValidationBehavior::new(CreateItemValidator::default()))
//!     .build();
//! ```

use crate::behavior::{Next, NotificationBehavior, NotificationNext, PipelineBehavior};
use crate::cancel::CancellationSignal;
use crate::outcome::{Failure, FieldError, Outcome};
use crate::request::{short_type_name, Notification, Request};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::fmt::Debug;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Logs every message passing through the chain.
///
/// Success is logged at `info`, failures at `warn` with the failure code. The outcome
/// is returned untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBehavior;

#[async_trait]
impl<R: Request + Debug> PipelineBehavior<R> for LoggingBehavior {
    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationSignal,
        next: Next<'_, R>,
    ) -> Outcome<R::Response> {
        let request_type = short_type_name::<R>();
        debug!(request_type, ?request, "Handling request");
        let started = Instant::now();

        let outcome = next.run(request, cancel).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => info!(request_type, elapsed_ms, "Request handled"),
            Err(failure) => warn!(
                request_type,
                elapsed_ms,
                code = failure.code(),
                error = %failure,
                "Request failed"
            ),
        }
        outcome
    }
}

#[async_trait]
impl<N: Notification + Debug> NotificationBehavior<N> for LoggingBehavior {
    async fn handle(
        &self,
        notification: &N,
        cancel: &CancellationSignal,
        next: NotificationNext<'_, N>,
    ) -> Outcome<()> {
        let notification_type = short_type_name::<N>();
        debug!(notification_type, ?notification, "Handling notification");
        let started = Instant::now();

        let outcome = next.run(notification, cancel).await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(()) => info!(notification_type, elapsed_ms, "Notification handled"),
            Err(failure) => warn!(
                notification_type,
                elapsed_ms,
                error = %failure,
                "Notification handler failed"
            ),
        }
        outcome
    }
}

/// Checks a request and reports every problem found.
///
/// An empty vector means the request is valid. Closures of the shape
/// `Fn(&R) -> Vec<FieldError>` are validators too.
pub trait Validator<R>: Send + Sync + 'static {
    fn validate(&self, request: &R) -> Vec<FieldError>;
}

impl<R, F> Validator<R> for F
where
    F: Fn(&R) -> Vec<FieldError> + Send + Sync + 'static,
{
    fn validate(&self, request: &R) -> Vec<FieldError> {
        self(request)
    }
}

/// Short-circuits with [`Failure::validation`] when the validator reports errors.
///
/// The handler and every behavior registered after this one are skipped for invalid
/// requests.
#[derive(Debug, Clone)]
pub struct ValidationBehavior<V> {
    validator: V,
}

impl<V> ValidationBehavior<V> {
    pub fn new(validator: V) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl<R, V> PipelineBehavior<R> for ValidationBehavior<V>
where
    R: Request,
    V: Validator<R>,
{
    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationSignal,
        next: Next<'_, R>,
    ) -> Outcome<R::Response> {
        let errors = self.validator.validate(request);
        if errors.is_empty() {
            return next.run(request, cancel).await;
        }
        warn!(
            request_type = short_type_name::<R>(),
            errors = errors.len(),
            "Request rejected by validation"
        );
        Err(Failure::validation(errors))
    }
}

/// Converts a panic in the rest of the chain into [`Failure::unexpected`].
///
/// Without it a panicking handler unwinds through the mediator to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanicBoundary;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for PanicBoundary {
    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationSignal,
        next: Next<'_, R>,
    ) -> Outcome<R::Response> {
        match AssertUnwindSafe(next.run(request, cancel))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(request_type = short_type_name::<R>(), %message, "Handler panicked");
                Err(Failure::unexpected(message))
            }
        }
    }
}

#[async_trait]
impl<N: Notification> NotificationBehavior<N> for PanicBoundary {
    async fn handle(
        &self,
        notification: &N,
        cancel: &CancellationSignal,
        next: NotificationNext<'_, N>,
    ) -> Outcome<()> {
        match AssertUnwindSafe(next.run(notification, cancel))
            .catch_unwind()
            .await
        {
            Ok(outcome) => outcome,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(
                    notification_type = short_type_name::<N>(),
                    %message,
                    "Notification handler panicked"
                );
                Err(Failure::unexpected(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{NotificationHandler, RequestHandler};
    use crate::mock::{Journal, MockHandler, RecordingNotificationHandler};
    use crate::outcome::FailureKind;
    use crate::registry::HandlerRegistry;
    use crate::Mediator;

    #[derive(Debug)]
    struct Rename {
        name: String,
    }
    impl Request for Rename {
        type Response = String;
    }

    fn name_not_blank(request: &Rename) -> Vec<FieldError> {
        if request.name.trim().is_empty() {
            vec![FieldError::new("name", "must not be blank")]
        } else {
            Vec::new()
        }
    }

    #[tokio::test]
    async fn valid_requests_reach_the_handler() {
        let handler = MockHandler::<Rename>::new();
        handler.expect().return_ok("renamed".to_string());
        let mediator = Mediator::new(
            HandlerRegistry::builder()
                .handler::<Rename, _>(handler.clone())
                .behavior::<Rename, _>(LoggingBehavior)
                .behavior::<Rename, _>(ValidationBehavior::new(name_not_blank))
                .build(),
        );

        let outcome = mediator
            .send_default(Rename {
                name: "widget".into(),
            })
            .await
            .unwrap();

        assert_eq!(outcome, Ok("renamed".to_string()));
        handler.verify();
    }

    #[tokio::test]
    async fn invalid_requests_never_reach_the_handler() {
        let handler = MockHandler::<Rename>::new();
        let mediator = Mediator::new(
            HandlerRegistry::builder()
                .handler::<Rename, _>(handler.clone())
                .behavior::<Rename, _>(ValidationBehavior::new(name_not_blank))
                .build(),
        );

        let failure = mediator
            .send_default(Rename { name: "  ".into() })
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Validation);
        assert_eq!(failure.field_errors()[0].field, "name");
        assert_eq!(handler.calls(), 0);
    }

    struct Explodes;

    #[async_trait]
    impl RequestHandler<Rename> for Explodes {
        async fn handle(&self, request: &Rename, _: &CancellationSignal) -> Outcome<String> {
            panic!("cannot rename {}", request.name);
        }
    }

    #[tokio::test]
    async fn panic_boundary_turns_panics_into_failures() {
        let mediator = Mediator::new(
            HandlerRegistry::builder()
                .handler::<Rename, _>(Explodes)
                .behavior::<Rename, _>(PanicBoundary)
                .build(),
        );

        let failure = mediator
            .send_default(Rename { name: "x".into() })
            .await
            .unwrap()
            .unwrap_err();

        assert_eq!(failure.kind(), FailureKind::Unexpected);
        assert_eq!(failure.message(), "cannot rename x");
    }

    #[derive(Debug)]
    struct Ping;
    impl Notification for Ping {}

    struct PanickingListener;

    #[async_trait]
    impl NotificationHandler<Ping> for PanickingListener {
        async fn handle(&self, _: &Ping, _: &CancellationSignal) -> Outcome<()> {
            panic!("listener down");
        }
    }

    #[tokio::test]
    async fn panic_boundary_covers_notification_handlers() {
        let mediator = Mediator::new(
            HandlerRegistry::builder()
                .notification_handler::<Ping, _>(PanickingListener)
                .notification_behavior::<Ping, _>(LoggingBehavior)
                .notification_behavior::<Ping, _>(PanicBoundary)
                .build(),
        );

        let err = mediator.publish_default(Ping).await.unwrap_err();

        let failures = err.handler_failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].message(), "listener down");
    }

    #[tokio::test]
    async fn without_a_boundary_a_handler_panic_unwinds_to_the_caller() {
        let mediator = Mediator::new(
            HandlerRegistry::builder()
                .handler::<Rename, _>(Explodes)
                .behavior::<Rename, _>(LoggingBehavior)
                .build(),
        );

        let unwound = AssertUnwindSafe(mediator.send_default(Rename { name: "x".into() }))
            .catch_unwind()
            .await;

        let payload = unwound.err().expect("send should have panicked");
        assert_eq!(panic_message(payload.as_ref()), "cannot rename x");
    }

    #[tokio::test]
    async fn without_a_boundary_a_listener_panic_aborts_the_broadcast() {
        let journal = Journal::new();
        let mediator = Mediator::new(
            HandlerRegistry::builder()
                .notification_handler::<Ping, _>(PanickingListener)
                .notification_handler::<Ping, _>(RecordingNotificationHandler::new("H2", &journal))
                .notification_behavior::<Ping, _>(LoggingBehavior)
                .build(),
        );

        let unwound = AssertUnwindSafe(mediator.publish_default(Ping))
            .catch_unwind()
            .await;

        assert!(unwound.is_err());
        assert!(journal.entries().is_empty());
    }

    #[test]
    fn panic_payloads_of_unknown_type_get_a_generic_message() {
        let payload: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(payload.as_ref()), "handler panicked");
    }
}
