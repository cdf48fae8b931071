//! # Mock Framework & Testing Guide
//!
//! Test doubles for code built on the mediator. [`MockHandler`] stands in for a real
//! request handler and answers from a queue of expectations; the recording types write
//! to a shared [`Journal`] so tests can assert the exact order in which behaviors and
//! handlers ran.
//!
//! ## When to use Mocks vs Real Handlers
//!
//! | Feature | MockHandler | Real Handler |
//! |---------|-------------|--------------|
//! | **Speed** | Instant (in-memory) | Depends on the handler's dependencies |
//! | **Determinism** | 100% Deterministic | Depends on shared state |
//! | **State** | No real state (expectations) | Real store, real side effects |
//! | **Use Case** | Testing logic *around* `send` (clients, behaviors) | Testing the handler or the full system |
//! | **Failure Injection** | Easy (`return_err`) | Needs specific state |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 0: Client Logic Test (Pure Mock)</b></summary>
//!
//! **When to use**: Testing code that calls `send` without running the real handler.
//!
//! ```rust
//! use mediator_framework::mock::MockHandler;
//! use mediator_framework::{Failure, HandlerRegistry, Mediator, Request};
//!
//! #[derive(Debug)]
//! struct GetPrice { sku: String }
//! impl Request for GetPrice { type Response = u32; }
//!
//! #[tokio::main]
//! async fn main() {
//!     // 1. Setup Mocks
//!     let prices = MockHandler::<GetPrice>::new();
//!     prices.expect().return_ok(1200);
//!     prices.expect().return_err(Failure::not_found("sku 9"));
//!
//!     // 2. Register the mock like a real handler
//!     let mediator = Mediator::new(
//!         HandlerRegistry::builder()
//!             .handler::<GetPrice, _>(prices.clone())
//!             .build(),
//!     );
//!
//!     // 3. Test Logic
//!     let first = mediator.send_default(GetPrice { sku: "a".into() }).await.unwrap();
//!     assert_eq!(first, Ok(1200));
//!     let second = mediator.send_default(GetPrice { sku: "9".into() }).await.unwrap();
//!     assert!(second.is_err());
//!
//!     prices.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 1: Chain Ordering Test</b></summary>
//!
//! **When to use**: Checking that behaviors wrap the handler in the expected order.
//!
//! ```rust
//! use mediator_framework::mock::{Journal, RecordingBehavior, RecordingHandler};
//! use mediator_framework::{HandlerRegistry, Mediator, Request};
//!
//! struct Ping;
//! impl Request for Ping { type Response = &'static str; }
//!
//! #[tokio::main]
//! async fn main() {
//!     let journal = Journal::new();
//!     let mediator = Mediator::new(
//!         HandlerRegistry::builder()
//!             .handler::<Ping, _>(RecordingHandler::new("handler", &journal, "pong"))
//!             .behavior::<Ping, _>(RecordingBehavior::new("outer", &journal))
//!             .behavior::<Ping, _>(RecordingBehavior::new("inner", &journal))
//!             .build(),
//!     );
//!
//!     mediator.send_default(Ping).await.unwrap().unwrap();
//!     assert_eq!(
//!         journal.entries(),
//!         vec!["outer-before", "inner-before", "handler", "inner-after", "outer-after"]
//!     );
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Full System Integration Test</b></summary>
//!
//! Wire the real handlers, behaviors and listeners and drive them through the mediator.
//! See `tests/integration_test.rs` in the mediator-sample crate.
//! </details>

use crate::behavior::{Next, NotificationBehavior, NotificationNext, PipelineBehavior};
use crate::cancel::CancellationSignal;
use crate::handler::{NotificationHandler, RequestHandler};
use crate::outcome::{Failure, Outcome};
use crate::request::{Notification, Request};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A request handler that answers from a queue of expectations.
///
/// Clones share the queue, so register a clone and keep the original for
/// [`verify`](Self::verify).
///
/// # Panics
///
/// Handling a request when no expectation is left panics.
pub struct MockHandler<R: Request> {
    expectations: Arc<Mutex<VecDeque<Outcome<R::Response>>>>,
    calls: Arc<AtomicUsize>,
}

impl<R: Request> Clone for MockHandler<R> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<R: Request> Default for MockHandler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Request> MockHandler<R> {
    /// Creates a mock handler with no expectations.
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Expects one more request.
    pub fn expect(&self) -> ExpectationBuilder<R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
        }
    }

    /// Number of requests handled so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }
}

#[async_trait]
impl<R: Request> RequestHandler<R> for MockHandler<R> {
    async fn handle(&self, _request: &R, _cancel: &CancellationSignal) -> Outcome<R::Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.expectations.lock().unwrap().pop_front();
        match next {
            Some(outcome) => outcome,
            None => panic!("Unexpected request: no expectation left"),
        }
    }
}

/// Builder for a single expectation.
pub struct ExpectationBuilder<R: Request> {
    expectations: Arc<Mutex<VecDeque<Outcome<R::Response>>>>,
}

impl<R: Request> ExpectationBuilder<R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R::Response) {
        self.expectations.lock().unwrap().push_back(Ok(value));
    }

    /// Sets the expectation to return a failure.
    pub fn return_err(self, failure: Failure) {
        self.expectations.lock().unwrap().push_back(Err(failure));
    }
}

// =============================================================================
// RECORDING HELPERS
// =============================================================================

/// Shared, ordered log of what ran.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().unwrap().push(entry.into());
    }

    /// Snapshot of everything recorded so far, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

/// Records `{name}-before` and `{name}-after` around the rest of the chain.
///
/// Works for requests and notifications alike.
pub struct RecordingBehavior {
    name: String,
    journal: Journal,
}

impl RecordingBehavior {
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            name: name.into(),
            journal: journal.clone(),
        }
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for RecordingBehavior {
    async fn handle(
        &self,
        request: &R,
        cancel: &CancellationSignal,
        next: Next<'_, R>,
    ) -> Outcome<R::Response> {
        self.journal.record(format!("{}-before", self.name));
        let outcome = next.run(request, cancel).await;
        self.journal.record(format!("{}-after", self.name));
        outcome
    }
}

#[async_trait]
impl<N: Notification> NotificationBehavior<N> for RecordingBehavior {
    async fn handle(
        &self,
        notification: &N,
        cancel: &CancellationSignal,
        next: NotificationNext<'_, N>,
    ) -> Outcome<()> {
        self.journal.record(format!("{}-before", self.name));
        let outcome = next.run(notification, cancel).await;
        self.journal.record(format!("{}-after", self.name));
        outcome
    }
}

/// Request handler that records its name and returns a fixed value.
pub struct RecordingHandler<V> {
    name: String,
    journal: Journal,
    response: V,
}

impl<V> RecordingHandler<V> {
    pub fn new(name: impl Into<String>, journal: &Journal, response: V) -> Self {
        Self {
            name: name.into(),
            journal: journal.clone(),
            response,
        }
    }
}

#[async_trait]
impl<R, V> RequestHandler<R> for RecordingHandler<V>
where
    R: Request<Response = V>,
    V: Clone + Send + Sync + 'static,
{
    async fn handle(&self, _request: &R, _cancel: &CancellationSignal) -> Outcome<V> {
        self.journal.record(self.name.clone());
        Ok(self.response.clone())
    }
}

/// Notification handler that records its name and succeeds.
pub struct RecordingNotificationHandler {
    name: String,
    journal: Journal,
}

impl RecordingNotificationHandler {
    pub fn new(name: impl Into<String>, journal: &Journal) -> Self {
        Self {
            name: name.into(),
            journal: journal.clone(),
        }
    }
}

#[async_trait]
impl<N: Notification> NotificationHandler<N> for RecordingNotificationHandler {
    async fn handle(&self, _notification: &N, _cancel: &CancellationSignal) -> Outcome<()> {
        self.journal.record(self.name.clone());
        Ok(())
    }
}

/// Notification handler that records its name and fails with the given cause.
pub struct FailingNotificationHandler {
    name: String,
    journal: Journal,
    failure: Failure,
}

impl FailingNotificationHandler {
    pub fn new(name: impl Into<String>, journal: &Journal, failure: Failure) -> Self {
        Self {
            name: name.into(),
            journal: journal.clone(),
            failure,
        }
    }
}

#[async_trait]
impl<N: Notification> NotificationHandler<N> for FailingNotificationHandler {
    async fn handle(&self, _notification: &N, _cancel: &CancellationSignal) -> Outcome<()> {
        self.journal.record(self.name.clone());
        Err(self.failure.clone())
    }
}

/// Returns the given failure without continuing the chain.
pub struct ShortCircuitBehavior {
    failure: Failure,
}

impl ShortCircuitBehavior {
    pub fn new(failure: Failure) -> Self {
        Self { failure }
    }
}

#[async_trait]
impl<R: Request> PipelineBehavior<R> for ShortCircuitBehavior {
    async fn handle(
        &self,
        _request: &R,
        _cancel: &CancellationSignal,
        _next: Next<'_, R>,
    ) -> Outcome<R::Response> {
        Err(self.failure.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandlerRegistry, Mediator};

    #[derive(Debug)]
    struct Count;
    impl Request for Count {
        type Response = u32;
    }

    #[tokio::test]
    async fn test_mock_handler_with_expectations() {
        let mock = MockHandler::<Count>::new();
        mock.expect().return_ok(1);
        mock.expect().return_err(Failure::conflict("busy"));

        let mediator = Mediator::new(
            HandlerRegistry::builder()
                .handler::<Count, _>(mock.clone())
                .build(),
        );

        assert_eq!(mediator.send_default(Count).await.unwrap(), Ok(1));
        let failure = mediator.send_default(Count).await.unwrap().unwrap_err();
        assert_eq!(failure.message(), "busy");

        assert_eq!(mock.calls(), 2);
        mock.verify();
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met. 1 remaining")]
    fn test_verify_panics_on_leftover_expectations() {
        let mock = MockHandler::<Count>::new();
        mock.expect().return_ok(5);
        mock.verify();
    }

    #[test]
    fn test_journal_clones_share_entries() {
        let journal = Journal::new();
        let copy = journal.clone();
        copy.record("one");
        journal.record("two");
        assert_eq!(journal.entries(), vec!["one", "two"]);
    }
}
