//! # Mediator Framework
//!
//! This crate provides the building blocks for an in-process **mediator**: callers describe
//! *what* they want as a typed message, and the mediator routes it to whoever handles it,
//! wrapped in a configurable chain of cross-cutting behaviors.
//!
//! ## Why a Mediator?
//!
//! Callers and handlers never reference each other. A web endpoint that creates an item
//! only knows the `CreateItem` request type; the handler that persists it only knows the
//! same type. Logging, validation and panic handling are registered once as behaviors
//! instead of being repeated in every handler.
//!
//! Two styles of message are supported:
//!
//! - **Requests** ([`Request`]) go to **exactly one** handler and produce a typed
//!   [`Outcome`]. Dispatched with [`Mediator::send`].
//! - **Notifications** ([`Notification`]) go to **zero or more** handlers and produce
//!   nothing. Broadcast with [`Mediator::publish`].
//!
//! **Further Reading**:
//! - [Mediator pattern (Wikipedia)](https://en.wikipedia.org/wiki/Mediator_pattern)
//! - [Railway Oriented Programming](https://fsharpforfunandprofit.com/rop/) - the idea behind the `Outcome` combinators
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Message Layer** ([`Request`], [`Notification`], [`Outcome`]) - Your data and results
//! 2. **Wiring Layer** ([`HandlerRegistry`]) - Who handles what, in which chain
//! 3. **Dispatch Layer** ([`Mediator`]) - Builds the chain per call and runs it
//!
//! ```text
//!            send(CreateItem)
//! caller ───────────────────▶ Mediator ──▶ LoggingBehavior ──▶ ValidationBehavior ──▶ handler
//!        ◀─────────────────── Outcome  ◀──────────────────◀───────────────────────◀──┘
//! ```
//!
//! ## Core Abstractions
//!
//! ### [`RequestHandler`] - The Business Logic
//!
//! ```rust
//! use async_trait::async_trait;
//! use mediator_framework::{
//!     CancellationSignal, Failure, HandlerRegistry, LoggingBehavior, Mediator, Outcome,
//!     Request, RequestHandler,
//! };
//!
//! // 1. Define the Request
//! #[derive(Debug)]
//! struct Divide { a: i64, b: i64 }
//! impl Request for Divide { type Response = i64; }
//!
//! // 2. Define the Handler
//! struct DivideHandler;
//!
//! #[async_trait]
//! impl RequestHandler<Divide> for DivideHandler {
//!     async fn handle(&self, req: &Divide, _cancel: &CancellationSignal) -> Outcome<i64> {
//!         if req.b == 0 {
//!             return Err(Failure::field("b", "must not be zero"));
//!         }
//!         Ok(req.a / req.b)
//!     }
//! }
//!
//! // 3. Wire and use it
//! #[tokio::main]
//! async fn main() {
//!     let registry = HandlerRegistry::builder()
//!         .handler::<Divide, _>(DivideHandler)
//!         .behavior::<Divide, _>(LoggingBehavior)
//!         .build();
//!     let mediator = Mediator::new(registry);
//!
//!     let ok = mediator.send_default(Divide { a: 10, b: 2 }).await.unwrap();
//!     assert_eq!(ok, Ok(5));
//!
//!     let failed = mediator.send_default(Divide { a: 1, b: 0 }).await.unwrap();
//!     assert_eq!(failed.unwrap_err().field_errors()[0].field, "b");
//! }
//! ```
//!
//! ### [`Outcome`] - Results as Values
//!
//! `Outcome<V>` is a plain `Result<V, Failure>`. [`ResultExt`] and [`AsyncResultExt`] add
//! the combinators for side effects and branching (`on_success`, `on_failure`, `bind`,
//! `match_with` and their `_async` forms). A `Failure` keeps its identity through every
//! combinator and every behavior, so the caller sees the exact cause that was produced.
//!
//! ## Two Error Channels
//!
//! - `Outcome` carries **business** failures (validation, not found, conflict...).
//! - [`DispatchError`] carries **wiring** problems (no handler registered, two handlers
//!   registered, a failing notification handler). Those come back on the outer `Result`
//!   of `send`/`publish`.
//!
//! ## Concurrency Model
//!
//! - The mediator never spawns; every call runs on the caller's task
//! - Notification handlers run **sequentially**, in registration order
//! - Cancellation is cooperative: see [`CancellationSource`]
//! - `Mediator` is `Clone` and shares its registry between clones
//!
//! ## Testing
//!
//! The [`mock`] module provides `MockHandler`, which stands in for a real handler and
//! answers from a queue of expectations, plus recording helpers for asserting chain order.

pub mod behavior;
pub mod behaviors;
pub mod cancel;
pub mod config;
pub mod error;
pub mod handler;
pub mod mediator;
pub mod mock;
pub mod outcome;
pub mod registry;
pub mod request;
pub mod tracing;

// Re-export core types for convenience
pub use behavior::{Next, NotificationBehavior, NotificationNext, PipelineBehavior};
pub use behaviors::{LoggingBehavior, PanicBoundary, ValidationBehavior, Validator};
pub use cancel::{CancellationSignal, CancellationSource};
pub use config::{MediatorConfig, PublishStrategy};
pub use error::{DispatchError, HandlerFailure};
pub use handler::{NotificationHandler, RequestHandler};
pub use mediator::Mediator;
pub use outcome::{
    failure, success, success_with, AsyncResultExt, Failure, FailureKind, FieldError, Outcome,
    ResultExt,
};
pub use registry::{HandlerLookup, HandlerRegistry, RegistryBuilder};
pub use request::{Notification, Request};
