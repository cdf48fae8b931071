//! # Handler Registry
//!
//! The mediator does not know where handlers come from. It asks a [`HandlerLookup`]
//! for them on every call. This module defines that contract and ships the default
//! implementation, [`HandlerRegistry`]: a table keyed by the message's `TypeId`,
//! filled once at startup through [`RegistryBuilder`] and immutable afterwards.
//!
//! ## Lifetimes
//!
//! Every registration is either:
//!
//! - a **singleton**: one instance, shared by every call (`handler`, `behavior`, ...), or
//! - **transient**: a factory called on every resolve (`handler_factory`,
//!   `behavior_factory`, ...). Notification behaviors are resolved once per handler,
//!   so a transient notification behavior gets a fresh instance around each handler.
//!
//! ## Ordering
//!
//! Behaviors and notification handlers are returned in registration order. The first
//! registered behavior becomes the outermost link of the chain.
//!
//! ```rust
//! use async_trait::async_trait;
//! use mediator_framework::{
//!     CancellationSignal, HandlerLookup, HandlerRegistry, LoggingBehavior, Outcome, Request,
//!     RequestHandler,
//! };
//!
//! #[derive(Debug)]
//! struct Ping;
//! impl Request for Ping { type Response = &'static str; }
//!
//! struct PingHandler;
//!
//! #[async_trait]
//! impl RequestHandler<Ping> for PingHandler {
//!     async fn handle(&self, _: &Ping, _: &CancellationSignal) -> Outcome<&'static str> {
//!         Ok("pong")
//!     }
//! }
//!
//! let registry = HandlerRegistry::builder()
//!     .handler::<Ping, _>(PingHandler)
//!     .behavior::<Ping, _>(LoggingBehavior)
//!     .build();
//!
//! assert!(registry.resolve_handler::<Ping>().is_ok());
//! assert_eq!(registry.resolve_behaviors::<Ping>().len(), 1);
//! ```

use crate::behavior::{NotificationBehavior, PipelineBehavior};
use crate::error::DispatchError;
use crate::handler::{NotificationHandler, RequestHandler};
use crate::request::{short_type_name, Notification, Request};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Lookup contract consumed by the [`Mediator`](crate::Mediator).
///
/// Implementations must be deterministic: the same type always yields the same
/// ordering. Resolution is synchronous and must not have observable side effects
/// beyond building transient instances.
pub trait HandlerLookup: Send + Sync + 'static {
    /// Exactly one handler, or a configuration error.
    fn resolve_handler<R: Request>(&self) -> Result<Arc<dyn RequestHandler<R>>, DispatchError>;

    /// Behaviors for `R` in registration order; possibly empty.
    fn resolve_behaviors<R: Request>(&self) -> Vec<Arc<dyn PipelineBehavior<R>>>;

    /// Handlers for `N` in registration order; possibly empty.
    fn resolve_notification_handlers<N: Notification>(&self)
        -> Vec<Arc<dyn NotificationHandler<N>>>;

    /// Behaviors for `N` in registration order; possibly empty.
    fn resolve_notification_behaviors<N: Notification>(
        &self,
    ) -> Vec<Arc<dyn NotificationBehavior<N>>>;
}

/// How a registered component is produced on resolve.
enum Registration<T: ?Sized> {
    Singleton(Arc<T>),
    Transient(Arc<dyn Fn() -> Arc<T> + Send + Sync>),
}

impl<T: ?Sized> Registration<T> {
    fn resolve(&self) -> Arc<T> {
        match self {
            Registration::Singleton(instance) => instance.clone(),
            Registration::Transient(factory) => factory(),
        }
    }
}

/// Type-erased `Vec<Registration<_>>`, keyed by the message `TypeId`.
type Table = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

fn push<K: 'static, T: ?Sized + 'static>(table: &mut Table, registration: Registration<T>)
where
    Registration<T>: Send + Sync,
{
    let slot = table.entry(TypeId::of::<K>()).or_insert_with(|| {
        let empty: Box<dyn Any + Send + Sync> = Box::new(Vec::<Registration<T>>::new());
        empty
    });
    if let Some(list) = slot.downcast_mut::<Vec<Registration<T>>>() {
        list.push(registration);
    }
}

fn entries<K: 'static, T: ?Sized + 'static>(table: &Table) -> &[Registration<T>] {
    table
        .get(&TypeId::of::<K>())
        .and_then(|slot| slot.downcast_ref::<Vec<Registration<T>>>())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn resolve_all<K: 'static, T: ?Sized + 'static>(table: &Table) -> Vec<Arc<T>> {
    entries::<K, T>(table).iter().map(Registration::resolve).collect()
}

/// Explicit-registration implementation of [`HandlerLookup`].
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Table,
    behaviors: Table,
    notification_handlers: Table,
    notification_behaviors: Table,
    requests: Vec<&'static str>,
    notifications: Vec<&'static str>,
}

impl HandlerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Short names of request types with at least one handler, in first-registration order.
    pub fn registered_requests(&self) -> &[&'static str] {
        &self.requests
    }

    /// Short names of notification types with at least one handler.
    pub fn registered_notifications(&self) -> &[&'static str] {
        &self.notifications
    }

    pub fn handler_count<R: Request>(&self) -> usize {
        entries::<R, dyn RequestHandler<R>>(&self.handlers).len()
    }

    pub fn behavior_count<R: Request>(&self) -> usize {
        entries::<R, dyn PipelineBehavior<R>>(&self.behaviors).len()
    }

    pub fn notification_handler_count<N: Notification>(&self) -> usize {
        entries::<N, dyn NotificationHandler<N>>(&self.notification_handlers).len()
    }
}

impl HandlerLookup for HandlerRegistry {
    fn resolve_handler<R: Request>(&self) -> Result<Arc<dyn RequestHandler<R>>, DispatchError> {
        match entries::<R, dyn RequestHandler<R>>(&self.handlers) {
            [] => Err(DispatchError::MissingHandler {
                request_type: short_type_name::<R>(),
            }),
            [only] => Ok(only.resolve()),
            many => Err(DispatchError::AmbiguousHandler {
                request_type: short_type_name::<R>(),
                count: many.len(),
            }),
        }
    }

    fn resolve_behaviors<R: Request>(&self) -> Vec<Arc<dyn PipelineBehavior<R>>> {
        resolve_all::<R, dyn PipelineBehavior<R>>(&self.behaviors)
    }

    fn resolve_notification_handlers<N: Notification>(
        &self,
    ) -> Vec<Arc<dyn NotificationHandler<N>>> {
        resolve_all::<N, dyn NotificationHandler<N>>(&self.notification_handlers)
    }

    fn resolve_notification_behaviors<N: Notification>(
        &self,
    ) -> Vec<Arc<dyn NotificationBehavior<N>>> {
        resolve_all::<N, dyn NotificationBehavior<N>>(&self.notification_behaviors)
    }
}

/// Builder for [`HandlerRegistry`]. Registration order is preserved.
#[derive(Default)]
pub struct RegistryBuilder {
    registry: HandlerRegistry,
}

impl RegistryBuilder {
    /// Registers a shared handler instance for `R`.
    pub fn handler<R: Request, H: RequestHandler<R>>(mut self, handler: H) -> Self {
        let instance: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        self.add_handler::<R>(Registration::Singleton(instance));
        self
    }

    /// Registers a factory building a new handler for every dispatch of `R`.
    pub fn handler_factory<R, H, F>(mut self, factory: F) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let factory: Arc<dyn Fn() -> Arc<dyn RequestHandler<R>> + Send + Sync> =
            Arc::new(move || Arc::new(factory()) as Arc<dyn RequestHandler<R>>);
        self.add_handler::<R>(Registration::Transient(factory));
        self
    }

    /// Registers a behavior instance shared by every dispatch of `R`.
    pub fn behavior<R: Request, B: PipelineBehavior<R>>(mut self, behavior: B) -> Self {
        let instance: Arc<dyn PipelineBehavior<R>> = Arc::new(behavior);
        push::<R, dyn PipelineBehavior<R>>(
            &mut self.registry.behaviors,
            Registration::Singleton(instance),
        );
        self
    }

    /// Registers a factory building a fresh behavior for every dispatch of `R`.
    pub fn behavior_factory<R, B, F>(mut self, factory: F) -> Self
    where
        R: Request,
        B: PipelineBehavior<R>,
        F: Fn() -> B + Send + Sync + 'static,
    {
        let factory: Arc<dyn Fn() -> Arc<dyn PipelineBehavior<R>> + Send + Sync> =
            Arc::new(move || Arc::new(factory()) as Arc<dyn PipelineBehavior<R>>);
        push::<R, dyn PipelineBehavior<R>>(
            &mut self.registry.behaviors,
            Registration::Transient(factory),
        );
        self
    }

    /// Adds a shared handler for `N`. Handlers run in registration order.
    pub fn notification_handler<N, H>(mut self, handler: H) -> Self
    where
        N: Notification,
        H: NotificationHandler<N>,
    {
        let instance: Arc<dyn NotificationHandler<N>> = Arc::new(handler);
        self.add_notification_handler::<N>(Registration::Singleton(instance));
        self
    }

    pub fn notification_handler_factory<N, H, F>(mut self, factory: F) -> Self
    where
        N: Notification,
        H: NotificationHandler<N>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let factory: Arc<dyn Fn() -> Arc<dyn NotificationHandler<N>> + Send + Sync> =
            Arc::new(move || Arc::new(factory()) as Arc<dyn NotificationHandler<N>>);
        self.add_notification_handler::<N>(Registration::Transient(factory));
        self
    }

    /// Adds a behavior instance shared by every handler of `N`.
    pub fn notification_behavior<N, B>(mut self, behavior: B) -> Self
    where
        N: Notification,
        B: NotificationBehavior<N>,
    {
        let instance: Arc<dyn NotificationBehavior<N>> = Arc::new(behavior);
        push::<N, dyn NotificationBehavior<N>>(
            &mut self.registry.notification_behaviors,
            Registration::Singleton(instance),
        );
        self
    }

    /// Adds a factory building a fresh behavior around each handler of `N`.
    pub fn notification_behavior_factory<N, B, F>(mut self, factory: F) -> Self
    where
        N: Notification,
        B: NotificationBehavior<N>,
        F: Fn() -> B + Send + Sync + 'static,
    {
        let factory: Arc<dyn Fn() -> Arc<dyn NotificationBehavior<N>> + Send + Sync> =
            Arc::new(move || Arc::new(factory()) as Arc<dyn NotificationBehavior<N>>);
        push::<N, dyn NotificationBehavior<N>>(
            &mut self.registry.notification_behaviors,
            Registration::Transient(factory),
        );
        self
    }

    pub fn build(self) -> HandlerRegistry {
        let registry = self.registry;
        info!(
            requests = registry.requests.len(),
            notifications = registry.notifications.len(),
            "Handler registry built"
        );
        registry
    }

    fn add_handler<R: Request>(&mut self, registration: Registration<dyn RequestHandler<R>>) {
        let name = short_type_name::<R>();
        if !self.registry.handlers.contains_key(&TypeId::of::<R>()) {
            self.registry.requests.push(name);
        }
        push::<R, dyn RequestHandler<R>>(&mut self.registry.handlers, registration);
    }

    fn add_notification_handler<N: Notification>(
        &mut self,
        registration: Registration<dyn NotificationHandler<N>>,
    ) {
        let name = short_type_name::<N>();
        if !self
            .registry
            .notification_handlers
            .contains_key(&TypeId::of::<N>())
        {
            self.registry.notifications.push(name);
        }
        push::<N, dyn NotificationHandler<N>>(
            &mut self.registry.notification_handlers,
            registration,
        );
    }
}
