//! # Outcome: the Result Algebra
//!
//! Expected failures (validation, missing data, conflicts) travel as **values**, not as
//! panics. Every handler in the framework returns an [`Outcome<V>`], which is simply
//! `Result<V, Failure>`:
//!
//! - `Ok(())` is a plain success, `Ok(value)` a success carrying a value.
//! - `Err(failure)` is a failure carrying its [`Failure`] cause.
//!
//! Because `Outcome` *is* a `std::result::Result`, the standard combinators (`map`,
//! `and_then`, `?`) already work. This module adds the remaining vocabulary:
//!
//! | Operation | Sync | Async |
//! |-----------|------|-------|
//! | Map | [`Result::map`] | [`AsyncResultExt::map_async`] |
//! | Bind | [`ResultExt::bind`] | [`AsyncResultExt::bind_async`] |
//! | OnSuccess | [`ResultExt::on_success`] | [`AsyncResultExt::on_success_async`] |
//! | OnFailure | [`ResultExt::on_failure`] | [`AsyncResultExt::on_failure_async`] |
//! | Match | [`ResultExt::match_with`] | [`AsyncResultExt::match_async`] |
//!
//! ## Cause Identity
//!
//! A [`Failure`] is a thin `Arc` around its cause. Cloning it, mapping over a failed
//! outcome or binding a failed outcome never allocates a new cause, so the cause that
//! reaches the caller is the *same* one the innermost handler produced
//! ([`Failure::ptr_eq`] holds).
//!
//! ## Panics Are Not Failures
//!
//! A panic inside a transformation or side-effect closure propagates as a panic.
//! Nothing here converts it into a `Failure`; that is the job of an explicitly
//! registered boundary such as [`PanicBoundary`](crate::behaviors::PanicBoundary).
//!
//! ```rust
//! use mediator_framework::outcome::{Failure, Outcome, ResultExt};
//!
//! fn parse_price(raw: &str) -> Outcome<u32> {
//!     raw.parse().map_err(|_| Failure::field("price", "not a number"))
//! }
//!
//! let label = parse_price("42")
//!     .bind(|p| if p > 0 { Ok(p) } else { Err(Failure::field("price", "must be positive")) })
//!     .map(|p| format!("${p}"))
//!     .match_with(|ok| ok, |err| err.to_string());
//! assert_eq!(label, "$42");
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// The outcome of an operation whose expected failures are values.
pub type Outcome<V = ()> = Result<V, Failure>;

/// Builds a successful unit outcome.
pub fn success() -> Outcome<()> {
    Ok(())
}

/// Builds a successful outcome carrying `value`.
pub fn success_with<V>(value: V) -> Outcome<V> {
    Ok(value)
}

/// Builds a failed outcome carrying `cause`.
pub fn failure<V>(cause: Failure) -> Outcome<V> {
    Err(cause)
}

/// Broad category of a failure. The external layer maps these to responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Forbidden,
    Cancelled,
    Unexpected,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Validation => "validation",
            FailureKind::NotFound => "not_found",
            FailureKind::Conflict => "conflict",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::Forbidden => "forbidden",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single invalid field reported by a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct Cause {
    kind: FailureKind,
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

/// The cause carried by a failed [`Outcome`].
///
/// Cheap to clone: clones share one allocation, which is what lets the framework
/// promise that a cause is forwarded by identity and never rebuilt.
///
/// Equality compares content; use [`Failure::ptr_eq`] to compare identity.
#[derive(Debug, Clone)]
pub struct Failure {
    cause: Arc<Cause>,
}

impl Failure {
    /// Creates a failure with an explicit kind, machine-readable code and message.
    pub fn new(kind: FailureKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_fields(kind, code, message, Vec::new())
    }

    fn with_fields(
        kind: FailureKind,
        code: impl Into<String>,
        message: impl Into<String>,
        fields: Vec<FieldError>,
    ) -> Self {
        Self {
            cause: Arc::new(Cause {
                kind,
                code: code.into(),
                message: message.into(),
                fields,
            }),
        }
    }

    /// A validation failure listing every invalid field.
    pub fn validation(errors: Vec<FieldError>) -> Self {
        let message = if errors.is_empty() {
            "validation failed".to_string()
        } else {
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ")
        };
        Self::with_fields(FailureKind::Validation, "validation", message, errors)
    }

    /// A validation failure for a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError::new(field, message)])
    }

    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::new(
            FailureKind::NotFound,
            "not_found",
            format!("{what} was not found"),
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Conflict, "conflict", message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unauthorized, "unauthorized", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Forbidden, "forbidden", message)
    }

    /// The failure produced when a chain observes a cancellation request.
    pub fn cancelled() -> Self {
        Self::new(
            FailureKind::Cancelled,
            "cancelled",
            "operation was cancelled",
        )
    }

    /// Wraps a condition nobody planned for, typically at an explicit boundary.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Unexpected, "unexpected", message)
    }

    pub fn kind(&self) -> FailureKind {
        self.cause.kind
    }

    pub fn code(&self) -> &str {
        &self.cause.code
    }

    pub fn message(&self) -> &str {
        &self.cause.message
    }

    /// Invalid fields, empty unless this is a validation failure.
    pub fn field_errors(&self) -> &[FieldError] {
        &self.cause.fields
    }

    pub fn is_kind(&self, kind: FailureKind) -> bool {
        self.cause.kind == kind
    }

    /// Returns true when both values share the same underlying cause.
    pub fn ptr_eq(a: &Failure, b: &Failure) -> bool {
        Arc::ptr_eq(&a.cause, &b.cause)
    }

    /// Lifts this cause into a failed outcome of any value type.
    pub fn into_outcome<V>(self) -> Outcome<V> {
        Err(self)
    }
}

impl PartialEq for Failure {
    fn eq(&self, other: &Self) -> bool {
        Failure::ptr_eq(self, other) || self.cause == other.cause
    }
}

impl Eq for Failure {}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.cause.code, self.cause.message)
    }
}

impl std::error::Error for Failure {}

impl Serialize for Failure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.cause.serialize(serializer)
    }
}

/// Synchronous combinators missing from `std::result::Result`.
pub trait ResultExt<V, E>: Sized {
    /// Chains an operation that itself may fail. A failure short-circuits and
    /// is returned as-is; `f` is not called.
    fn bind<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(V) -> Result<U, E>;

    /// Runs `action` on success only and hands back the original result.
    fn on_success<F>(self, action: F) -> Self
    where
        F: FnOnce(&V);

    /// Runs `action` on failure only and hands back the original result.
    fn on_failure<F>(self, action: F) -> Self
    where
        F: FnOnce(&E);

    /// Runs exactly one of the two branches and returns its value.
    fn match_with<T, S, X>(self, on_success: S, on_failure: X) -> T
    where
        S: FnOnce(V) -> T,
        X: FnOnce(E) -> T;
}

impl<V, E> ResultExt<V, E> for Result<V, E> {
    fn bind<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(V) -> Result<U, E>,
    {
        match self {
            Ok(value) => f(value),
            Err(cause) => Err(cause),
        }
    }

    fn on_success<F>(self, action: F) -> Self
    where
        F: FnOnce(&V),
    {
        if let Ok(value) = &self {
            action(value);
        }
        self
    }

    fn on_failure<F>(self, action: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Err(cause) = &self {
            action(cause);
        }
        self
    }

    fn match_with<T, S, X>(self, on_success: S, on_failure: X) -> T
    where
        S: FnOnce(V) -> T,
        X: FnOnce(E) -> T,
    {
        match self {
            Ok(value) => on_success(value),
            Err(cause) => on_failure(cause),
        }
    }
}

/// Asynchronous combinators.
///
/// The suspension point is always inside the supplied closure; the result itself is
/// a plain value and is never awaited. Side-effect closures receive a reference and
/// must return a future that does not borrow it (clone what the future needs).
#[async_trait]
pub trait AsyncResultExt<V, E>: Sized + Send {
    async fn map_async<U, F, Fut>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(V) -> Fut + Send,
        Fut: Future<Output = U> + Send,
        U: Send;

    async fn bind_async<U, F, Fut>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(V) -> Fut + Send,
        Fut: Future<Output = Result<U, E>> + Send,
        U: Send;

    async fn on_success_async<F, Fut>(self, action: F) -> Self
    where
        F: FnOnce(&V) -> Fut + Send,
        Fut: Future<Output = ()> + Send;

    async fn on_failure_async<F, Fut>(self, action: F) -> Self
    where
        F: FnOnce(&E) -> Fut + Send,
        Fut: Future<Output = ()> + Send;

    async fn match_async<T, S, SFut, X, XFut>(self, on_success: S, on_failure: X) -> T
    where
        S: FnOnce(V) -> SFut + Send,
        SFut: Future<Output = T> + Send,
        X: FnOnce(E) -> XFut + Send,
        XFut: Future<Output = T> + Send,
        T: Send;
}

#[async_trait]
impl<V: Send, E: Send> AsyncResultExt<V, E> for Result<V, E> {
    async fn map_async<U, F, Fut>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(V) -> Fut + Send,
        Fut: Future<Output = U> + Send,
        U: Send,
    {
        match self {
            Ok(value) => Ok(f(value).await),
            Err(cause) => Err(cause),
        }
    }

    async fn bind_async<U, F, Fut>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(V) -> Fut + Send,
        Fut: Future<Output = Result<U, E>> + Send,
        U: Send,
    {
        match self {
            Ok(value) => f(value).await,
            Err(cause) => Err(cause),
        }
    }

    async fn on_success_async<F, Fut>(self, action: F) -> Self
    where
        F: FnOnce(&V) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        let pending = match &self {
            Ok(value) => Some(action(value)),
            Err(_) => None,
        };
        if let Some(fut) = pending {
            fut.await;
        }
        self
    }

    async fn on_failure_async<F, Fut>(self, action: F) -> Self
    where
        F: FnOnce(&E) -> Fut + Send,
        Fut: Future<Output = ()> + Send,
    {
        let pending = match &self {
            Ok(_) => None,
            Err(cause) => Some(action(cause)),
        };
        if let Some(fut) = pending {
            fut.await;
        }
        self
    }

    async fn match_async<T, S, SFut, X, XFut>(self, on_success: S, on_failure: X) -> T
    where
        S: FnOnce(V) -> SFut + Send,
        SFut: Future<Output = T> + Send,
        X: FnOnce(E) -> XFut + Send,
        XFut: Future<Output = T> + Send,
        T: Send,
    {
        match self {
            Ok(value) => on_success(value).await,
            Err(cause) => on_failure(cause).await,
        }
    }
}
