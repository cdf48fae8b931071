//! # Logging Setup
//!
//! The mediator logs through the `tracing` facade and never installs a subscriber
//! itself. Binaries call [`setup_tracing`] once at startup.
//!
//! What gets logged where:
//!
//! | Level | Events |
//! |-------|--------|
//! | `info` | registry built, request/notification handled (with `LoggingBehavior`) |
//! | `warn` | failed outcomes, failing notification handlers, validation rejections |
//! | `error` | missing or ambiguous handler at dispatch |
//! | `debug` | chain construction, cancellation, request payloads |
//!
//! `send` and `publish` run inside `info` spans named `send` / `publish` carrying the
//! message type, so handler logs inherit that context.
//!
//! ```bash
//! RUST_LOG=info cargo run      # Compact logs
//! RUST_LOG=debug cargo run     # Full payloads
//! ```

/// Initializes the tracing subscriber with `RUST_LOG` based filtering.
///
/// Defaults to `info` when `RUST_LOG` is unset. Calling it twice is harmless; the
/// second call leaves the first subscriber in place.
///
/// # Example
///
/// ```ignore
/// setup_tracing();
/// tracing::info!("Application started");
/// ```
pub fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
