//! # Cancellation
//!
//! One dispatch call carries one [`CancellationSignal`] through every behavior and the
//! handler. The caller keeps the matching [`CancellationSource`] and may request
//! cancellation at any time.
//!
//! The chain itself checks the signal at every link boundary (see
//! [`Next::run`](crate::behavior::Next::run)): once cancellation has been requested, no
//! deeper link is entered and the outcome becomes [`Failure::cancelled`]. Work that is
//! already running is not interrupted; a handler that wants to stop early can
//! `select!` on [`CancellationSignal::cancelled`].
//!
//! The signal is a `tokio::sync::watch` receiver, so it is cheap to clone and can be
//! observed from any task.

use crate::outcome::{Failure, Outcome};
use tokio::sync::watch;

/// The owning half: requests cancellation.
#[derive(Debug)]
pub struct CancellationSource {
    sender: watch::Sender<bool>,
}

impl CancellationSource {
    /// Creates a source and the signal it controls.
    pub fn new() -> (Self, CancellationSignal) {
        let (sender, receiver) = watch::channel(false);
        (Self { sender }, CancellationSignal { receiver })
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    /// Hands out another signal bound to this source.
    pub fn signal(&self) -> CancellationSignal {
        CancellationSignal {
            receiver: self.sender.subscribe(),
        }
    }
}

/// The observing half, threaded through the chain.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    receiver: watch::Receiver<bool>,
}

impl CancellationSignal {
    /// A signal that is never cancelled.
    pub fn never() -> Self {
        let (_, receiver) = watch::channel(false);
        Self { receiver }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// `Err(Failure::cancelled())` once cancellation has been requested.
    pub fn check(&self) -> Outcome<()> {
        if self.is_cancelled() {
            Err(Failure::cancelled())
        } else {
            Ok(())
        }
    }

    /// Resolves when cancellation is requested. Never resolves if the source is
    /// dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut receiver = self.receiver.clone();
        if receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancellationSignal {
    fn default() -> Self {
        Self::never()
    }
}
