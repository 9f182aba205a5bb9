//! Error-first completion handles for callback-style setup and teardown.

use thiserror::Error;
use tokio::sync::oneshot;

use crate::errors::BoxError;

/// Failures of the completion handle itself, as opposed to errors the
/// callback reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// The handle was dropped without being called.
    #[error("completion callback dropped without being called")]
    Dropped,

    /// The handle was called with neither an error nor a value.
    #[error("completion callback reported neither an error nor a value")]
    Empty,
}

/// Completion handle passed to callback-style setup and teardown functions.
///
/// Follows the `(error, value)` convention: an error rejects the phase,
/// otherwise the value resolves it. The handle may be moved to another task
/// and called later.
///
/// ```rust,ignore
/// let server = ResourceDescriptor::from_callback(|_cx, done| {
///     tokio::spawn(async move {
///         match Server::bind("127.0.0.1:0").await {
///             Ok(server) => done.call(None, Some(server)),
///             Err(e) => done.call(Some(e.into()), None),
///         }
///     });
/// });
/// ```
#[derive(Debug)]
pub struct Done<T> {
    tx: oneshot::Sender<Result<T, BoxError>>,
}

impl<T> Done<T> {
    /// Completes with the error-first convention.
    pub fn call(self, error: Option<BoxError>, value: Option<T>) {
        let outcome = match (error, value) {
            (Some(error), _) => Err(error),
            (None, Some(value)) => Ok(value),
            (None, None) => Err(CallbackError::Empty.into()),
        };
        self.send(outcome);
    }

    /// Resolves with a value.
    pub fn ok(self, value: T) {
        self.send(Ok(value));
    }

    /// Rejects with an error.
    pub fn fail(self, error: impl Into<BoxError>) {
        self.send(Err(error.into()));
    }

    /// Completes from a `Result`.
    pub fn complete<E: Into<BoxError>>(self, result: Result<T, E>) {
        self.send(result.map_err(Into::into));
    }

    fn send(self, outcome: Result<T, BoxError>) {
        // The receiver only goes away when the sequence itself was dropped.
        if self.tx.send(outcome).is_err() {
            tracing::debug!("completion callback called after its sequence was dropped");
        }
    }
}

/// Receiving half of a [`Done`].
pub(crate) struct Pending<T> {
    rx: oneshot::Receiver<Result<T, BoxError>>,
}

impl<T> Pending<T> {
    pub(crate) async fn wait(self) -> Result<T, BoxError> {
        self.rx.await.map_err(|_| CallbackError::Dropped)?
    }
}

pub(crate) fn completion<T>() -> (Done<T>, Pending<T>) {
    let (tx, rx) = oneshot::channel();
    (Done { tx }, Pending { rx })
}
