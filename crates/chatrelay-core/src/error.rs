//! Error taxonomy for the relay core.

use thiserror::Error;

/// Everything that can go wrong while servicing one completion request.
///
/// None of these are fatal to the process: the offending request fails and
/// the bridge keeps serving subsequent requests. `BackendNotReady`
/// additionally triggers replacement of the active token channel so the
/// aborted turn cannot contaminate the next one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RelayError {
    /// No backend connection is currently registered.
    #[error("no backend connection established")]
    NoBackendAvailable,

    /// The caller's message sequence is empty or malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested model is not in the advertised catalog.
    #[error("model not found: {0}")]
    UnknownModel(String),

    /// Forwarding the prompt to the backend did not complete in time.
    #[error("timed out sending prompt to backend")]
    SendTimeout,

    /// No token or sentinel arrived on the channel within the timeout.
    #[error("backend did not respond in time")]
    ReceiveTimeout,

    /// The backend signalled it cannot service the request.
    #[error("backend not ready")]
    BackendNotReady,
}
