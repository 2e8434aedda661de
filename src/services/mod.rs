//! Services: sessions that drive the designer core against the backend.
//!
//! DESIGN
//! ======
//! Each screen of the builder is a session that owns its state and is
//! driven through `&mut self`, so a multi-stage load finishes one request
//! before issuing the next. Sessions hold an `Arc<dyn FormApi>`; tests pass
//! in-memory mocks.
//!
//! Submits are split into `begin_*` (validate, mark in flight, build the
//! request), an executor that only borrows the API, and `complete_*`
//! (apply the outcome). The convenience method runs all three. A second
//! `begin_*` while one is pending is rejected with [`SessionError::Busy`].
//!
//! ERROR HANDLING
//! ==============
//! Every failure is shown as an error notification and also returned to the
//! caller. Nothing is retried and nothing is fatal; the session stays usable.
//! After `unmount`, completions are dropped with [`SessionError::Unmounted`].

pub mod concepts;
pub mod form_detail;
pub mod forms;
pub mod notify;
pub mod translations;

use designer::error::ValidationError;

use crate::api::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A backend request failed; `message` is what the user was shown.
    #[error("{message}")]
    Network {
        message: String,
        #[source]
        source: ApiError,
    },

    /// The current state cannot be submitted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The form could not be serialized for saving.
    #[error("form serialization failed: {0}")]
    Serialize(String),

    /// A submit for this session is already in flight.
    #[error("a request is already in progress")]
    Busy,

    /// The operation needs data that has not been loaded yet.
    #[error("form is not loaded")]
    NotLoaded,

    /// The session was torn down before the request completed.
    #[error("session is no longer mounted")]
    Unmounted,
}

impl SessionError {
    /// A network failure shown with the API error's own text.
    #[must_use]
    pub fn network(source: ApiError) -> Self {
        Self::Network { message: source.to_string(), source }
    }

    /// A network failure shown with a fixed user-facing message.
    #[must_use]
    pub fn network_with(message: impl Into<String>, source: ApiError) -> Self {
        Self::Network { message: message.into(), source }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Network { source, .. } => source.error_code(),
            Self::Validation(e) => e.error_code(),
            Self::Serialize(_) => "E_SERIALIZE",
            Self::Busy => "E_BUSY",
            Self::NotLoaded => "E_NOT_LOADED",
            Self::Unmounted => "E_UNMOUNTED",
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
