//! Error types shared by the form controller, the auth client and the session context.
//!
//! Failures are split by who recovers them:
//!
//! - per-field validation messages never appear here; they live in
//!   [`FieldErrors`](crate::form::FieldErrors) and are rendered inline,
//! - [`AuthError`] is the expected domain failure (bad credentials, duplicate
//!   account) and is consumed by the form controller,
//! - everything else is unclassified and travels back to the caller of `submit`.

use thiserror::Error;

use crate::form::SubmitState;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitState, to: SubmitState },
}

pub type FormResult<T> = Result<T, FormError>;

/// Authentication or registration refused by the server, with a user-facing message.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to fetch session: {0}")]
    Fetch(String),
    #[error("session state lock poisoned while {0}")]
    StatePoisoned(&'static str),
}

/// Failure of an auth client call or of anything awaited in the same submission.
#[derive(Debug, Error)]
pub enum AuthFailure {
    #[error(transparent)]
    Rejected(#[from] AuthError),
    #[error("{0}")]
    Unclassified(BoxError),
}

impl AuthFailure {
    pub fn unclassified(error: impl Into<BoxError>) -> Self {
        AuthFailure::Unclassified(error.into())
    }
}

impl From<SessionError> for AuthFailure {
    fn from(error: SessionError) -> Self {
        AuthFailure::Unclassified(Box::new(error))
    }
}

/// Error channel of a submission. Only failures outside the auth domain arrive here.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("unhandled submit failure: {0}")]
    Unclassified(BoxError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
