//! Error types for the redraft write-back core.
//!
//! Every error carries the file and line where it was raised. Crate-level
//! code works with [`RedraftError`], which wraps any of the specific kinds.

mod binding;
mod config;
mod dispatch;
mod submission;
mod synthesis;

pub use binding::{BindingError, BindingErrorKind};
pub use config::ConfigError;
pub use dispatch::{DispatchError, DispatchErrorKind, INTERRUPTED_MESSAGE, is_cancellation_code};
pub use submission::{SubmissionError, SubmissionErrorKind};
pub use synthesis::{SynthesisError, SynthesisErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum RedraftErrorKind {
    /// Statement synthesis error
    #[display("{}", _0)]
    Synthesis(SynthesisError),
    /// Parameter binding error
    #[display("{}", _0)]
    Binding(BindingError),
    /// Engine dispatch error
    #[display("{}", _0)]
    Dispatch(DispatchError),
    /// Configuration error
    #[display("{}", _0)]
    Config(ConfigError),
    /// Form submission error
    #[display("{}", _0)]
    Submission(SubmissionError),
}

/// Redraft error with kind discrimination.
#[derive(Debug, derive_more::Display)]
#[display("Redraft Error: {}", _0)]
pub struct RedraftError(Box<RedraftErrorKind>);

impl RedraftError {
    /// Create a new error from a kind.
    pub fn new(kind: RedraftErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RedraftErrorKind {
        &self.0
    }
}

impl std::error::Error for RedraftError {}

// Generic From implementation for any type that converts to RedraftErrorKind
impl<T> From<T> for RedraftError
where
    T: Into<RedraftErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for redraft operations.
pub type RedraftResult<T> = std::result::Result<T, RedraftError>;
