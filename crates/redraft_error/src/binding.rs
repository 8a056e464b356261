//! Parameter binding error types.

/// Binding failures between a synthesized statement and submitted values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum BindingErrorKind {
    /// A placeholder has no submitted value
    #[display("A value is required for bind parameter '{}'", _0)]
    MissingValue(String),
    /// A submitted value names no placeholder in the statement
    #[display("This statement does not define a bind parameter named '{}'", _0)]
    UnknownParameter(String),
}

/// Binding error with location tracking.
///
/// # Examples
///
/// ```
/// use redraft_error::{BindingError, BindingErrorKind};
///
/// let err = BindingError::new(BindingErrorKind::MissingValue("id".to_string()));
/// assert!(format!("{}", err).contains("'id'"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Binding Error: {} at line {} in {}", kind, line, file)]
pub struct BindingError {
    /// The kind of error that occurred
    pub kind: BindingErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl BindingError {
    /// Create a new binding error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BindingErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Message suitable for the submitting user, without location details.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}
