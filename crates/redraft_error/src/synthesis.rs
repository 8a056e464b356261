//! Statement synthesis error types.

/// Kinds of failures raised while rewriting a source query into an UPDATE.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SynthesisErrorKind {
    /// View options lack a usable column-role mapping
    #[display("{}", _0)]
    MalformedMapping(String),
    /// Mapping declares no identifier column, so the UPDATE would be unanchored
    #[display("Column mapping declares no identifier column; refusing to build an unscoped update")]
    MissingIdentifiers,
    /// Mapping declares no field column, so the SET clause would be empty
    #[display("Column mapping declares no field column; nothing to update")]
    MissingFields,
    /// Source query is outside the shape the keyword rewrite supports
    #[display("Unsupported source query: {}", _0)]
    UnsupportedQuery(String),
    /// A rewrite pattern failed to compile
    #[display("Invalid rewrite pattern: {}", _0)]
    Pattern(String),
}

/// Synthesis error with location tracking.
///
/// # Examples
///
/// ```
/// use redraft_error::{SynthesisError, SynthesisErrorKind};
///
/// let err = SynthesisError::new(SynthesisErrorKind::MissingIdentifiers);
/// assert!(format!("{}", err).contains("no identifier column"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Synthesis Error: {} at line {} in {}", kind, line, file)]
pub struct SynthesisError {
    /// The kind of error that occurred
    pub kind: SynthesisErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SynthesisError {
    /// Create a new synthesis error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SynthesisErrorKind) -> Self {
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
