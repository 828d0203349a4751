//! Mail transport error types.

/// Mail transport error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MailErrorKind {
    /// Transient transport failure (connection reset, 5xx, DNS).
    #[display("Mail transport error: {}", _0)]
    Transport(String),
    /// The provider rejected the message outright (4xx).
    #[display("Mail rejected by provider: {}", _0)]
    Rejected(String),
    /// The send attempt exceeded the configured deadline.
    #[display("Mail send timed out after {} seconds", _0)]
    Timeout(u64),
    /// Transport misconfiguration (bad endpoint, missing credentials).
    #[display("Mail configuration error: {}", _0)]
    Configuration(String),
}

impl MailErrorKind {
    /// Whether a retry has any chance of succeeding.
    pub fn is_transient(&self) -> bool {
        matches!(self, MailErrorKind::Transport(_) | MailErrorKind::Timeout(_))
    }
}

/// Mail error with source location tracking.
///
/// # Examples
///
/// ```
/// use guildmail_error::{MailError, MailErrorKind};
///
/// let err = MailError::new(MailErrorKind::Timeout(10));
/// assert!(format!("{}", err).contains("timed out"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Mail Error: {} at line {} in {}", kind, line, file)]
pub struct MailError {
    /// The kind of error that occurred
    pub kind: MailErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MailError {
    /// Create a new MailError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MailErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Whether a retry has any chance of succeeding.
    pub fn is_transient(&self) -> bool {
        self.kind.is_transient()
    }
}
