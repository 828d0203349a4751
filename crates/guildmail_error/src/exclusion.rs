//! Channel exclusion error types.

/// Exclusion error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExclusionErrorKind {
    /// The (guild, channel) pair is not in the exclusion set.
    #[display("Channel {} is not excluded in guild {}", channel_id, guild_id)]
    NotFound {
        /// Guild the exclusion targets
        guild_id: i64,
        /// Channel that was not found
        channel_id: i64,
    },
    /// Store operation failed while touching exclusions.
    #[display("Store error: {}", _0)]
    Store(String),
}

/// Exclusion error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Exclusion Error: {} at line {} in {}", kind, line, file)]
pub struct ExclusionError {
    /// The kind of error that occurred
    pub kind: ExclusionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ExclusionError {
    /// Create a new ExclusionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExclusionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<crate::StoreError> for ExclusionError {
    #[track_caller]
    fn from(err: crate::StoreError) -> Self {
        ExclusionError::new(ExclusionErrorKind::Store(err.to_string()))
    }
}
