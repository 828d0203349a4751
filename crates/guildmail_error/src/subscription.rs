//! Subscription error types.

/// Subscription error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SubscriptionErrorKind {
    /// Email address failed the syntactic check.
    #[display("Invalid email address: {}", _0)]
    InvalidEmail(String),
    /// The (user, guild, email) triple is already registered.
    #[display("Subscription already exists for {} in guild {}", email, guild_id)]
    Duplicate {
        /// Guild the subscription targets
        guild_id: i64,
        /// Email already on file
        email: String,
    },
    /// Store operation failed while touching subscriptions.
    #[display("Store error: {}", _0)]
    Store(String),
}

/// Subscription error with source location tracking.
///
/// # Examples
///
/// ```
/// use guildmail_error::{SubscriptionError, SubscriptionErrorKind};
///
/// let err = SubscriptionError::new(SubscriptionErrorKind::InvalidEmail("bogus".into()));
/// assert!(format!("{}", err).contains("Invalid email"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Subscription Error: {} at line {} in {}", kind, line, file)]
pub struct SubscriptionError {
    /// The kind of error that occurred
    pub kind: SubscriptionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl SubscriptionError {
    /// Create a new SubscriptionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SubscriptionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<crate::StoreError> for SubscriptionError {
    #[track_caller]
    fn from(err: crate::StoreError) -> Self {
        SubscriptionError::new(SubscriptionErrorKind::Store(err.to_string()))
    }
}
