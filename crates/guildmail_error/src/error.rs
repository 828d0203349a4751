//! Top-level error wrapper types.

use crate::{ConfigError, ExclusionError, MailError, StoreError, SubscriptionError};

/// Foundation error enum covering every guildmail error domain.
///
/// # Examples
///
/// ```
/// use guildmail_error::{ConfigError, GuildmailError};
///
/// let cfg_err = ConfigError::new("missing mail endpoint");
/// let err: GuildmailError = cfg_err.into();
/// assert!(format!("{}", err).contains("Config Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum GuildmailErrorKind {
    /// Persisted store failure
    #[from(StoreError)]
    Store(StoreError),
    /// Subscription validation or duplicate failure
    #[from(SubscriptionError)]
    Subscription(SubscriptionError),
    /// Exclusion set failure
    #[from(ExclusionError)]
    Exclusion(ExclusionError),
    /// Mail transport failure
    #[from(MailError)]
    Mail(MailError),
    /// Configuration failure
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Guildmail error with kind discrimination.
///
/// # Examples
///
/// ```
/// use guildmail_error::{GuildmailResult, StoreError, StoreErrorKind};
///
/// fn might_fail() -> GuildmailResult<()> {
///     Err(StoreError::new(StoreErrorKind::NotFound))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Guildmail Error: {}", _0)]
pub struct GuildmailError(Box<GuildmailErrorKind>);

impl GuildmailError {
    /// Create a new error from a kind.
    pub fn new(kind: GuildmailErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GuildmailErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to GuildmailErrorKind
impl<T> From<T> for GuildmailError
where
    T: Into<GuildmailErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for guildmail operations.
pub type GuildmailResult<T> = std::result::Result<T, GuildmailError>;
