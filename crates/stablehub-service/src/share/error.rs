//! Terminal outcomes of an anonymous share-link resolution.

use thiserror::Error;

use stablehub_core::error::AppError;

/// Why a share-link resolution did not grant access.
///
/// Every variant is terminal for the request; none is retried.
#[derive(Debug, Error)]
pub enum ShareAccessError {
    /// No link matches the token.
    #[error("Share link not found")]
    NotFound,
    /// The link's expiry instant has passed.
    #[error("Share link has expired")]
    Expired,
    /// A one-time link has no views left.
    #[error("Share link has reached its view limit")]
    Exhausted,
    /// The link is password protected and no password was supplied.
    #[error("This share link requires a password")]
    PasswordRequired,
    /// The supplied password does not match.
    #[error("Incorrect password")]
    PasswordInvalid,
    /// Too many wrong passwords from this client for this link.
    #[error("Too many incorrect password attempts, try again later")]
    TooManyAttempts,
    /// A backing store failed.
    #[error("Shared content is temporarily unavailable, try again later")]
    Upstream(#[from] AppError),
}

impl ShareAccessError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "SHARE_NOT_FOUND",
            Self::Expired => "SHARE_EXPIRED",
            Self::Exhausted => "SHARE_EXHAUSTED",
            Self::PasswordRequired => "PASSWORD_REQUIRED",
            Self::PasswordInvalid => "PASSWORD_INVALID",
            Self::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            Self::Upstream(_) => "UPSTREAM_FAILURE",
        }
    }
}
