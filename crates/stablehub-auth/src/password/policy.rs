//! Strength policy for share-link passwords.

use stablehub_core::config::AuthConfig;
use stablehub_core::error::AppError;

/// Validates share-link passwords chosen by members.
///
/// Share passwords are typed by external recipients, so the policy asks for
/// length and zxcvbn entropy rather than character-class rules.
#[derive(Debug, Clone)]
pub struct SharePasswordPolicy {
    min_length: usize,
}

impl SharePasswordPolicy {
    /// Creates a policy from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.share_password_min_length,
        }
    }

    /// Returns the first violation found, if any.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Share password must be at least {} characters long",
                self.min_length
            )));
        }

        if password.trim().is_empty() {
            return Err(AppError::validation("Share password must not be blank"));
        }

        let estimate = zxcvbn::zxcvbn(password, &[]);
        if estimate.score() < zxcvbn::Score::Two {
            return Err(AppError::validation(
                "Share password is too easy to guess. Use a longer or less common phrase.",
            ));
        }

        Ok(())
    }
}
