use std::fmt::{Debug, Formatter};

use crate::{AppError, AppResult};

/// Bearer token attached to every backend request.
///
/// The token value never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Creates a token from a raw value supplied by the auth collaborator.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Unauthorized(
                "bearer token must not be empty".to_owned(),
            ));
        }

        if trimmed.chars().any(char::is_whitespace) {
            return Err(AppError::Unauthorized(
                "bearer token must not contain whitespace".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl Debug for BearerToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("BearerToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::BearerToken;

    #[test]
    fn token_debug_is_redacted() {
        let token = BearerToken::new("secret-token").unwrap_or_else(|_| panic!("valid"));
        assert_eq!(format!("{token:?}"), "BearerToken(<redacted>)");
        assert_eq!(token.header_value(), "Bearer secret-token");
    }

    #[test]
    fn blank_token_is_rejected() {
        assert!(BearerToken::new("  ").is_err());
        assert!(BearerToken::new("two parts").is_err());
    }
}
