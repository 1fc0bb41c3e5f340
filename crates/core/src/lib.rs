//! Shared primitives for all Rust crates in Marketdesk.

#![forbid(unsafe_code)]

/// Authentication primitives shared across crates.
pub mod auth;
/// Interface language primitives.
pub mod locale;

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::BearerToken;
pub use locale::Language;

/// Result type used across Marketdesk crates.
pub type AppResult<T> = Result<T, AppError>;

static PROVISIONAL_SEQUENCE: AtomicI64 = AtomicI64::new(0);

/// Record identifier assigned by the backend.
///
/// Provisional identifiers are minted locally for optimistic inserts. They are
/// always negative, so they never collide with a server-assigned id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Creates an identifier from a server-assigned value.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Mints a provisional identifier from the current timestamp.
    #[must_use]
    pub fn provisional() -> Self {
        let millis = chrono::Utc::now().timestamp_millis().max(1);
        let sequence = PROVISIONAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(-(millis.saturating_mul(1000).saturating_add(sequence.rem_euclid(1000))))
    }

    /// Returns whether the identifier was minted locally.
    #[must_use]
    pub fn is_provisional(&self) -> bool {
        self.0 < 0
    }

    /// Returns the underlying integer value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error, including transport failures.
    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::RecordId;

    #[test]
    fn provisional_ids_are_negative_and_unique() {
        let first = RecordId::provisional();
        let second = RecordId::provisional();
        assert!(first.is_provisional());
        assert!(second.is_provisional());
        assert_ne!(first, second);
        assert!(!RecordId::new(42).is_provisional());
    }

    #[test]
    fn record_id_serializes_as_integer() {
        let json = serde_json::to_string(&RecordId::new(42)).unwrap_or_default();
        assert_eq!(json, "42");
    }
}
