//! Stored OTP record entity.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// Attempts granted to a record whose stored item carries no `attempts`
/// attribute (the store default at issuance time).
pub const DEFAULT_ATTEMPTS: i32 = 3;

/// One issued OTP as it sits in the record store.
///
/// A user may accumulate several rows over time; only the one with the
/// latest `creation_timestamp` is ever considered current. The code itself
/// is held as a base64-encoded ciphertext blob and decrypted on demand,
/// never stored in plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Opaque user identifier (partition key).
    pub user_id: String,

    /// Creation instant (sort key); lexically sortable timestamp string.
    pub creation_timestamp: String,

    /// Base64-encoded ciphertext of the OTP code.
    pub otp_code: String,

    /// ISO-8601 instant after which the record is invalid.
    pub expiration_timestamp: String,

    /// Remaining verification attempts.
    pub attempts: i32,
}

/// Identity of one exact record: the `(user_id, creation_timestamp)` pair
/// read at the start of a verification. All mutations are keyed by it so a
/// verifier never touches a record superseded by a newer issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    pub user_id: String,
    pub creation_timestamp: String,
}

impl OtpRecord {
    /// The key identifying this exact record.
    pub fn key(&self) -> RecordKey {
        RecordKey {
            user_id: self.user_id.clone(),
            creation_timestamp: self.creation_timestamp.clone(),
        }
    }

    /// Parses the expiration timestamp.
    ///
    /// Accepts RFC 3339 as well as a naive ISO-8601 timestamp, which is
    /// interpreted as UTC (issuers write `datetime.isoformat()`-style
    /// strings without an offset). An unparseable value is an internal
    /// fault, not a business outcome.
    pub fn expires_at(&self) -> DomainResult<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(&self.expiration_timestamp) {
            return Ok(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(&self.expiration_timestamp, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|e| DomainError::Internal {
                message: format!(
                    "Invalid expiration_timestamp '{}': {}",
                    self.expiration_timestamp, e
                ),
            })
    }

    /// Whether the record is invalid at `now` (strictly after expiration).
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> DomainResult<bool> {
        Ok(now > self.expires_at()?)
    }
}
