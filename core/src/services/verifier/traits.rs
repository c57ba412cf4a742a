//! Traits for the record store and decryption service collaborators.

use async_trait::async_trait;

use crate::domain::otp_record::{OtpRecord, RecordKey};
use crate::errors::{DecryptError, DomainResult};

/// Trait for the OTP record store.
///
/// Mutations take a [`RecordKey`] rather than a bare user id: the verifier
/// only ever touches the exact record it read, so a record superseded by a
/// concurrent re-issuance is never decremented or deleted by a stale
/// verification.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Fetch the most recent record for a user (descending by creation
    /// timestamp, limit 1).
    async fn latest_record(&self, user_id: &str) -> DomainResult<Option<OtpRecord>>;

    /// Overwrite the `attempts` field of one exact record. No other fields
    /// are touched.
    async fn set_attempts(&self, key: &RecordKey, attempts: i32) -> DomainResult<()>;

    /// Delete one exact record.
    async fn delete_record(&self, key: &RecordKey) -> DomainResult<()>;
}

/// Trait for the external decryption service.
#[async_trait]
pub trait OtpDecryptor: Send + Sync {
    /// Decrypt a base64-encoded ciphertext blob into the plaintext code.
    async fn decrypt(&self, ciphertext_b64: &str) -> Result<String, DecryptError>;
}
