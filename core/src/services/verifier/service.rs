//! Main verifier implementation.

use std::sync::Arc;

use chrono::Utc;
use constant_time_eq::constant_time_eq;

use crate::errors::DomainResult;

use super::traits::{OtpDecryptor, OtpStore};
use super::types::VerificationOutcome;

/// Verifier for user-submitted OTP codes.
///
/// Both collaborators are injected at construction and shared across calls;
/// the verifier itself holds no per-call state, so one instance serves the
/// whole process.
pub struct OtpVerifier<S: OtpStore, D: OtpDecryptor> {
    /// Record store holding issued OTPs.
    store: Arc<S>,
    /// Decryption service for the stored ciphertext blobs.
    decryptor: Arc<D>,
}

impl<S: OtpStore, D: OtpDecryptor> OtpVerifier<S, D> {
    /// Create a new verifier.
    ///
    /// # Arguments
    ///
    /// * `store` - OTP record store implementation
    /// * `decryptor` - Decryption service implementation
    pub fn new(store: Arc<S>, decryptor: Arc<D>) -> Self {
        Self { store, decryptor }
    }

    /// Verify a candidate OTP for a user.
    ///
    /// This method:
    /// 1. Fetches the most recent record for the user (limit 1, descending)
    /// 2. Decrypts the stored ciphertext
    /// 3. Compares the plaintext to the candidate in constant time
    /// 4. On mismatch, decrements attempts and deletes the record once they
    ///    are exhausted
    /// 5. On match, checks expiration and deletes the record either way
    ///    (verification is single-use)
    ///
    /// Expiration is consulted only after a correct match; wrong guesses
    /// against an expired record still consume attempts. Callers must have
    /// validated that both arguments are non-empty.
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationOutcome)` - Business outcome of the attempt
    /// * `Err(DomainError)` - Store failure or unexpected internal fault
    pub async fn verify(
        &self,
        user_id: &str,
        otp_entered: &str,
    ) -> DomainResult<VerificationOutcome> {
        let record = match self.store.latest_record(user_id).await? {
            Some(record) => record,
            None => {
                tracing::info!(
                    user_id,
                    event = "otp_record_not_found",
                    "No active OTP record for user"
                );
                return Ok(VerificationOutcome::NoActiveOtp);
            }
        };
        let key = record.key();

        let plaintext = match self.decryptor.decrypt(&record.otp_code).await {
            Ok(plaintext) => plaintext,
            Err(e) => {
                // Server-side failure, not an attempt-consuming event: the
                // record is left exactly as it was read.
                tracing::error!(
                    user_id,
                    creation_timestamp = %key.creation_timestamp,
                    error = %e,
                    event = "otp_decryption_failed",
                    "Failed to decrypt stored OTP"
                );
                return Ok(VerificationOutcome::DecryptionFailure);
            }
        };

        if !Self::codes_match(&plaintext, otp_entered) {
            let remaining = record.attempts - 1;
            self.store.set_attempts(&key, remaining).await?;

            if remaining <= 0 {
                self.store.delete_record(&key).await?;
                tracing::warn!(
                    user_id,
                    creation_timestamp = %key.creation_timestamp,
                    event = "otp_attempts_exhausted",
                    "Verification attempts exhausted, record deleted"
                );
                return Ok(VerificationOutcome::TooManyAttempts);
            }

            tracing::warn!(
                user_id,
                creation_timestamp = %key.creation_timestamp,
                remaining_attempts = remaining,
                event = "otp_mismatch",
                "Candidate OTP did not match"
            );
            return Ok(VerificationOutcome::InvalidOtp);
        }

        // Correct code. The record is consumed regardless of which way the
        // expiration check goes.
        let expires_at = record.expires_at()?;
        self.store.delete_record(&key).await?;

        if Utc::now() > expires_at {
            tracing::info!(
                user_id,
                creation_timestamp = %key.creation_timestamp,
                expiration_timestamp = %record.expiration_timestamp,
                event = "otp_expired",
                "Matched OTP had already expired, record deleted"
            );
            return Ok(VerificationOutcome::Expired);
        }

        tracing::info!(
            user_id,
            creation_timestamp = %key.creation_timestamp,
            event = "otp_verified",
            "OTP verified successfully, record deleted"
        );
        Ok(VerificationOutcome::Success)
    }

    /// Constant-time comparison of the stored and candidate codes.
    ///
    /// Exact, case-sensitive equality with no normalization; the comparison
    /// time does not depend on where the codes differ.
    fn codes_match(stored: &str, candidate: &str) -> bool {
        if stored.len() != candidate.len() {
            return false;
        }
        constant_time_eq(stored.as_bytes(), candidate.as_bytes())
    }
}
