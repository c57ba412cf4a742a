//! Domain-specific error types and error handling.

use thiserror::Error;

/// Core domain errors.
///
/// Business outcomes (wrong code, expired code, exhausted attempts) are not
/// errors; they are returned as normal results. These variants cover the
/// dependency failures and unexpected faults that the transport maps to a
/// generic server-side failure.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Failure to recover plaintext from a stored ciphertext blob.
///
/// Kept separate from [`DomainError`] because decryption failure is its own
/// business-visible outcome: the record is left untouched and the caller is
/// told decryption failed, rather than receiving the generic failure.
#[derive(Error, Debug)]
pub enum DecryptError {
    #[error("Malformed ciphertext: {message}")]
    MalformedCiphertext { message: String },

    #[error("Decryption service error: {message}")]
    Service { message: String },
}
