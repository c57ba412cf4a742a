//! Result types for OTP verification.

/// Business outcome of one verification call.
///
/// Every variant except `InvalidOtp` is terminal: the record no longer
/// exists afterwards (or, for `NoActiveOtp` and `DecryptionFailure`, was
/// never touched). Store failures are not outcomes; they surface as
/// `Err(DomainError)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// No stored record exists for the user; a new OTP must be requested.
    NoActiveOtp,

    /// The stored ciphertext could not be decrypted. The record is left
    /// untouched; this is not an attempt-consuming event.
    DecryptionFailure,

    /// Wrong code with attempts remaining. The record survives with a
    /// decremented attempt count.
    InvalidOtp,

    /// Wrong code and the decrement exhausted the attempts; record deleted.
    TooManyAttempts,

    /// Correct code, but the record had already expired; record deleted.
    Expired,

    /// Correct code within the validity window; record deleted (single-use).
    Success,
}
