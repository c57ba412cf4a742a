//! OTP verification service.
//!
//! The verifier owns the record lifecycle: it fetches the most recent record
//! for a user, decrypts the stored code, compares it to the candidate, and
//! decrements attempts or deletes the record depending on outcome.

mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use service::OtpVerifier;
pub use traits::{OtpDecryptor, OtpStore};
pub use types::VerificationOutcome;
