//! Domain entities.

pub mod otp_record;

pub use otp_record::{OtpRecord, RecordKey, DEFAULT_ATTEMPTS};
