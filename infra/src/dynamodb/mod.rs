//! DynamoDB-backed OTP record store.

mod otp_store;

pub use otp_store::DynamoOtpStore;
