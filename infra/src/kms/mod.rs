//! KMS-backed OTP decryption.

mod decryptor;

pub use decryptor::KmsDecryptor;
