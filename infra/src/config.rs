//! Infrastructure configuration from environment variables.

use std::env;

/// Default DynamoDB table holding OTP records.
const DEFAULT_TABLE_NAME: &str = "otp_main";

/// Settings for the DynamoDB store and KMS decryptor.
#[derive(Debug, Clone)]
pub struct InfraConfig {
    /// DynamoDB table name (`OTP_TABLE_NAME`).
    pub table_name: String,
    /// Optional explicit KMS key id (`KMS_KEY_ID`). When absent, KMS
    /// resolves the key from the ciphertext blob itself.
    pub kms_key_id: Option<String>,
}

impl InfraConfig {
    pub fn from_env() -> Self {
        Self {
            table_name: env::var("OTP_TABLE_NAME")
                .unwrap_or_else(|_| DEFAULT_TABLE_NAME.to_string()),
            kms_key_id: env::var("KMS_KEY_ID").ok().filter(|v| !v.is_empty()),
        }
    }
}
