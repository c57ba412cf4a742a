//! Infrastructure layer for the OTP verification service.
//!
//! Concrete clients behind the core traits: a DynamoDB-backed record store
//! and a KMS-backed decryptor. Both wrap SDK clients that are constructed
//! once per process and shared across requests.

pub mod config;
pub mod dynamodb;
pub mod kms;

/// Loads the shared AWS configuration (region, credentials) from the
/// environment. Built once at startup; both SDK clients derive from it.
pub async fn load_aws_config() -> aws_config::SdkConfig {
    aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await
}
