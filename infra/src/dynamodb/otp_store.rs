//! OtpStore implementation over a DynamoDB table keyed by
//! `(user_id, creation_timestamp)`.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tracing::{debug, warn};

use ov_core::domain::otp_record::{OtpRecord, RecordKey, DEFAULT_ATTEMPTS};
use ov_core::errors::{DomainError, DomainResult};
use ov_core::services::verifier::OtpStore;

/// DynamoDB-backed record store.
///
/// The table's key schema carries the concurrency guarantee: every mutation
/// names both key attributes of the exact record the verifier read, so a
/// record superseded by a newer issuance is simply not addressed.
pub struct DynamoOtpStore {
    client: Client,
    table_name: String,
}

impl DynamoOtpStore {
    pub fn new(aws_config: &aws_config::SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(aws_config),
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl OtpStore for DynamoOtpStore {
    async fn latest_record(&self, user_id: &str) -> DomainResult<Option<OtpRecord>> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("user_id = :user_id")
            .expression_attribute_values(":user_id", AttributeValue::S(user_id.to_string()))
            .scan_index_forward(false)
            .limit(1)
            .send()
            .await
            .map_err(|e| DomainError::Store {
                message: format!("DynamoDB query failed: {e}"),
            })?;

        match result.items.and_then(|items| items.into_iter().next()) {
            Some(item) => {
                debug!(user_id, "Fetched latest OTP record");
                Ok(Some(parse_record_from_item(item)?))
            }
            None => Ok(None),
        }
    }

    async fn set_attempts(&self, key: &RecordKey, attempts: i32) -> DomainResult<()> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(key.user_id.clone()))
            .key(
                "creation_timestamp",
                AttributeValue::S(key.creation_timestamp.clone()),
            )
            .update_expression("SET attempts = :attempts")
            .expression_attribute_values(":attempts", AttributeValue::N(attempts.to_string()))
            .condition_expression("attribute_exists(user_id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            // The record read at the start of the verification no longer
            // exists (consumed or superseded concurrently). Nothing left to
            // decrement; not worth failing the whole request.
            Err(e) if e.to_string().contains("ConditionalCheckFailedException") => {
                warn!(
                    user_id = %key.user_id,
                    creation_timestamp = %key.creation_timestamp,
                    "OTP record gone before attempts update, skipping"
                );
                Ok(())
            }
            Err(e) => Err(DomainError::Store {
                message: format!("DynamoDB update failed: {e}"),
            }),
        }
    }

    async fn delete_record(&self, key: &RecordKey) -> DomainResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("user_id", AttributeValue::S(key.user_id.clone()))
            .key(
                "creation_timestamp",
                AttributeValue::S(key.creation_timestamp.clone()),
            )
            .send()
            .await
            .map_err(|e| DomainError::Store {
                message: format!("DynamoDB delete failed: {e}"),
            })?;

        debug!(
            user_id = %key.user_id,
            creation_timestamp = %key.creation_timestamp,
            "Deleted OTP record"
        );
        Ok(())
    }
}

/// Parses an OtpRecord from a DynamoDB item.
fn parse_record_from_item(item: HashMap<String, AttributeValue>) -> DomainResult<OtpRecord> {
    let user_id = required_string(&item, "user_id")?;
    let creation_timestamp = required_string(&item, "creation_timestamp")?;
    let otp_code = required_string(&item, "otp_code")?;
    let expiration_timestamp = required_string(&item, "expiration_timestamp")?;

    // Issuers may omit attempts; the store default applies.
    let attempts = item
        .get("attempts")
        .and_then(|v| v.as_n().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_ATTEMPTS);

    Ok(OtpRecord {
        user_id,
        creation_timestamp,
        otp_code,
        expiration_timestamp,
        attempts,
    })
}

fn required_string(
    item: &HashMap<String, AttributeValue>,
    attribute: &str,
) -> DomainResult<String> {
    item.get(attribute)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| DomainError::Store {
            message: format!("OTP item missing {attribute} attribute"),
        })
}
