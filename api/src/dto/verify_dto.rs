//! DTOs for the verify endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /verify`. `otp_code` is the candidate plaintext
/// the user entered, not the stored ciphertext.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub user_id: String,
    pub otp_code: String,
}

/// Every response, success or failure, is a single message field.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
