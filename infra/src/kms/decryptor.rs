//! OtpDecryptor implementation over AWS KMS.

use async_trait::async_trait;
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::Client;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::error;

use ov_core::errors::DecryptError;
use ov_core::services::verifier::OtpDecryptor;

/// Decryptor for the base64-encoded KMS ciphertext blobs held in OTP
/// records. The plaintext is returned to the verifier for comparison and is
/// never logged.
pub struct KmsDecryptor {
    client: Client,
    key_id: Option<String>,
}

impl KmsDecryptor {
    pub fn new(aws_config: &aws_config::SdkConfig, key_id: Option<String>) -> Self {
        Self {
            client: Client::new(aws_config),
            key_id,
        }
    }
}

#[async_trait]
impl OtpDecryptor for KmsDecryptor {
    async fn decrypt(&self, ciphertext_b64: &str) -> Result<String, DecryptError> {
        let ciphertext = decode_ciphertext(ciphertext_b64)?;

        let mut request = self.client.decrypt().ciphertext_blob(Blob::new(ciphertext));
        if let Some(key_id) = &self.key_id {
            request = request.key_id(key_id);
        }

        let output = request.send().await.map_err(|e| {
            error!(error = %e, event = "kms_decrypt_failed", "KMS decrypt request failed");
            DecryptError::Service {
                message: format!("KMS decrypt failed: {e}"),
            }
        })?;

        let plaintext = output.plaintext.ok_or_else(|| DecryptError::Service {
            message: "KMS response carried no plaintext".to_string(),
        })?;

        String::from_utf8(plaintext.into_inner()).map_err(|_| DecryptError::MalformedCiphertext {
            message: "decrypted OTP is not valid UTF-8".to_string(),
        })
    }
}

/// Decodes the stored base64 blob into raw ciphertext bytes.
fn decode_ciphertext(ciphertext_b64: &str) -> Result<Vec<u8>, DecryptError> {
    BASE64
        .decode(ciphertext_b64)
        .map_err(|e| DecryptError::MalformedCiphertext {
            message: format!("invalid base64 ciphertext: {e}"),
        })
}
