use actix_web::{web, HttpResponse};
use std::sync::Arc;

use crate::dto::verify_dto::{MessageResponse, VerifyOtpRequest};

use ov_core::services::verifier::{OtpDecryptor, OtpStore, OtpVerifier, VerificationOutcome};

/// Application state that holds the shared verifier
pub struct AppState<S, D>
where
    S: OtpStore,
    D: OtpDecryptor,
{
    pub verifier: Arc<OtpVerifier<S, D>>,
}

/// Handler for POST /verify
///
/// Verifies a candidate OTP against the user's most recent stored record.
///
/// # Request Body
///
/// ```json
/// {
///     "user_id": "user-123",
///     "otp_code": "123456"
/// }
/// ```
///
/// # Response
///
/// `{"message": "..."}` with 200 on success, 400 for caller-input errors
/// and business outcomes, 500 for decryption or internal failures.
///
/// The body is read raw rather than through `web::Json` so malformed
/// requests produce the exact messages callers rely on (missing body,
/// empty body, invalid JSON, missing fields).
pub async fn verify_otp<S, D>(state: web::Data<AppState<S, D>>, body: web::Bytes) -> HttpResponse
where
    S: OtpStore + 'static,
    D: OtpDecryptor + 'static,
{
    let request = match parse_request_body(&body) {
        Ok(request) => request,
        Err(message) => {
            log::warn!("Rejected verify request: {message}");
            return HttpResponse::BadRequest().json(MessageResponse::new(message));
        }
    };

    match state
        .verifier
        .verify(&request.user_id, &request.otp_code)
        .await
    {
        Ok(outcome) => {
            log::info!(
                "Verification for user {} finished with outcome {outcome:?}",
                request.user_id
            );
            outcome_response(outcome)
        }
        Err(error) => {
            // Dependency failure or unexpected fault: log the detail, return
            // the generic message only.
            log::error!("Verification for user {} failed: {error}", request.user_id);
            HttpResponse::InternalServerError().json(MessageResponse::new("Internal server error"))
        }
    }
}

/// Parses and validates the raw request body.
///
/// A zero-length payload means the caller sent no body at all; a JSON
/// `null` or whitespace-only payload is an empty body. Fields count as
/// missing when absent, null, non-string, or empty.
fn parse_request_body(body: &[u8]) -> Result<VerifyOtpRequest, String> {
    if body.is_empty() {
        return Err("Missing request body".to_string());
    }

    let text = std::str::from_utf8(body).map_err(|_| "Invalid JSON in request body".to_string())?;
    if text.trim().is_empty() || text.trim() == "null" {
        return Err("Empty request body".to_string());
    }

    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|_| "Invalid JSON in request body".to_string())?;

    let user_id = value.get("user_id").and_then(|v| v.as_str()).unwrap_or("");
    let otp_code = value.get("otp_code").and_then(|v| v.as_str()).unwrap_or("");

    let mut missing_fields = Vec::new();
    if user_id.is_empty() {
        missing_fields.push("user_id");
    }
    if otp_code.is_empty() {
        missing_fields.push("otp_code");
    }
    if !missing_fields.is_empty() {
        return Err(format!(
            "Missing required fields: {}",
            missing_fields.join(", ")
        ));
    }

    Ok(VerifyOtpRequest {
        user_id: user_id.to_string(),
        otp_code: otp_code.to_string(),
    })
}

/// Maps a business outcome onto its status code and message.
fn outcome_response(outcome: VerificationOutcome) -> HttpResponse {
    match outcome {
        VerificationOutcome::NoActiveOtp => HttpResponse::BadRequest().json(MessageResponse::new(
            "You have reached time limit. Please request a new OTP to continue",
        )),
        VerificationOutcome::DecryptionFailure => {
            HttpResponse::InternalServerError().json(MessageResponse::new("Failed to decrypt OTP"))
        }
        VerificationOutcome::InvalidOtp => {
            HttpResponse::BadRequest().json(MessageResponse::new("Invalid OTP"))
        }
        VerificationOutcome::TooManyAttempts => HttpResponse::BadRequest().json(
            MessageResponse::new("Too many incorrect attempts. Please request a new OTP to continue"),
        ),
        VerificationOutcome::Expired => {
            HttpResponse::BadRequest().json(MessageResponse::new("OTP expired"))
        }
        VerificationOutcome::Success => {
            HttpResponse::Ok().json(MessageResponse::new("OTP verified successfully"))
        }
    }
}
