//! Unit tests for the verifier service

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::otp_record::OtpRecord;
use crate::errors::DomainError;
use crate::services::verifier::{OtpVerifier, VerificationOutcome};

use super::mocks::{enc, MockDecryptor, MockOtpStore};

fn record(user_id: &str, code: &str, attempts: i32, expires_in: Duration) -> OtpRecord {
    let now = Utc::now();
    OtpRecord {
        user_id: user_id.to_string(),
        creation_timestamp: now.to_rfc3339(),
        otp_code: enc(code),
        expiration_timestamp: (now + expires_in).to_rfc3339(),
        attempts,
    }
}

fn verifier(store: Arc<MockOtpStore>) -> OtpVerifier<MockOtpStore, MockDecryptor> {
    OtpVerifier::new(store, Arc::new(MockDecryptor::new(false)))
}

#[tokio::test]
async fn test_no_record_returns_no_active_otp() {
    let store = Arc::new(MockOtpStore::new(false));
    let service = verifier(store);

    let outcome = service.verify("user-1", "123456").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::NoActiveOtp);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_error() {
    let store = Arc::new(MockOtpStore::new(true));
    let service = verifier(store);

    let result = service.verify("user-1", "123456").await;
    assert!(matches!(result, Err(DomainError::Store { .. })));
}

#[tokio::test]
async fn test_decryption_failure_leaves_record_untouched() {
    let rec = record("user-1", "123456", 3, Duration::minutes(5));
    let key = rec.key();
    let store = Arc::new(MockOtpStore::with_record(rec));
    let service = OtpVerifier::new(store.clone(), Arc::new(MockDecryptor::new(true)));

    let outcome = service.verify("user-1", "123456").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::DecryptionFailure);

    // Not an attempt-consuming event: record still there, attempts intact.
    let stored = store.get(&key).unwrap();
    assert_eq!(stored.attempts, 3);
}

#[tokio::test]
async fn test_mismatch_decrements_and_retains_record() {
    let rec = record("user-1", "123456", 3, Duration::minutes(5));
    let key = rec.key();
    let store = Arc::new(MockOtpStore::with_record(rec));
    let service = verifier(store.clone());

    let outcome = service.verify("user-1", "000000").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::InvalidOtp);

    let stored = store.get(&key).unwrap();
    assert_eq!(stored.attempts, 2);
}

#[tokio::test]
async fn test_mismatch_with_last_attempt_deletes_record() {
    let rec = record("user-1", "123456", 1, Duration::minutes(5));
    let key = rec.key();
    let store = Arc::new(MockOtpStore::with_record(rec));
    let service = verifier(store.clone());

    let outcome = service.verify("user-1", "000000").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::TooManyAttempts);
    assert!(store.get(&key).is_none());
}

#[tokio::test]
async fn test_repeated_mismatches_walk_down_to_exhaustion() {
    let rec = record("user-1", "123456", 3, Duration::minutes(5));
    let key = rec.key();
    let store = Arc::new(MockOtpStore::with_record(rec));
    let service = verifier(store.clone());

    assert_eq!(
        service.verify("user-1", "000000").await.unwrap(),
        VerificationOutcome::InvalidOtp
    );
    assert_eq!(store.get(&key).unwrap().attempts, 2);

    assert_eq!(
        service.verify("user-1", "000000").await.unwrap(),
        VerificationOutcome::InvalidOtp
    );
    assert_eq!(store.get(&key).unwrap().attempts, 1);

    assert_eq!(
        service.verify("user-1", "000000").await.unwrap(),
        VerificationOutcome::TooManyAttempts
    );
    assert!(store.get(&key).is_none());
}

#[tokio::test]
async fn test_match_with_past_expiry_deletes_record_as_expired() {
    let rec = record("user-1", "123456", 3, Duration::minutes(-5));
    let key = rec.key();
    let store = Arc::new(MockOtpStore::with_record(rec));
    let service = verifier(store.clone());

    let outcome = service.verify("user-1", "123456").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Expired);
    assert!(store.get(&key).is_none());
}

#[tokio::test]
async fn test_match_with_future_expiry_succeeds_and_deletes_record() {
    let rec = record("user-1", "123456", 3, Duration::minutes(5));
    let key = rec.key();
    let store = Arc::new(MockOtpStore::with_record(rec));
    let service = verifier(store.clone());

    let outcome = service.verify("user-1", "123456").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Success);

    // Single-use even on success.
    assert!(store.get(&key).is_none());
}

#[tokio::test]
async fn test_second_call_after_terminal_outcome_is_no_active_otp() {
    // Success, exhaustion, and expiry all delete the record, so the next
    // verification finds nothing.
    for (code, candidate, attempts, expires_in) in [
        ("123456", "123456", 3, Duration::minutes(5)),  // Success
        ("123456", "000000", 1, Duration::minutes(5)),  // TooManyAttempts
        ("123456", "123456", 3, Duration::minutes(-5)), // Expired
    ] {
        let store = Arc::new(MockOtpStore::with_record(record(
            "user-1", code, attempts, expires_in,
        )));
        let service = verifier(store);

        service.verify("user-1", candidate).await.unwrap();
        let second = service.verify("user-1", candidate).await.unwrap();
        assert_eq!(second, VerificationOutcome::NoActiveOtp);
    }
}

// Documented ordering: expiration is checked only after a correct match, so
// a wrong guess against an expired record reads as InvalidOtp and consumes
// an attempt. Flagged as a product-level ambiguity; this test pins the
// current behavior so any change to the order is deliberate.
#[tokio::test]
async fn test_wrong_code_on_expired_record_consumes_attempt() {
    let rec = record("user-1", "123456", 3, Duration::minutes(-5));
    let key = rec.key();
    let store = Arc::new(MockOtpStore::with_record(rec));
    let service = verifier(store.clone());

    let outcome = service.verify("user-1", "000000").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::InvalidOtp);
    assert_eq!(store.get(&key).unwrap().attempts, 2);
}

#[tokio::test]
async fn test_only_the_most_recent_record_is_considered() {
    let now = Utc::now();
    let old = OtpRecord {
        user_id: "user-1".to_string(),
        creation_timestamp: (now - Duration::minutes(10)).to_rfc3339(),
        otp_code: enc("111111"),
        expiration_timestamp: (now + Duration::minutes(5)).to_rfc3339(),
        attempts: 3,
    };
    let newest = OtpRecord {
        user_id: "user-1".to_string(),
        creation_timestamp: now.to_rfc3339(),
        otp_code: enc("222222"),
        expiration_timestamp: (now + Duration::minutes(5)).to_rfc3339(),
        attempts: 3,
    };
    let old_key = old.key();

    let store = Arc::new(MockOtpStore::with_record(old));
    store.insert(newest);
    let service = verifier(store.clone());

    // The superseded code no longer verifies.
    let outcome = service.verify("user-1", "111111").await.unwrap();
    assert_eq!(outcome, VerificationOutcome::InvalidOtp);

    // And only the newest record was decremented.
    assert_eq!(store.get(&old_key).unwrap().attempts, 3);
}

#[tokio::test]
async fn test_comparison_is_exact_and_case_sensitive() {
    let store = Arc::new(MockOtpStore::with_record(record(
        "user-1",
        "AbC123",
        3,
        Duration::minutes(5),
    )));
    let service = verifier(store.clone());

    assert_eq!(
        service.verify("user-1", "abc123").await.unwrap(),
        VerificationOutcome::InvalidOtp
    );
    assert_eq!(
        service.verify("user-1", "AbC123 ").await.unwrap(),
        VerificationOutcome::InvalidOtp
    );
    assert_eq!(
        service.verify("user-1", "AbC123").await.unwrap(),
        VerificationOutcome::Success
    );
}

#[tokio::test]
async fn test_unparseable_expiration_on_match_is_internal_error() {
    let now = Utc::now();
    let rec = OtpRecord {
        user_id: "user-1".to_string(),
        creation_timestamp: now.to_rfc3339(),
        otp_code: enc("123456"),
        expiration_timestamp: "not-a-timestamp".to_string(),
        attempts: 3,
    };
    let key = rec.key();
    let store = Arc::new(MockOtpStore::with_record(rec));
    let service = verifier(store.clone());

    let result = service.verify("user-1", "123456").await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));

    // The fault fired before the delete; the record is still there.
    assert!(store.get(&key).is_some());
}

#[tokio::test]
async fn test_users_do_not_interfere() {
    let store = Arc::new(MockOtpStore::with_record(record(
        "user-1",
        "123456",
        3,
        Duration::minutes(5),
    )));
    store.insert(record("user-2", "654321", 3, Duration::minutes(5)));
    let service = verifier(store.clone());

    assert_eq!(
        service.verify("user-1", "123456").await.unwrap(),
        VerificationOutcome::Success
    );
    assert_eq!(store.record_count(), 1);
    assert_eq!(
        service.verify("user-2", "654321").await.unwrap(),
        VerificationOutcome::Success
    );
    assert_eq!(store.record_count(), 0);
}
