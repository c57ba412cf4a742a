//! Tests for the verifier service.

mod service_tests;
