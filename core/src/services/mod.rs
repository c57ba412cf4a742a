//! Domain services.

pub mod verifier;
