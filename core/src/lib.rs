//! Core domain layer for the OTP verification service.
//!
//! This crate holds the verification state machine and the entities it acts
//! on. It has no I/O of its own: the record store and the decryption service
//! are consumed through traits, and the concrete clients live in `ov_infra`.

pub mod domain;
pub mod errors;
pub mod services;
