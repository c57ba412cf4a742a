//! HTTP transport for the OTP verification service.

pub mod config;
pub mod dto;
pub mod middleware;
pub mod routes;
