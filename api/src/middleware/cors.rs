//! CORS middleware configuration.
//!
//! The verify endpoint is called directly from browser clients on arbitrary
//! origins, so the contract is permissive: any origin, `POST` plus its
//! `OPTIONS` preflight, and a `Content-Type` header.

use actix_cors::Cors;
use actix_web::http::{header, Method};

pub fn create_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allowed_methods(vec![Method::OPTIONS, Method::POST])
        .allowed_headers(vec![header::CONTENT_TYPE])
        .max_age(3600)
}
