use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use ov_api::config::ServerConfig;
use ov_api::middleware;
use ov_api::routes::{verify, AppState};
use ov_core::services::verifier::OtpVerifier;
use ov_infra::config::InfraConfig;
use ov_infra::dynamodb::DynamoOtpStore;
use ov_infra::kms::KmsDecryptor;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting OTP verification service");

    let server_config = ServerConfig::from_env()?;
    let infra_config = InfraConfig::from_env();

    // AWS clients are constructed once and shared across all requests.
    let aws_config = ov_infra::load_aws_config().await;
    let store = Arc::new(DynamoOtpStore::new(
        &aws_config,
        infra_config.table_name.clone(),
    ));
    let decryptor = Arc::new(KmsDecryptor::new(
        &aws_config,
        infra_config.kms_key_id.clone(),
    ));
    let verifier = Arc::new(OtpVerifier::new(store, decryptor));

    let bind_address = server_config.bind_address();
    info!(
        "Server will bind to: {} (table: {})",
        bind_address, infra_config.table_name
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(middleware::cors::create_cors())
            .app_data(web::Data::new(AppState {
                verifier: verifier.clone(),
            }))
            .route("/health", web::get().to(health_check))
            .route(
                "/verify",
                web::post().to(verify::verify_otp::<DynamoOtpStore, KmsDecryptor>),
            )
            .default_service(web::route().to(|| async {
                HttpResponse::NotFound().json(serde_json::json!({
                    "message": "The requested resource was not found"
                }))
            }))
    })
    .bind(&bind_address)?
    .run()
    .await?;

    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "otp-verify-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
