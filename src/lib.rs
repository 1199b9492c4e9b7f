// Voice Gateway Library
//
// This crate provides an HTTP gateway in front of a speech-to-text server and an LLM
// chat-completion server, plus the static front end that uses both.

pub mod backend;
pub mod config;
pub mod config_loader;
pub mod config_validator;
pub mod error;
pub mod handlers;
pub mod models;

use actix_web::web;

// Re-export common types for easier access
pub use backend::BackendClient;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use models::{BackendResponse, ChatCompletionRequest, ErrorResponse, SummarizeRequest};

use handlers::{index, method_not_allowed, not_found, static_asset, summarize, transcribe};

/// Register the gateway routes and their shared state
///
/// Gateway resources answer 405 to any method other than POST; unknown paths answer 404.
pub fn configure_routes(
    cfg: &mut web::ServiceConfig,
    config: &GatewayConfig,
    backend: &BackendClient,
) {
    cfg.app_data(web::Data::new(config.clone()))
        .app_data(web::Data::new(backend.clone()))
        // /summarize reads its whole body; keep the limit in line with uploads
        .app_data(web::PayloadConfig::new(config.max_upload_size))
        .service(
            web::resource("/")
                .route(web::get().to(index))
                .route(web::head().to(index)),
        )
        .service(
            web::resource("/static/{path:.*}")
                .route(web::get().to(static_asset))
                .route(web::head().to(static_asset)),
        )
        .service(
            web::resource("/transcribe")
                .route(web::post().to(transcribe))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/summarize")
                .route(web::post().to(summarize))
                .default_service(web::to(method_not_allowed)),
        )
        .default_service(web::to(not_found));
}
