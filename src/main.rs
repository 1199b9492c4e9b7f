use actix_web::{middleware::Logger, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use voice_gateway::config_loader::load_config;
use voice_gateway::config_validator::GatewayConfigValidator;
use voice_gateway::{configure_routes, BackendClient};

#[actix_web::main]
async fn main() {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> std::io::Result<()> {
    // Config file values only fill variables missing from the environment
    load_config();

    let config = GatewayConfigValidator::validate_and_load().map_err(|results| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "Invalid configuration: {}",
                results
                    .errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; ")
            ),
        )
    })?;

    let backend = BackendClient::new().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to build backend client: {}", e),
        )
    })?;

    info!("Server starting on {}", config.bind_address());
    info!("Inference URL: {}", config.inference_url);
    info!("Model name: {}", config.model_name);
    info!("LLM URL: {}", config.llm_url);
    info!("LLM model: {}", config.llm_model);
    info!("Static directory: {}", config.static_dir.display());

    let bind_address = config.bind_address();
    let workers = config.workers;

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| configure_routes(cfg, &config, &backend))
    });
    if workers > 0 {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .map_err(|e| {
            std::io::Error::new(e.kind(), format!("Failed to bind {}: {}", bind_address, e))
        })?
        .run()
        .await
}
