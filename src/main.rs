use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger};
use anyhow::{Context, Result};

use geolocationapi::middleware::RequestIdMiddleware;
use geolocationapi::{AppState, Collections, Config};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {}, storage: {})",
        config.environment,
        config.storage_backend
    );

    let collections = Collections::from_config(&config)
        .await
        .context("Failed to initialize storage")?;
    let app_state = AppState::new(collections);

    let server_address = config.server_address();
    let allowed_origin = config.allowed_origin.clone();
    log::info!("Starting http server at {}", server_address);

    let server = HttpServer::new(move || {
        let state = app_state.clone();
        App::new()
            .wrap(
                Cors::default()
                    .allowed_origin(&allowed_origin)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type", "Accept", "X-Correlation-ID"])
                    .max_age(3600),
            )
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b %T correlation_id=%{x-correlation-id}o"#,
            ))
            .configure(move |cfg| state.configure(cfg))
    })
    .bind(&server_address)
    .map_err(|e| {
        log::error!("http connection error: {}", e);
        e
    })
    .with_context(|| format!("Failed to bind {}", server_address))?;

    server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
