use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use tienlen_backend::config::ServerConfig;
use tienlen_backend::middleware::cors::cors_middleware;
use tienlen_backend::middleware::request_trace::RequestTrace;
use tienlen_backend::middleware::structured_logger::StructuredLogger;
use tienlen_backend::middleware::trace_span::TraceSpan;
use tienlen_backend::routes;
use tienlen_backend::services::propagation::EventPublisher;
use tienlen_backend::services::sessions::SessionDirectory;
use tienlen_backend::services::sweeper::spawn_idle_sweeper;
use tienlen_backend::services::wallet::InMemoryWallet;
use tienlen_backend::state::app_state::AppState;
use tienlen_backend::state::security_config::SecurityConfig;
use tienlen_backend::ws::broker::RealtimeBroker;
use tienlen_backend::ws::hub::WsRegistry;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let registry = Arc::new(WsRegistry::new());
    let publisher: Arc<dyn EventPublisher> = match &config.redis_url {
        Some(url) => match RealtimeBroker::connect(url, registry.clone()).await {
            Ok(broker) => {
                info!("Realtime broker connected to Redis");
                broker
            }
            Err(e) => {
                error!(error = %e, "Failed to connect realtime broker");
                std::process::exit(1);
            }
        },
        None => {
            info!("REDIS_URL not set, delivering events in-process only");
            registry.clone()
        }
    };

    let sessions = Arc::new(
        SessionDirectory::new(publisher)
            .with_wallet(Arc::new(InMemoryWallet::new()))
            .with_deal_seed(config.deal_seed),
    );
    if config.deal_seed.is_some() {
        info!("DEAL_SEED set, dealing is deterministic");
    }

    let _sweeper = spawn_idle_sweeper(
        sessions.clone(),
        config.sweep_interval,
        config.idle_timeout,
    );

    let app_state = AppState::new(
        SecurityConfig::new(config.jwt_secret.as_bytes()),
        sessions,
        registry,
    );
    let data = web::Data::new(app_state);

    info!(host = %config.host, port = config.port, "Starting Tiến Lên backend");

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
