use actix_web::web;

pub mod health;
pub mod realtime;
pub mod sessions;

/// Register every route. Shared by `main.rs` and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));

    // Session routes: /api/rooms/**
    cfg.service(web::scope("/api/rooms").configure(sessions::configure_routes));

    // Realtime routes: /api/ws
    cfg.service(web::scope("/api/ws").configure(realtime::configure_routes));
}
