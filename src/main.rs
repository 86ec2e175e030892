mod config;
mod error;
mod handlers;
mod models;
mod services;
mod state;
mod store;
mod validation;

use config::Config;
use ntex::web;
use ntex_cors::Cors;
use state::AppState;
use std::io;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[ntex::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::load().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let state = Arc::new(AppState::from_config(&config).map_err(io::Error::other)?);
    let max_upload_bytes = config.max_upload_bytes;

    info!(
        backend = state.store.backend(),
        "Skills board server starting on {}:{}", config.host, config.port
    );

    web::HttpServer::new(move || {
        web::App::new()
            .state(state.clone())
            .state(web::types::PayloadConfig::new(max_upload_bytes))
            .wrap(
                Cors::new()
                    .allowed_origin("*")
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type"])
                    .max_age(3600)
                    .finish(),
            )
            .configure(routes)
    })
    .bind(format!("{}:{}", config.host, config.port))?
    .run()
    .await
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health)))
        // Pages
        .service(web::resource("/").route(web::get().to(handlers::leaderboard::leaderboard_page)))
        .service(web::resource("/admin").route(web::get().to(handlers::upload::admin_page)))
        // Leaderboard data
        .service(
            web::resource("/leaderboard-data")
                .route(web::get().to(handlers::leaderboard::get_leaderboard_data)),
        )
        .service(
            web::resource("/api/leaderboard")
                .route(web::get().to(handlers::leaderboard::get_leaderboard)),
        )
        // Admin upload
        .service(web::resource("/upload").route(web::post().to(handlers::upload::upload)));
}

async fn health() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
