use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use valbet::config::RiskConfig;
use valbet::core::recommend::StakeRecommender;

mod handlers;

use handlers::{health, recommend};

/// Application state shared across handlers
pub struct AppState {
    pub recommender: StakeRecommender,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    // Bad risk settings must abort startup, not fall back silently
    let risk = RiskConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;

    info!(
        "Risk configuration: max stake {:.1}%, {:.2}x Kelly, min edge {:.1}%",
        risk.max_stake_percent * 100.0,
        risk.kelly_fraction,
        risk.min_edge_threshold * 100.0
    );

    let app_state = Arc::new(AppState {
        recommender: StakeRecommender::new(risk),
    });

    info!("Starting valbet API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/config", web::get().to(health::get_config))
            .route("/recommend", web::post().to(recommend::recommend_single))
            .route(
                "/recommend/batch",
                web::post().to(recommend::recommend_batch),
            )
    })
    .bind(&addr)?
    .run()
    .await
}
