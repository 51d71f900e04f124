mod api;
mod config;
mod engagement;
mod error;
mod models;
mod ranking;
mod recommendation;
mod sentiment;
mod store;
mod worker;
mod youtube;

use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::AppState;
use crate::config::Config;
use crate::store::AnalysisStore;
use crate::youtube::YoutubeClient;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::start_analysis,
        api::get_progress,
        api::get_analysis,
        api::health
    ),
    components(
        schemas(
            api::AnalyzeRequest,
            api::AnalyzeAccepted,
            api::ProgressResponse,
            api::AnalysisStatus,
            api::ErrorResponse,
            api::HealthResponse,
            models::AnalysisResult,
            models::VideoMetadata,
            models::Comment,
            models::Sentiment,
            models::SentimentSummary,
            models::EngagementSummary,
            models::EngagementCounts,
            models::Recommendation,
            models::Verdict
        )
    ),
    tags(
        (name = "analysis", description = "Video analysis jobs"),
        (name = "system", description = "Service health")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let store = Arc::new(AnalysisStore::new());
    let platform = Arc::new(YoutubeClient::new(&config)?);
    let mut sweeper = worker::start_progress_sweeper(
        store.clone(),
        &config.sweep_schedule,
        config.progress_ttl,
    )
    .await?;

    let state = Arc::new(AppState {
        store,
        platform,
        upstream_timeout: config.upstream_timeout,
    });

    let app = api::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.shutdown().await?;
    info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
