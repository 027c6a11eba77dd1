use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use configuration::{MiningSettings, Settings};
use std::sync::Arc;
use store::{FeedSource, SnapshotStore};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn FeedSource>,
    pub mining: MiningSettings,
}

/// Builds the router serving every feed.
pub fn build_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/moons", get(handlers::list_moons))
        .route("/api/moons/:moon_id", get(handlers::get_moon_detail))
        .route("/api/extractions", get(handlers::list_extractions))
        .route(
            "/api/extractions/:extraction_id",
            get(handlers::get_extraction_detail),
        )
        .route("/api/reports/owned-value", get(handlers::get_owned_value_report))
        .route(
            "/api/reports/owned-value/footer",
            get(handlers::get_owned_value_footer),
        )
        .route("/api/reports/user-mining", get(handlers::get_user_mining_report))
        .route("/api/surveys", post(handlers::upload_survey))
        .with_state(state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// Loads the snapshot and serves the feeds until the process is stopped.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;
    let store = SnapshotStore::from_file(&settings.snapshot.path).await?;

    let state = Arc::new(AppState {
        source: Arc::new(store),
        mining: settings.mining.clone(),
    });
    let app = build_router(state, settings.server.body_limit_bytes);

    tracing::info!("Web server listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
