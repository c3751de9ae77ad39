use server::db::AppState;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    server::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = server::config::load_config();

    if config.features.telemetry {
        server::telemetry::init_telemetry()?;
    }
    server::health::record_start_time();

    let pool = server::db::create_pool()?;
    server::db::run_migrations(&pool).await?;

    tokio::fs::create_dir_all(&config.media.root).await?;

    let state = AppState {
        pool,
        media: config.media.clone(),
    };

    let router = server::openapi::api_router(state, config.features.telemetry)
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, router).await?;
    Ok(())
}
