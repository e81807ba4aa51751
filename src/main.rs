use std::env;
use std::net::SocketAddr;

use axum::http::{header, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donate_secure::{app, db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if it exists
    dotenvy::dotenv().ok();

    // The baked-in dev secret must never sign production sessions.
    let env_mode = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
    if env_mode == "production" {
        env::var("SESSION_SECRET").expect("SESSION_SECRET must be set in production");
    }

    // Initialize Tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            env::var("RUST_LOG").unwrap_or_else(|_| "donate_secure=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DonateSecure platform...");

    tracing::info!("Initializing database...");
    let pool = db::init_pool().await?;
    db::init_schema(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Schema init failed: {}", e))?;
    db::seed_sample_data(&pool).await?;
    tracing::info!("Database initialized with sample data");
    tracing::info!("Demo credentials: donor@example.com / password123 (donor)");
    tracing::info!("Demo credentials: ngo@example.com / password123 (receiver)");

    let state = AppState { db: pool };

    let app = app(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:5000".to_string())
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid BIND_ADDR: {}", e))?;
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("signal received, starting graceful shutdown");
}
