use accounts::{config::Config, db, routes, state::AppState, utils::token::TokenIssuer};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 0. Load .env file if there is one
    dotenvy::dotenv().ok();

    // 1. Initialize Sentry (if configured)
    // This guard must be kept in scope for Sentry to work
    let _guard = sentry::init((std::env::var("SENTRY_DSN").ok(), sentry::ClientOptions {
        release: sentry::release_name!(),
        traces_sample_rate: 1.0,
        ..Default::default()
    }));

    // 2. Install rustls crypto provider before any TLS connection to the store
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    // 3. Initialize logging. Respects RUST_LOG.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "accounts=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    tracing::info!("Starting accounts service...");

    // 4. Configuration is read once here and never again
    let config = Config::from_env()?;

    // 5. Connect to the identity store
    let db = db::connect(&config).await?;
    tracing::info!("Identity store ready");

    // 6. Build the app state
    let state = AppState {
        db,
        tokens: TokenIssuer::from_config(&config),
    };
    let app = routes::create_routes(state);

    // 7. Start the server on all interfaces
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
