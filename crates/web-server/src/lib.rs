use auth::TokenSigner;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use configuration::Config;
use database::{DbRepository, Repository};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub signer: TokenSigner,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, signer: TokenSigner) -> Self {
        Self { repo, signer }
    }
}

/// Builds the application router around an already-constructed state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/test_db_connection", get(handlers::test_db_connection))
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
        .route("/fetch_chart_data", get(handlers::fetch_chart_data))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// Connects to the database, migrates it and serves until Ctrl+C or SIGTERM.
///
/// Tracing must already be initialized by the caller.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let db_pool = database::connect(&config.database).await?;
    database::run_migrations(&db_pool).await?;
    let repo: Arc<dyn Repository> = Arc::new(DbRepository::new(db_pool));

    if config.auth.jwt_secret == configuration::DEFAULT_JWT_SECRET {
        tracing::warn!("JWT_SECRET is not set, signing tokens with the built-in development secret.");
    }
    let signer = TokenSigner::new(
        &config.auth.jwt_secret,
        chrono::Duration::minutes(config.auth.token_ttl_minutes),
    );

    let app = build_router(Arc::new(AppState::new(repo, signer)));

    let address = config.server.address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("Web server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server shut down.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler.");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler.");
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
}
