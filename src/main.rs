//! Game Night API server.

use std::sync::Arc;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use game_night::adapters::http::middleware::AuthState;
use game_night::adapters::http::{build_router, HealthState, RouterSettings, SessionHandlers};
use game_night::adapters::{
    InMemoryEventBus, JwtIdentity, PostgresSessionReader, PostgresSessionStore, PromotionNotifier,
};
use game_night::config::{AppConfig, ServerConfig};
use game_night::ports::{EventSubscriber, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        "starting game-night"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    let store = Arc::new(PostgresSessionStore::new(pool.clone()));
    let reader = Arc::new(PostgresSessionReader::new(pool));

    let bus = Arc::new(InMemoryEventBus::new());
    bus.subscribe(PromotionNotifier::EVENT_TYPE, Arc::new(PromotionNotifier::new()));

    let identity = JwtIdentity::new(
        &config.auth.jwt_secret,
        config.auth.issuer.as_deref(),
        config.auth.leeway_secs,
    );

    let app = build_router(
        SessionHandlers::from_ports(store.clone(), reader, bus),
        HealthState::new(store.clone()),
        AuthState::new(Arc::new(identity), config.auth.cookie_name.as_str()),
        &RouterSettings {
            request_timeout: config.server.request_timeout(),
            cors_origins: config.server.cors_origins_list(),
        },
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server drained, closing store");
    store.close().await;
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
