use std::sync::Arc;
use std::time::Duration;

use account_service::config::Config;
use account_service::config::SessionConfig;
use account_service::domain::account::ports::Database;
use account_service::domain::account::service::AccountService;
use account_service::domain::session::service::SessionManager;
use account_service::inbound::http::cookies::SessionCookies;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryDatabase;
use account_service::outbound::repositories::PostgresDatabase;
use auth::Authenticator;
use auth::PasswordHasher;
use sqlx::postgres::PgPoolOptions;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        in_memory_database = config.database.is_in_memory(),
        http_port = config.server.http_port,
        session_ttl_days = config.session.ttl_days,
        secure_cookie = config.session.secure_cookie,
        purge_interval_secs = config.session.purge_interval_secs,
        "Configuration loaded"
    );

    let Some(session_ttl) = config.session.ttl() else {
        anyhow::bail!(
            "session.ttl_days must be between 1 and {}",
            SessionConfig::MAX_TTL_DAYS
        );
    };

    let password_hasher = PasswordHasher::with_params(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;
    let session_manager = Arc::new(SessionManager::new(session_ttl));
    let account_service = Arc::new(AccountService::new(
        Authenticator::with_hasher(password_hasher),
        session_manager,
    ));

    if config.database.is_in_memory() {
        tracing::warn!(
            database = "memory",
            "Using in-memory database, all data is lost on shutdown"
        );
        return serve(&config, InMemoryDatabase::new(), account_service).await;
    }

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    serve(&config, PostgresDatabase::new(pg_pool), account_service).await
}

async fn serve<D: Database>(
    config: &Config,
    database: D,
    account_service: Arc<AccountService>,
) -> Result<(), anyhow::Error> {
    if config.session.purge_interval_secs > 0 {
        spawn_session_purge(
            database.clone(),
            Arc::clone(&account_service),
            Duration::from_secs(config.session.purge_interval_secs),
        );
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(
        database,
        account_service,
        SessionCookies::new(config.session.secure_cookie),
    );

    match axum::serve(http_listener, http_application).await {
        Ok(()) => tracing::info!("Server exited successfully"),
        Err(e) => tracing::error!(error = %e, "Server error"),
    };

    Ok(())
}

/// Periodically delete sessions that expired without being accessed again.
fn spawn_session_purge<D: Database>(
    database: D,
    account_service: Arc<AccountService>,
    every: Duration,
) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match account_service
                .session_manager()
                .purge_expired_sessions(&database)
                .await
            {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Expired sessions purged"),
                Err(e) => tracing::error!(error = %e, "Session purge failed"),
            }
        }
    });
}
