//! Campus API server.
//!
//! Loads configuration, connects to PostgreSQL, starts the content
//! visibility job and serves the REST API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use campus::adapters::auth::{Argon2PasswordHasher, CurrentUserValidator, JwtTokenService};
use campus::adapters::http::{api_router, AppState, CookieSettings};
use campus::adapters::postgres::{
    PostgresCourseRepository, PostgresKolbRepository, PostgresRoleRecordRepository,
    PostgresRoleTransitionStore, PostgresSurveyRepository, PostgresUserRepository,
};
use campus::adapters::{VisibilityScheduler, VisibilitySchedulerConfig};
use campus::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    info!(environment = ?config.server.environment, "Connecting to database");
    let pool = config.database.pool_options().connect(&config.database.url).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    let state = build_state(&pool, &config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = VisibilityScheduler::new(
        state.courses.clone(),
        VisibilitySchedulerConfig::default().with_interval(config.jobs.visibility_interval()),
    );
    let scheduler_task = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    let app = api_router(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let address = config.server.socket_addr()?;
    let listener = TcpListener::bind(address).await?;
    info!(%address, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down");
    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler_task.await {
        warn!(error = %e, "Visibility job ended abnormally");
    }
    pool.close().await;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_new(&server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    if server.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).pretty().init();
    }
}

fn build_state(pool: &PgPool, config: &AppConfig) -> AppState {
    let tokens = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.issuer.clone(),
        config.auth.token_ttl_secs,
    ));

    let users: Arc<PostgresUserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let sessions = Arc::new(CurrentUserValidator::new(tokens.clone(), users.clone()));

    AppState {
        users,
        records: Arc::new(PostgresRoleRecordRepository::new(pool.clone())),
        courses: Arc::new(PostgresCourseRepository::new(pool.clone())),
        kolb: Arc::new(PostgresKolbRepository::new(pool.clone())),
        surveys: Arc::new(PostgresSurveyRepository::new(pool.clone())),
        transitions: Arc::new(PostgresRoleTransitionStore::new(pool.clone())),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens,
        sessions,
        cookie: CookieSettings {
            secure: config.auth.cookie_secure,
        },
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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
