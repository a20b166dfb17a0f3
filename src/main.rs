/// Authgate - Main entry point
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use authgate::{
    config::Config,
    handlers,
    notify::{LogNotifier, Notifier, SmtpNotifier},
    store::{PgAccountStore, PgProfileStore},
    AppState, AuthService, SessionGate, VerificationService,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        "Starting authgate on {}:{}",
        config.server_host,
        config.server_port
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Database connection pool initialized");

    sqlx::migrate!().run(&pool).await?;

    let accounts = Arc::new(PgAccountStore::new(pool.clone()));
    let profiles: Arc<dyn authgate::store::ProfileStore> = Arc::new(PgProfileStore::new(pool));

    let notifier: Arc<dyn Notifier> = match config.smtp() {
        Some(smtp) => Arc::new(SmtpNotifier::new(&smtp)?),
        None => {
            tracing::warn!("no SMTP configuration, notifications go to the log");
            Arc::new(LogNotifier)
        }
    };

    let auth = Arc::new(AuthService::new(accounts));
    let gate = Arc::new(SessionGate::new(
        auth.clone(),
        Some(profiles.clone()),
        config.root.clone(),
        config.cookie_ttl_days,
    ));
    let verification = Arc::new(VerificationService::new(
        auth.clone(),
        profiles.clone(),
        notifier,
        config.sms_sender.clone(),
    ));

    let state = AppState {
        auth,
        gate,
        verification,
        profiles,
        auto_register: config.auto_register,
    };

    let router = Router::new()
        .route("/", get(handlers::session_entry))
        .route("/auth/login", get(handlers::login_form))
        .route("/auth/auth", post(handlers::auth_submit))
        .route("/auth/unauth", get(handlers::logout))
        .route("/auth/change_password", post(handlers::change_password))
        .route("/auth/set_new_password", post(handlers::set_new_password))
        .route("/auth/check_phone", post(handlers::check_phone))
        .route("/auth/registration/start", post(handlers::registration_start))
        .route(
            "/auth/registration/confirm",
            post(handlers::registration_confirm),
        )
        .route("/auth/recovery/codes", post(handlers::send_recovery_codes))
        .route("/auth/recovery/password", post(handlers::recover_password))
        .route("/auth/recovery/confirm_email", post(handlers::confirm_email))
        .route("/health", get(health_check))
        .route("/readiness", get(readiness_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness_check() -> &'static str {
    "READY"
}
