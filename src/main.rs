//! CoopManager Ajo server.
//!
//! Loads configuration, connects to PostgreSQL, wires the adapters into the
//! Ajo handlers and serves the REST API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coop_manager::adapters::auth::{JwtConfig, JwtSessionValidator};
use coop_manager::adapters::email::{ResendConfig, ResendEmailSender};
use coop_manager::adapters::http::{app_router, AjoHandlers, AjoPorts};
use coop_manager::adapters::postgres::{
    PostgresActivityLog, PostgresAjoReader, PostgresAjoRepository, PostgresMemberDirectory,
    PostgresNotificationSender,
};
use coop_manager::adapters::push::{ExpoPushClient, ExpoPushConfig};
use coop_manager::application::{AjoNotifier, DeliveryMode};
use coop_manager::config::{AppConfig, AuthConfig, EmailConfig, PushConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting CoopManager"
    );

    let pool = config.database.connect().await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let email = ResendEmailSender::from_optional(config.email.as_ref().map(resend_config))?;
    if !email.is_configured() {
        tracing::warn!("Email is not configured; Ajo emails will be skipped");
    }
    let push = push_client(&config.push)?;

    let notifier = AjoNotifier::new(
        Arc::new(PostgresNotificationSender::new(pool.clone(), push)),
        Arc::new(email),
        DeliveryMode::Background,
    );

    let handlers = AjoHandlers::new(AjoPorts {
        repository: Arc::new(PostgresAjoRepository::new(pool.clone())),
        reader: Arc::new(PostgresAjoReader::new(pool.clone())),
        directory: Arc::new(PostgresMemberDirectory::new(pool.clone())),
        activity: Arc::new(PostgresActivityLog::new(pool)),
        notifier,
    });

    let auth = Arc::new(JwtSessionValidator::new(jwt_config(&config.auth)));
    let app = app_router(handlers, auth, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// `RUST_LOG` wins over the configured level. Production logs are JSON.
fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn jwt_config(auth: &AuthConfig) -> JwtConfig {
    let mut config = JwtConfig::new(auth.jwt_secret.expose_secret().as_str());
    config.leeway_secs = auth.leeway_secs;
    if let Some(issuer) = &auth.issuer {
        config = config.with_issuer(issuer.as_str());
    }
    if let Some(audience) = &auth.audience {
        config = config.with_audience(audience.as_str());
    }
    config
}

fn resend_config(email: &EmailConfig) -> ResendConfig {
    ResendConfig::new(
        email.resend_api_key.expose_secret().as_str(),
        email.from_header(),
    )
}

fn push_client(push: &PushConfig) -> Result<Option<ExpoPushClient>, Box<dyn std::error::Error>> {
    if !push.enabled {
        return Ok(None);
    }
    let mut config = ExpoPushConfig::new()
        .with_endpoint(push.endpoint.as_str())
        .with_timeout(push.timeout());
    if let Some(token) = &push.access_token {
        config = config.with_access_token(token.expose_secret().as_str());
    }
    Ok(Some(ExpoPushClient::new(config)?))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
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
