//! Authorization service: accounts, sessions and roles over REST

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use eh_api::{create_auth_app, telemetry, AuthState};
use eh_core::services::AuthService;
use eh_infra::database::{
    DatabasePool, MySqlSessionRepository, MySqlUserRepository, MySqlUserTokenRepository,
    AUTH_MIGRATOR,
};
use eh_infra::email::email_sender_from_config;
use eh_shared::AppConfig;

const DEFAULT_PORT: u16 = 5001;

/// How often expired sessions and e-mail tokens are purged
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env(DEFAULT_PORT);
    telemetry::init_tracing(&config.environment);

    info!(
        environment = ?config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting EstateHub authorization service"
    );
    if config.environment.is_production() {
        for warning in config.production_warnings() {
            warn!("{}", warning);
        }
    }

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("connecting to MySQL")?;
    database
        .run_migrations(&AUTH_MIGRATOR)
        .await
        .context("running authorization migrations")?;
    info!(pool = %database.get_statistics(), "Database ready");
    let pool = database.get_pool().clone();

    let email = email_sender_from_config(&config.email).context("configuring e-mail")?;
    let auth_service = Arc::new(AuthService::new(
        Arc::new(MySqlUserRepository::new(pool.clone())),
        Arc::new(MySqlSessionRepository::new(pool.clone())),
        Arc::new(MySqlUserTokenRepository::new(pool)),
        email,
        config.auth.clone(),
    ));

    spawn_cleanup(Arc::clone(&auth_service));

    let state = web::Data::new(AuthState {
        auth_service,
        max_payload_size: config.server.max_payload_size,
    });
    let cors = config.cors.clone();
    let environment = config.environment;

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Listening");

    let mut server = HttpServer::new(move || create_auth_app(state.clone(), &cors, environment))
        .keep_alive(Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server.bind(&bind_address)?.run().await?;

    database.close().await;
    Ok(())
}

fn spawn_cleanup(auth_service: Arc<AuthService>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            let result = auth_service.cleanup_expired().await;
            if result.is_success() {
                info!(
                    sessions = result.sessions_deleted,
                    user_tokens = result.user_tokens_deleted,
                    "Expired credentials purged"
                );
            } else {
                warn!(errors = ?result.errors, "Credential cleanup finished with errors");
            }
        }
    });
}
