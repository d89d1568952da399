//! Listing service: GraphQL API and listing photos

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use eh_api::{create_listing_app, telemetry, ListingState};
use eh_core::services::{
    AccessTokenValidator, AnalyticsService, ListingService, PhotoService, ReportService,
    UserDirectory,
};
use eh_infra::clients::{HttpContentModerator, HttpUserDirectory};
use eh_infra::database::{
    DatabasePool, MySqlLikeRepository, MySqlListingRepository, MySqlPhotoRepository,
    MySqlReportRepository, LISTING_MIGRATOR,
};
use eh_infra::storage::GridFsPhotoStorage;
use eh_shared::AppConfig;

const DEFAULT_PORT: u16 = 5002;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env(DEFAULT_PORT);
    telemetry::init_tracing(&config.environment);

    info!(
        environment = ?config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting EstateHub listing service"
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
        .run_migrations(&LISTING_MIGRATOR)
        .await
        .context("running listing migrations")?;
    info!(pool = %database.get_statistics(), "Database ready");
    let pool = database.get_pool().clone();

    let listings = Arc::new(MySqlListingRepository::new(pool.clone()));
    let likes = Arc::new(MySqlLikeRepository::new(pool.clone()));
    let photos = Arc::new(MySqlPhotoRepository::new(pool.clone()));
    let reports = Arc::new(MySqlReportRepository::new(pool));

    let storage = GridFsPhotoStorage::connect(&config.storage)
        .await
        .context("connecting to the photo store")?;
    let user_directory: Arc<dyn UserDirectory> = Arc::new(
        HttpUserDirectory::new(
            &config.services.auth_service_url,
            config.services.retry,
        )
        .context("building the user directory client")?,
    );

    let mut listing_service = ListingService::new(listings.clone(), likes);
    match config.services.moderation_url.as_deref() {
        Some(endpoint) => {
            let moderator = HttpContentModerator::new(endpoint, config.services.retry)
                .context("building the moderation client")?;
            listing_service = listing_service.with_moderator(Arc::new(moderator));
        }
        None => info!("MODERATION_URL is not set; listings are published without moderation"),
    }

    let state = web::Data::new(ListingState {
        listing_service: Arc::new(listing_service),
        photo_service: Arc::new(PhotoService::new(
            listings.clone(),
            photos,
            Arc::new(storage),
            config.storage.clone(),
        )),
        report_service: Arc::new(ReportService::new(reports.clone(), listings.clone())),
        analytics_service: Arc::new(AnalyticsService::new(
            listings,
            reports,
            Arc::clone(&user_directory),
        )),
        user_directory,
        token_validator: AccessTokenValidator::new(&config.auth.jwt),
        max_payload_size: config.server.max_payload_size,
    });
    let cors = config.cors.clone();
    let environment = config.environment;

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Listening");

    let mut server =
        HttpServer::new(move || create_listing_app(state.clone(), &cors, environment))
            .keep_alive(Duration::from_secs(config.server.keep_alive));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    server.bind(&bind_address)?.run().await?;

    database.close().await;
    Ok(())
}
