use actix_web::HttpResponse;

use eh_shared::HealthResponse;

/// GET /health of the authorization service
pub async fn auth_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::new("auth", env!("CARGO_PKG_VERSION")))
}

/// GET /health of the listing service
pub async fn listing_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::new("listing", env!("CARGO_PKG_VERSION")))
}
