//! CORS middleware configuration for cross-origin requests.
//!
//! Built from [`CorsConfig`]: development allows any origin, production only
//! the origins listed in `CORS_ALLOWED_ORIGINS` (the frontend).

use actix_cors::Cors;
use actix_web::http::header;

use eh_shared::CorsConfig;

/// Creates a CORS middleware instance from the configuration.
///
/// A `*` entry in origins, methods or headers allows any value. With CORS
/// disabled no cross-origin request is allowed.
pub fn create_cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        tracing::info!("CORS disabled, cross-origin requests are refused");
        return Cors::default();
    }

    let mut cors = Cors::default()
        .expose_headers(vec![header::CONTENT_TYPE, header::CONTENT_LENGTH])
        .max_age(config.max_age);

    if config.allows_any_origin() {
        tracing::info!("CORS allows any origin");
        cors = cors.allow_any_origin();
    } else {
        for origin in &config.allowed_origins {
            tracing::info!("Adding allowed origin: {}", origin);
            cors = cors.allowed_origin(origin);
        }
    }

    cors = if is_wildcard(&config.allowed_methods) {
        cors.allow_any_method()
    } else {
        cors.allowed_methods(config.allowed_methods.iter().map(String::as_str))
    };

    cors = if is_wildcard(&config.allowed_headers) {
        cors.allow_any_header()
    } else {
        cors.allowed_headers(config.allowed_headers.iter().map(String::as_str))
    };

    // browsers refuse credentials together with a wildcard origin
    if config.allow_credentials && !config.allows_any_origin() {
        cors = cors.supports_credentials();
    }

    cors
}

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|value| value == "*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::Method, test, web, App, HttpResponse};

    fn app_config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            allow_credentials: true,
            ..CorsConfig::default()
        }
    }

    #[actix_web::test]
    async fn test_listed_origin_is_allowed() {
        let config = app_config(&["https://estatehub.example"]);
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config))
                .route("/health", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/health")
            .insert_header((header::ORIGIN, "https://estatehub.example"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "GET"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://estatehub.example"
        );
    }

    #[core::prelude::v1::test]
    fn test_development_config_builds() {
        let _cors = create_cors(&CorsConfig::development());
        let _disabled = create_cors(&CorsConfig {
            enabled: false,
            ..CorsConfig::default()
        });
    }
}
