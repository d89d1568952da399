//! Application factories
//!
//! One factory per service; the binaries hand them to `HttpServer` and the
//! integration tests to `actix_web::test::init_service`.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error,
};
use tracing_actix_web::TracingLogger;

use eh_shared::{CorsConfig, Environment};

use crate::graphql::{self, create_schema};
use crate::handlers::{health, json_config, not_found, path_config, query_config};
use crate::middleware::{create_cors, JwtAuth, SecurityMiddleware};
use crate::routes::auth::{email, login, logout, password, refresh, register, sessions};
use crate::routes::{photos, users};
use crate::state::{AuthState, ListingState};

/// Authorization service: account, session and role routes under `/api/v1`
pub fn create_auth_app(
    state: web::Data<AuthState>,
    cors: &CorsConfig,
    environment: Environment,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let validator = web::Data::new(state.token_validator());
    let max_payload_size = state.max_payload_size;

    App::new()
        .app_data(state)
        .app_data(validator)
        .app_data(json_config(max_payload_size))
        .app_data(path_config())
        .app_data(query_config())
        // Outermost last: request span, then CORS, then security headers
        .wrap(SecurityMiddleware::new(environment))
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health::auth_health))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/register", web::post().to(register::register))
                        .route("/login", web::post().to(login::login))
                        .route("/refresh", web::post().to(refresh::refresh))
                        .route("/confirm-email", web::post().to(email::confirm_email))
                        .route(
                            "/resend-confirmation",
                            web::post().to(email::resend_confirmation),
                        )
                        .route("/forgot-password", web::post().to(password::forgot_password))
                        .route("/reset-password", web::post().to(password::reset_password))
                        .route(
                            "/logout",
                            web::post().to(logout::logout).wrap(JwtAuth::required()),
                        )
                        .route(
                            "/logout-all",
                            web::post().to(logout::logout_all).wrap(JwtAuth::required()),
                        )
                        .route(
                            "/change-password",
                            web::post()
                                .to(password::change_password)
                                .wrap(JwtAuth::required()),
                        )
                        .route(
                            "/sessions",
                            web::get()
                                .to(sessions::list_sessions)
                                .wrap(JwtAuth::required()),
                        )
                        .route(
                            "/sessions/{id}",
                            web::delete()
                                .to(sessions::revoke_session)
                                .wrap(JwtAuth::required()),
                        ),
                )
                .service(
                    // `/me` and `/stats` before `/{id}`
                    web::scope("/users")
                        .wrap(JwtAuth::required())
                        .route("/me", web::get().to(users::me))
                        .route("/stats", web::get().to(users::stats))
                        .route("/{id}", web::get().to(users::get_user))
                        .route("/{id}/roles", web::post().to(users::assign_role))
                        .route("/{id}/roles/{role}", web::delete().to(users::remove_role)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Listing service: GraphQL plus the photo byte routes
pub fn create_listing_app(
    state: web::Data<ListingState>,
    cors: &CorsConfig,
    environment: Environment,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let validator = web::Data::new(state.token_validator.clone());
    let max_payload_size = state.max_payload_size;

    App::new()
        .app_data(state)
        .app_data(validator)
        .app_data(web::Data::new(create_schema()))
        .app_data(json_config(max_payload_size))
        .app_data(path_config())
        .app_data(query_config())
        .wrap(SecurityMiddleware::new(environment))
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health::listing_health))
        .service(
            web::resource("/graphql")
                .wrap(JwtAuth::optional())
                .route(web::post().to(graphql::graphql))
                .route(web::get().to(graphql::graphiql)),
        )
        .service(
            web::scope("/api/v1")
                .route(
                    "/listings/{id}/photos",
                    web::post()
                        .to(photos::upload_photo)
                        .wrap(JwtAuth::required()),
                )
                .route(
                    "/photos/{id}",
                    web::get().to(photos::get_photo).wrap(JwtAuth::optional()),
                )
                .route(
                    "/photos/{id}",
                    web::delete()
                        .to(photos::delete_photo)
                        .wrap(JwtAuth::required()),
                ),
        )
        .default_service(web::route().to(not_found))
}
