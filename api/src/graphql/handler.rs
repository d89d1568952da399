//! GraphQL endpoint of the listing service

use actix_web::{http::StatusCode, web, HttpResponse};
use juniper::http::{graphiql::graphiql_source, GraphQLBatchRequest};

use super::{GraphQLContext, Schema};
use crate::middleware::OptionalAuth;
use crate::state::ListingState;

/// Handler for POST /graphql
///
/// Anonymous callers may query published listings; everything else needs a
/// bearer token. Field failures come back as `errors[].extensions.code`
/// with status 200, request-level failures (parse, validation) with 400.
pub async fn graphql(
    schema: web::Data<Schema>,
    state: web::Data<ListingState>,
    auth: OptionalAuth,
    request: web::Json<GraphQLBatchRequest>,
) -> HttpResponse {
    let context = GraphQLContext::new(state, auth.0);
    let response = request.execute(schema.get_ref(), &context).await;
    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    HttpResponse::build(status).json(response)
}

/// Handler for GET /graphql
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(graphiql_source("/graphql", None))
}
