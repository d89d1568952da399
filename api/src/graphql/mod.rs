//! GraphQL API of the listing service (juniper)

pub mod context;
pub mod errors;
pub mod handler;
pub mod schema;
pub mod types;

pub use context::GraphQLContext;
pub use handler::{graphiql, graphql};
pub use schema::{create_schema, Mutation, Query, Schema};
