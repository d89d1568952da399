pub mod error;
pub mod health;

pub use error::{
    json_config, not_found, path_config, problem_response, query_config, validate_body, ApiError,
    ApiResult,
};
