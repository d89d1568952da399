//! Domain errors as GraphQL field errors
//!
//! The message is the problem `detail`; `extensions` carry the same `code`
//! and HTTP `status` the REST routes would answer with.

use juniper::{FieldError, Object, Value};

use eh_core::DomainError;
use eh_shared::Error;

use crate::handlers::ApiError;

pub fn field_error(error: &Error) -> FieldError {
    let mut extensions = Object::with_capacity(3);
    extensions.add_field("code", Value::scalar(error.code.clone()));
    extensions.add_field("status", Value::scalar(i32::from(error.http_status())));

    if !error.field_errors.is_empty() {
        let mut fields = Object::with_capacity(error.field_errors.len());
        for (field, messages) in &error.field_errors {
            let messages = messages
                .iter()
                .map(|message| Value::scalar(message.clone()))
                .collect();
            fields.add_field(field.clone(), Value::list(messages));
        }
        extensions.add_field("errors", Value::object(fields));
    }

    FieldError::new(error.description.clone(), Value::object(extensions))
}

/// Log like the REST layer does, then convert
pub fn domain_error(error: DomainError) -> FieldError {
    let ApiError(error) = ApiError::from(error);
    field_error(&error)
}

pub fn unauthenticated() -> FieldError {
    field_error(&Error::unauthorized("Authentication is required"))
}

/// `.map_err(domain_error)` shorthand
pub trait IntoFieldResult<T> {
    fn into_field_result(self) -> juniper::FieldResult<T>;
}

impl<T> IntoFieldResult<T> for Result<T, DomainError> {
    fn into_field_result(self) -> juniper::FieldResult<T> {
        self.map_err(domain_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eh_core::{ReportError, ValidationError};
    use juniper::DefaultScalarValue;

    fn extensions(error: &FieldError) -> &Object<DefaultScalarValue> {
        error.extensions().as_object_value().unwrap()
    }

    #[test]
    fn test_code_and_status_in_extensions() {
        let error = domain_error(DomainError::Report(ReportError::DuplicateOpenReport));
        let ext = extensions(&error);

        assert_eq!(
            ext.get_field_value("code").and_then(|v| v.as_string_value()),
            Some("DUPLICATE_REPORT")
        );
        assert_eq!(
            ext.get_field_value("status")
                .and_then(|v| v.as_scalar_value::<i32>()),
            Some(&409)
        );
    }

    #[test]
    fn test_validation_fields_are_listed() {
        let error = domain_error(DomainError::Validation(ValidationError::InvalidLength {
            field: "title".to_string(),
            min: 3,
            max: 200,
        }));
        let ext = extensions(&error);
        let fields = ext
            .get_field_value("errors")
            .and_then(|v| v.as_object_value())
            .unwrap();
        assert!(fields.get_field_value("title").is_some());
    }

    #[test]
    fn test_unauthenticated() {
        let error = unauthenticated();
        assert_eq!(
            extensions(&error)
                .get_field_value("code")
                .and_then(|v| v.as_string_value()),
            Some("UNAUTHORIZED")
        );
    }
}
