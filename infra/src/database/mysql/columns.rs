//! Column decoding shared by the MySQL repositories.
//!
//! Ids are stored as `CHAR(36)` and enums as their variant names.

use std::str::FromStr;

use eh_core::DomainError;
use eh_shared::Role;
use sqlx::mysql::MySqlRow;
use sqlx::{Decode, MySql, Row, Type};
use uuid::Uuid;

pub(crate) fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to {}: {}", action, e),
    }
}

/// Message of a duplicate-key error, `None` for any other error
pub(crate) fn unique_violation(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => Some(db.message().to_string()),
        _ => None,
    }
}

pub(crate) fn get<'r, T>(row: &'r MySqlRow, column: &str) -> Result<T, DomainError>
where
    T: Decode<'r, MySql> + Type<MySql>,
{
    row.try_get(column).map_err(|e| DomainError::Internal {
        message: format!("Failed to get {}: {}", column, e),
    })
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| DomainError::Internal {
        message: format!("Invalid UUID in {}: {}", column, e),
    })
}

pub(crate) fn uuid(row: &MySqlRow, column: &str) -> Result<Uuid, DomainError> {
    let value: String = get(row, column)?;
    parse_uuid(&value, column)
}

pub(crate) fn opt_uuid(row: &MySqlRow, column: &str) -> Result<Option<Uuid>, DomainError> {
    let value: Option<String> = get(row, column)?;
    value.map(|v| parse_uuid(&v, column)).transpose()
}

/// Decode a column holding an enum variant name
pub(crate) fn variant<T>(row: &MySqlRow, column: &str) -> Result<T, DomainError>
where
    T: FromStr<Err = String>,
{
    let value: String = get(row, column)?;
    value
        .parse()
        .map_err(|message| DomainError::Internal { message })
}

pub(crate) fn encode_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn decode_roles(value: &str) -> Result<Vec<Role>, DomainError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(|role| {
            role.parse::<Role>().map_err(|e| DomainError::Internal {
                message: format!("Invalid role {}: {}", role, e),
            })
        })
        .collect()
}

/// `?, ?, ?` for an `IN (...)` clause
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Escape `%`, `_` and `\` for a `LIKE ... ESCAPE '\\'` pattern
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles_round_trip_through_column_text() {
        let encoded = encode_roles(&[Role::User, Role::Admin]);
        assert_eq!(encoded, "User,Admin");
        assert_eq!(decode_roles(&encoded).unwrap(), vec![Role::User, Role::Admin]);
        assert_eq!(decode_roles(" User , ").unwrap(), vec![Role::User]);
        assert!(decode_roles("User,Root").is_err());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("loft"), "%loft%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(3), "?, ?, ?");
        assert_eq!(placeholders(1), "?");
    }

    #[test]
    fn test_parse_uuid_reports_column() {
        let err = parse_uuid("not-a-uuid", "owner_id").unwrap_err();
        assert!(err.to_string().contains("owner_id"));
    }
}
