//! Photo storage configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// GridFS bucket holding listing photos, plus upload limits
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhotoStorageConfig {
    pub mongodb_uri: String,
    pub database: String,
    pub bucket: String,
    /// Largest accepted upload in bytes
    pub max_photo_bytes: usize,
    pub max_photos_per_listing: usize,
    pub allowed_content_types: Vec<String>,
}

impl Default for PhotoStorageConfig {
    fn default() -> Self {
        Self {
            mongodb_uri: String::from("mongodb://localhost:27017"),
            database: String::from("estatehub"),
            bucket: String::from("listing_photos"),
            max_photo_bytes: 10 * 1024 * 1024,
            max_photos_per_listing: 20,
            allowed_content_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
        }
    }
}

impl PhotoStorageConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            mongodb_uri: std::env::var("MONGODB_URI").unwrap_or(defaults.mongodb_uri),
            database: std::env::var("MONGODB_DATABASE").unwrap_or(defaults.database),
            bucket: std::env::var("PHOTO_BUCKET").unwrap_or(defaults.bucket),
            max_photo_bytes: env_or("PHOTO_MAX_BYTES", defaults.max_photo_bytes),
            max_photos_per_listing: env_or(
                "PHOTO_MAX_PER_LISTING",
                defaults.max_photos_per_listing,
            ),
            allowed_content_types: defaults.allowed_content_types,
        }
    }

    pub fn is_allowed_content_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_content_types.iter().any(|allowed| *allowed == essence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_check_ignores_parameters_and_case() {
        let config = PhotoStorageConfig::default();
        assert!(config.is_allowed_content_type("image/JPEG"));
        assert!(config.is_allowed_content_type("image/png; charset=binary"));
        assert!(!config.is_allowed_content_type("image/gif"));
        assert!(!config.is_allowed_content_type("application/pdf"));
    }
}
