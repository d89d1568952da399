//! Listing input, patch and search filter.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::{ListingCategory, ListingStatus, ListingType};

/// Fields of a new listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ListingInput {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,

    pub listing_type: ListingType,
    pub category: ListingCategory,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,

    #[validate(length(equal = 3, message = "Currency must be a 3 letter code"))]
    pub currency: Option<String>,

    #[validate(range(min = 0.0, message = "Area must not be negative"))]
    pub area_sqm: Option<f64>,

    #[validate(range(min = 0, max = 1000, message = "Rooms must be between 0 and 1000"))]
    pub rooms: Option<i32>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 100, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, max = 100, message = "Country is required"))]
    pub country: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
}

impl ListingInput {
    /// Trim free text before validation so whitespace cannot pad a title
    pub fn normalized(mut self) -> Self {
        self.title = self.title.trim().to_string();
        self.city = self.city.trim().to_string();
        self.country = self.country.trim().to_string();
        self
    }
}

/// Partial update; `None` leaves the field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ListingPatch {
    #[validate(length(min = 3, max = 200, message = "Title must be 3 to 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    pub listing_type: Option<ListingType>,
    pub category: Option<ListingCategory>,

    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: Option<f64>,

    #[validate(length(equal = 3, message = "Currency must be a 3 letter code"))]
    pub currency: Option<String>,

    #[validate(range(min = 0.0, message = "Area must not be negative"))]
    pub area_sqm: Option<f64>,

    #[validate(range(min = 0, max = 1000, message = "Rooms must be between 0 and 1000"))]
    pub rooms: Option<i32>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    #[validate(length(min = 1, max = 100, message = "City must not be empty"))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Country must not be empty"))]
    pub country: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
}

impl ListingPatch {
    pub fn normalized(mut self) -> Self {
        self.title = self.title.map(|t| t.trim().to_string());
        self.city = self.city.map(|c| c.trim().to_string());
        self.country = self.country.map(|c| c.trim().to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingSort {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
    MostLiked,
}

/// Search criteria; every set field must match
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingFilter {
    /// Case-insensitive match against title or description
    pub text: Option<String>,
    pub listing_type: Option<ListingType>,
    pub category: Option<ListingCategory>,
    /// Case-insensitive exact city match
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rooms: Option<i32>,
    pub status: Option<ListingStatus>,
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub sort: ListingSort,
}

impl ListingFilter {
    pub fn for_owner(owner_id: Uuid) -> Self {
        Self {
            owner_id: Some(owner_id),
            ..Default::default()
        }
    }

    /// Text search needle, `None` when blank
    pub fn text_needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ListingInput {
        ListingInput {
            title: "Quiet house".to_string(),
            description: String::new(),
            listing_type: ListingType::Sale,
            category: ListingCategory::House,
            price: 250_000.0,
            currency: None,
            area_sqm: None,
            rooms: Some(4),
            address: None,
            city: "Porto".to_string(),
            country: "Portugal".to_string(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_valid_input() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_bounds() {
        let mut bad = input();
        bad.title = "ab".to_string();
        bad.price = -1.0;
        bad.latitude = Some(91.0);
        bad.longitude = Some(-180.5);
        bad.description = "x".repeat(5001);

        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["title", "price", "latitude", "longitude", "description"] {
            assert!(fields.contains_key(field), "missing error for {}", field);
        }
    }

    #[test]
    fn test_edges_are_inclusive() {
        let mut edge = input();
        edge.title = "x".repeat(200);
        edge.price = 0.0;
        edge.latitude = Some(-90.0);
        edge.longitude = Some(180.0);
        edge.description = "x".repeat(5000);
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn test_normalized_trims_before_length_check() {
        let mut padded = input();
        padded.title = "  ab  ".to_string();
        assert!(padded.clone().validate().is_ok());
        assert!(padded.normalized().validate().is_err());
    }

    #[test]
    fn test_empty_patch_is_valid() {
        assert!(ListingPatch::default().validate().is_ok());
        let patch = ListingPatch {
            title: Some("no".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_text_needle() {
        let filter = ListingFilter {
            text: Some("  Loft ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.text_needle().as_deref(), Some("loft"));
        assert!(ListingFilter::default().text_needle().is_none());
    }
}
