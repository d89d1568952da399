//! Listing entity: a property offered for sale or rent.

use chrono::{DateTime, Utc};
use eh_shared::ClaimsPrincipal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{Actor, ListingInput, ListingPatch};
use crate::errors::ListingError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingType {
    Sale,
    Rent,
}

string_enum!(ListingType { Sale, Rent });

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingCategory {
    Apartment,
    House,
    Land,
    Commercial,
    Room,
}

string_enum!(ListingCategory {
    Apartment,
    House,
    Land,
    Commercial,
    Room
});

/// Lifecycle: Draft -> Published <-> Archived, Draft -> Archived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Draft,
    Published,
    Archived,
}

string_enum!(ListingStatus {
    Draft,
    Published,
    Archived
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub listing_type: ListingType,
    pub category: ListingCategory,
    pub status: ListingStatus,
    pub price: f64,
    /// ISO 4217 code
    pub currency: String,
    pub area_sqm: Option<f64>,
    pub rooms: Option<i32>,
    pub address: Option<String>,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub likes_count: i64,
    pub is_deleted: bool,
    /// Optimistic concurrency token, bumped by every persisted update
    pub row_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// New draft owned by `owner_id`; the input must already be validated
    pub fn new(owner_id: Uuid, input: ListingInput) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: input.title.trim().to_string(),
            description: input.description,
            listing_type: input.listing_type,
            category: input.category,
            status: ListingStatus::Draft,
            price: input.price,
            currency: input
                .currency
                .map(|c| c.trim().to_uppercase())
                .unwrap_or_else(|| "USD".to_string()),
            area_sqm: input.area_sqm,
            rooms: input.rooms,
            address: input.address,
            city: input.city.trim().to_string(),
            country: input.country.trim().to_string(),
            latitude: input.latitude,
            longitude: input.longitude,
            likes_count: 0,
            is_deleted: false,
            row_version: 1,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    pub fn apply_patch(&mut self, patch: ListingPatch) {
        if let Some(title) = patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(listing_type) = patch.listing_type {
            self.listing_type = listing_type;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(currency) = patch.currency {
            self.currency = currency.trim().to_uppercase();
        }
        if patch.area_sqm.is_some() {
            self.area_sqm = patch.area_sqm;
        }
        if patch.rooms.is_some() {
            self.rooms = patch.rooms;
        }
        if patch.address.is_some() {
            self.address = patch.address;
        }
        if let Some(city) = patch.city {
            self.city = city.trim().to_string();
        }
        if let Some(country) = patch.country {
            self.country = country.trim().to_string();
        }
        if patch.latitude.is_some() {
            self.latitude = patch.latitude;
        }
        if patch.longitude.is_some() {
            self.longitude = patch.longitude;
        }
        self.updated_at = Utc::now();
    }

    pub fn publish(&mut self) -> Result<(), ListingError> {
        match self.status {
            ListingStatus::Draft | ListingStatus::Archived => {
                let now = Utc::now();
                self.status = ListingStatus::Published;
                self.published_at = Some(now);
                self.updated_at = now;
                Ok(())
            }
            ListingStatus::Published => Err(self.invalid_transition(ListingStatus::Published)),
        }
    }

    pub fn archive(&mut self) -> Result<(), ListingError> {
        match self.status {
            ListingStatus::Draft | ListingStatus::Published => {
                self.status = ListingStatus::Archived;
                self.updated_at = Utc::now();
                Ok(())
            }
            ListingStatus::Archived => Err(self.invalid_transition(ListingStatus::Archived)),
        }
    }

    pub fn soft_delete(&mut self) {
        self.is_deleted = true;
        self.updated_at = Utc::now();
    }

    pub fn is_published(&self) -> bool {
        !self.is_deleted && self.status == ListingStatus::Published
    }

    /// Published listings are public; drafts and archived ones are only
    /// visible to the owner and admins. Deleted listings are never visible.
    pub fn is_visible_to(&self, viewer: Option<&Actor>) -> bool {
        if self.is_deleted {
            return false;
        }
        self.status == ListingStatus::Published
            || viewer.is_some_and(|actor| actor.can_modify(self.owner_id))
    }

    fn invalid_transition(&self, to: ListingStatus) -> ListingError {
        ListingError::InvalidTransition {
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eh_shared::Role;

    pub(crate) fn input() -> ListingInput {
        ListingInput {
            title: "  Sunny loft  ".to_string(),
            description: "Two rooms near the park".to_string(),
            listing_type: ListingType::Rent,
            category: ListingCategory::Apartment,
            price: 1200.0,
            currency: Some("eur".to_string()),
            area_sqm: Some(54.0),
            rooms: Some(2),
            address: None,
            city: "Lisbon".to_string(),
            country: "Portugal".to_string(),
            latitude: Some(38.72),
            longitude: Some(-9.14),
        }
    }

    #[test]
    fn test_new_listing_is_draft() {
        let listing = Listing::new(Uuid::new_v4(), input());
        assert_eq!(listing.status, ListingStatus::Draft);
        assert_eq!(listing.title, "Sunny loft");
        assert_eq!(listing.currency, "EUR");
        assert_eq!(listing.row_version, 1);
        assert!(listing.published_at.is_none());
    }

    #[test]
    fn test_status_transitions() {
        let mut listing = Listing::new(Uuid::new_v4(), input());
        listing.publish().unwrap();
        assert!(listing.is_published());
        assert!(listing.published_at.is_some());
        assert!(matches!(
            listing.publish(),
            Err(ListingError::InvalidTransition { .. })
        ));

        listing.archive().unwrap();
        assert!(listing.archive().is_err());
        listing.publish().unwrap();
        assert_eq!(listing.status, ListingStatus::Published);
    }

    #[test]
    fn test_visibility() {
        let owner = Actor::new(Uuid::new_v4(), vec![Role::User]);
        let stranger = Actor::new(Uuid::new_v4(), vec![Role::User]);
        let admin = Actor::new(Uuid::new_v4(), vec![Role::User, Role::Admin]);
        let mut listing = Listing::new(owner.user_id, input());

        assert!(!listing.is_visible_to(None));
        assert!(!listing.is_visible_to(Some(&stranger)));
        assert!(listing.is_visible_to(Some(&owner)));
        assert!(listing.is_visible_to(Some(&admin)));

        listing.publish().unwrap();
        assert!(listing.is_visible_to(None));

        listing.soft_delete();
        assert!(!listing.is_visible_to(Some(&admin)));
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut listing = Listing::new(Uuid::new_v4(), input());
        listing.apply_patch(ListingPatch {
            price: Some(999.0),
            rooms: Some(3),
            ..Default::default()
        });
        assert_eq!(listing.price, 999.0);
        assert_eq!(listing.rooms, Some(3));
        assert_eq!(listing.city, "Lisbon");
        assert_eq!(listing.area_sqm, Some(54.0));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("sale".parse::<ListingType>().unwrap(), ListingType::Sale);
        assert_eq!("PUBLISHED".parse::<ListingStatus>().unwrap(), ListingStatus::Published);
        assert!("Castle".parse::<ListingCategory>().is_err());
        assert_eq!(ListingCategory::Commercial.to_string(), "Commercial");
    }
}
