//! Fixtures shared by the unit tests

use eh_shared::Role;
use uuid::Uuid;

use crate::domain::entities::{Listing, ListingCategory, ListingType};
use crate::domain::value_objects::{Actor, ListingInput};

pub fn user_actor() -> Actor {
    Actor::new(Uuid::new_v4(), vec![Role::User])
}

pub fn admin_actor() -> Actor {
    Actor::new(Uuid::new_v4(), vec![Role::User, Role::Admin])
}

pub fn listing_input(title: &str) -> ListingInput {
    ListingInput {
        title: title.to_string(),
        description: "Bright flat with a balcony".to_string(),
        listing_type: ListingType::Rent,
        category: ListingCategory::Apartment,
        price: 1000.0,
        currency: None,
        area_sqm: Some(60.0),
        rooms: Some(2),
        address: None,
        city: "Lisbon".to_string(),
        country: "Portugal".to_string(),
        latitude: None,
        longitude: None,
    }
}

pub fn published_listing(owner_id: Uuid, title: &str) -> Listing {
    let mut listing = Listing::new(owner_id, listing_input(title));
    listing.status = crate::domain::entities::ListingStatus::Published;
    listing
}
