// src/models/accommodation.rs
// DOCUMENTATION: Pousadas, hotels and villas
// PURPOSE: Database model plus create/update DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::catalog::{CatalogEntity, CatalogPatch, ItemKind};
use crate::db::{CatalogStore, Storage};

/// A place to stay, priced per night
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Accommodation {
    pub id: i32,
    pub name: String,
    pub description: String,

    /// pousada, hotel, villa, chalet
    pub accommodation_type: String,
    pub location: String,
    pub price_per_night: f64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub max_guests: i32,
    pub amenities: Vec<String>,
    pub image_url: String,
    pub rating: f64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for POST /api/accommodations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAccommodation {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 60))]
    pub accommodation_type: String,

    #[validate(length(min = 1, max = 200))]
    pub location: String,

    #[validate(range(min = 0.0))]
    pub price_per_night: f64,

    #[validate(range(min = 0, max = 50))]
    pub bedrooms: i32,

    #[validate(range(min = 0, max = 50))]
    pub bathrooms: i32,

    #[validate(range(min = 1, max = 100))]
    pub max_guests: i32,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[validate(length(min = 1))]
    pub image_url: String,

    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub featured: bool,
}

/// Request DTO for PUT /api/accommodations/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub accommodation_type: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub price_per_night: Option<f64>,
    #[validate(range(min = 0, max = 50))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, max = 50))]
    pub bathrooms: Option<i32>,
    #[validate(range(min = 1, max = 100))]
    pub max_guests: Option<i32>,
    pub amenities: Option<Vec<String>>,
    #[validate(length(min = 1))]
    pub image_url: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub featured: Option<bool>,
}

impl CatalogPatch for AccommodationPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.accommodation_type.is_none()
            && self.location.is_none()
            && self.price_per_night.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.max_guests.is_none()
            && self.amenities.is_none()
            && self.image_url.is_none()
            && self.rating.is_none()
            && self.featured.is_none()
    }
}

impl CatalogEntity for Accommodation {
    type Draft = NewAccommodation;
    type Patch = AccommodationPatch;

    const KIND: ItemKind = ItemKind::Accommodation;

    fn id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> &str {
        &self.name
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category(&self) -> &str {
        &self.accommodation_type
    }
    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn unit_price(&self) -> f64 {
        self.price_per_night
    }
    fn rating(&self) -> f64 {
        self.rating
    }
    fn featured(&self) -> bool {
        self.featured
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn capacity(&self) -> Option<i32> {
        Some(self.max_guests)
    }

    fn from_draft(id: i32, draft: NewAccommodation, created_at: DateTime<Utc>) -> Self {
        Accommodation {
            id,
            name: draft.name,
            description: draft.description,
            accommodation_type: draft.accommodation_type,
            location: draft.location,
            price_per_night: draft.price_per_night,
            bedrooms: draft.bedrooms,
            bathrooms: draft.bathrooms,
            max_guests: draft.max_guests,
            amenities: draft.amenities,
            image_url: draft.image_url,
            rating: draft.rating.unwrap_or(0.0),
            featured: draft.featured,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: AccommodationPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(accommodation_type) = patch.accommodation_type {
            self.accommodation_type = accommodation_type;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(price) = patch.price_per_night {
            self.price_per_night = price;
        }
        if let Some(bedrooms) = patch.bedrooms {
            self.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = patch.bathrooms {
            self.bathrooms = bathrooms;
        }
        if let Some(max_guests) = patch.max_guests {
            self.max_guests = max_guests;
        }
        if let Some(amenities) = patch.amenities {
            self.amenities = amenities;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = image_url;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(featured) = patch.featured {
            self.featured = featured;
        }
    }

    fn store(storage: &dyn Storage) -> &dyn CatalogStore<Self> {
        storage.accommodations()
    }
}
