// src/models/vehicle.rs
// DOCUMENTATION: Buggy, scooter and car rentals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::catalog::{CatalogEntity, CatalogPatch, ItemKind};
use crate::db::{CatalogStore, Storage};

/// A rentable vehicle, priced per day
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRental {
    pub id: i32,
    pub name: String,
    pub description: String,

    /// buggy, scooter, car, bike
    pub vehicle_type: String,

    /// Pickup point
    pub location: String,
    pub price_per_day: f64,
    pub seats: i32,

    /// Unavailable vehicles stay listed but cannot be booked
    pub available: bool,
    pub image_url: String,
    pub rating: f64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicleRental {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 60))]
    pub vehicle_type: String,

    #[validate(length(min = 1, max = 200))]
    pub location: String,

    #[validate(range(min = 0.0))]
    pub price_per_day: f64,

    #[validate(range(min = 1, max = 20))]
    pub seats: i32,

    #[serde(default = "default_available")]
    pub available: bool,

    #[validate(length(min = 1))]
    pub image_url: String,

    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub featured: bool,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRentalPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub vehicle_type: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub price_per_day: Option<f64>,
    #[validate(range(min = 1, max = 20))]
    pub seats: Option<i32>,
    pub available: Option<bool>,
    #[validate(length(min = 1))]
    pub image_url: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub featured: Option<bool>,
}

impl CatalogPatch for VehicleRentalPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.vehicle_type.is_none()
            && self.location.is_none()
            && self.price_per_day.is_none()
            && self.seats.is_none()
            && self.available.is_none()
            && self.image_url.is_none()
            && self.rating.is_none()
            && self.featured.is_none()
    }
}

impl CatalogEntity for VehicleRental {
    type Draft = NewVehicleRental;
    type Patch = VehicleRentalPatch;

    const KIND: ItemKind = ItemKind::Vehicle;

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
        &self.vehicle_type
    }
    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn unit_price(&self) -> f64 {
        self.price_per_day
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
        Some(self.seats)
    }
    fn bookable(&self) -> bool {
        self.available
    }

    fn from_draft(id: i32, draft: NewVehicleRental, created_at: DateTime<Utc>) -> Self {
        VehicleRental {
            id,
            name: draft.name,
            description: draft.description,
            vehicle_type: draft.vehicle_type,
            location: draft.location,
            price_per_day: draft.price_per_day,
            seats: draft.seats,
            available: draft.available,
            image_url: draft.image_url,
            rating: draft.rating.unwrap_or(0.0),
            featured: draft.featured,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: VehicleRentalPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(vehicle_type) = patch.vehicle_type {
            self.vehicle_type = vehicle_type;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(price) = patch.price_per_day {
            self.price_per_day = price;
        }
        if let Some(seats) = patch.seats {
            self.seats = seats;
        }
        if let Some(available) = patch.available {
            self.available = available;
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
        storage.vehicles()
    }
}
