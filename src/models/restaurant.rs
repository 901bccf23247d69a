// src/models/restaurant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::catalog::{CatalogEntity, CatalogPatch, ItemKind};
use crate::db::{CatalogStore, Storage};

/// Restaurant listing; reservations are estimated per guest from average_price
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub cuisine: String,

    /// "$" to "$$$$"
    pub price_range: String,
    pub average_price: f64,
    pub location: String,
    pub opening_hours: String,
    pub phone: Option<String>,
    pub image_url: String,
    pub rating: f64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRestaurant {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 60))]
    pub cuisine: String,

    #[validate(length(min = 1, max = 4))]
    pub price_range: String,

    #[validate(range(min = 0.0))]
    pub average_price: f64,

    #[validate(length(min = 1, max = 200))]
    pub location: String,

    #[validate(length(min = 1, max = 120))]
    pub opening_hours: String,

    #[validate(length(min = 5, max = 30))]
    #[serde(default)]
    pub phone: Option<String>,

    #[validate(length(min = 1))]
    pub image_url: String,

    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantPatch {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub cuisine: Option<String>,
    #[validate(length(min = 1, max = 4))]
    pub price_range: Option<String>,
    #[validate(range(min = 0.0))]
    pub average_price: Option<f64>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub opening_hours: Option<String>,
    #[validate(length(min = 5, max = 30))]
    pub phone: Option<String>,
    #[validate(length(min = 1))]
    pub image_url: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub featured: Option<bool>,
}

impl CatalogPatch for RestaurantPatch {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.cuisine.is_none()
            && self.price_range.is_none()
            && self.average_price.is_none()
            && self.location.is_none()
            && self.opening_hours.is_none()
            && self.phone.is_none()
            && self.image_url.is_none()
            && self.rating.is_none()
            && self.featured.is_none()
    }
}

impl CatalogEntity for Restaurant {
    type Draft = NewRestaurant;
    type Patch = RestaurantPatch;

    const KIND: ItemKind = ItemKind::Restaurant;

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
        &self.cuisine
    }
    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn unit_price(&self) -> f64 {
        self.average_price
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
        None
    }

    fn from_draft(id: i32, draft: NewRestaurant, created_at: DateTime<Utc>) -> Self {
        Restaurant {
            id,
            name: draft.name,
            description: draft.description,
            cuisine: draft.cuisine,
            price_range: draft.price_range,
            average_price: draft.average_price,
            location: draft.location,
            opening_hours: draft.opening_hours,
            phone: draft.phone,
            image_url: draft.image_url,
            rating: draft.rating.unwrap_or(0.0),
            featured: draft.featured,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: RestaurantPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(cuisine) = patch.cuisine {
            self.cuisine = cuisine;
        }
        if let Some(price_range) = patch.price_range {
            self.price_range = price_range;
        }
        if let Some(average_price) = patch.average_price {
            self.average_price = average_price;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(opening_hours) = patch.opening_hours {
            self.opening_hours = opening_hours;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
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
        storage.restaurants()
    }
}
