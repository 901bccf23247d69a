// src/models/experience.rs
// DOCUMENTATION: Guided experiences (diving, boat tours, trails)
// PURPOSE: Database model plus create/update DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::catalog::{CatalogEntity, CatalogPatch, ItemKind};
use crate::db::{CatalogStore, Storage};

/// A bookable guided experience, priced per guest
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: i32,
    pub title: String,
    pub description: String,

    /// diving, boat_tour, trail, snorkeling, ...
    pub category: String,
    pub location: String,

    /// Human readable duration ("3 horas", "dia inteiro")
    pub duration: String,
    pub price: f64,
    pub max_guests: i32,
    pub image_url: String,
    pub rating: f64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for POST /api/experiences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewExperience {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 60))]
    pub category: String,

    #[validate(length(min = 1, max = 200))]
    pub location: String,

    #[validate(length(min = 1, max = 60))]
    pub duration: String,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(range(min = 1, max = 500))]
    pub max_guests: i32,

    #[validate(length(min = 1))]
    pub image_url: String,

    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub featured: bool,
}

/// Request DTO for PUT /api/experiences/{id}
/// All fields are optional - only provided fields are updated
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub duration: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 1, max = 500))]
    pub max_guests: Option<i32>,
    #[validate(length(min = 1))]
    pub image_url: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub featured: Option<bool>,
}

impl CatalogPatch for ExperiencePatch {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.location.is_none()
            && self.duration.is_none()
            && self.price.is_none()
            && self.max_guests.is_none()
            && self.image_url.is_none()
            && self.rating.is_none()
            && self.featured.is_none()
    }
}

impl CatalogEntity for Experience {
    type Draft = NewExperience;
    type Patch = ExperiencePatch;

    const KIND: ItemKind = ItemKind::Experience;

    fn id(&self) -> i32 {
        self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
    fn unit_price(&self) -> f64 {
        self.price
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

    fn from_draft(id: i32, draft: NewExperience, created_at: DateTime<Utc>) -> Self {
        Experience {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            location: draft.location,
            duration: draft.duration,
            price: draft.price,
            max_guests: draft.max_guests,
            image_url: draft.image_url,
            rating: draft.rating.unwrap_or(0.0),
            featured: draft.featured,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: ExperiencePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(duration) = patch.duration {
            self.duration = duration;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(max_guests) = patch.max_guests {
            self.max_guests = max_guests;
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
        storage.experiences()
    }
}
