// src/models/package.rs
// DOCUMENTATION: Bundled vacation packages
// PURPOSE: Database model plus create/update DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::catalog::{CatalogEntity, CatalogPatch, ItemKind};
use crate::db::{CatalogStore, Storage};

/// A multi-day package, priced per traveller
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: i32,
    pub title: String,
    pub description: String,

    /// honeymoon, adventure, family, ...
    pub category: String,
    pub duration_days: i32,
    pub price: f64,
    pub max_travelers: i32,

    /// What the package covers (flights, transfers, tours)
    pub includes: Vec<String>,
    pub image_url: String,
    pub rating: f64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for POST /api/packages
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPackage {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(length(min = 1, max = 60))]
    pub category: String,

    #[validate(range(min = 1, max = 60))]
    pub duration_days: i32,

    #[validate(range(min = 0.0))]
    pub price: f64,

    #[validate(range(min = 1, max = 100))]
    pub max_travelers: i32,

    #[serde(default)]
    pub includes: Vec<String>,

    #[validate(length(min = 1))]
    pub image_url: String,

    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: Option<f64>,

    #[serde(default)]
    pub featured: bool,
}

/// Request DTO for PUT /api/packages/{id}
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PackagePatch {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 60))]
    pub category: Option<String>,
    #[validate(range(min = 1, max = 60))]
    pub duration_days: Option<i32>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 1, max = 100))]
    pub max_travelers: Option<i32>,
    pub includes: Option<Vec<String>>,
    #[validate(length(min = 1))]
    pub image_url: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    pub featured: Option<bool>,
}

impl CatalogPatch for PackagePatch {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.duration_days.is_none()
            && self.price.is_none()
            && self.max_travelers.is_none()
            && self.includes.is_none()
            && self.image_url.is_none()
            && self.rating.is_none()
            && self.featured.is_none()
    }
}

impl CatalogEntity for Package {
    type Draft = NewPackage;
    type Patch = PackagePatch;

    const KIND: ItemKind = ItemKind::Package;

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
        None
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
        Some(self.max_travelers)
    }

    fn from_draft(id: i32, draft: NewPackage, created_at: DateTime<Utc>) -> Self {
        Package {
            id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            duration_days: draft.duration_days,
            price: draft.price,
            max_travelers: draft.max_travelers,
            includes: draft.includes,
            image_url: draft.image_url,
            rating: draft.rating.unwrap_or(0.0),
            featured: draft.featured,
            created_at,
        }
    }

    fn apply_patch(&mut self, patch: PackagePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(duration_days) = patch.duration_days {
            self.duration_days = duration_days;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(max_travelers) = patch.max_travelers {
            self.max_travelers = max_travelers;
        }
        if let Some(includes) = patch.includes {
            self.includes = includes;
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
        storage.packages()
    }
}
