// src/models/testimonial.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::catalog::ItemKind;

/// Guest testimonial, optionally attached to an experience, stay or package
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: i32,
    pub user_id: i32,
    pub experience_id: Option<i32>,
    pub accommodation_id: Option<i32>,
    pub package_id: Option<i32>,
    pub author_name: String,
    pub content: String,
    pub rating: i32,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

impl Testimonial {
    /// Clear the reference to a deleted catalog item
    /// Returns true when something was detached
    pub fn detach(&mut self, kind: ItemKind, item_id: i32) -> bool {
        let slot = match kind {
            ItemKind::Experience => &mut self.experience_id,
            ItemKind::Accommodation => &mut self.accommodation_id,
            ItemKind::Package => &mut self.package_id,
            ItemKind::Vehicle | ItemKind::Restaurant => return false,
        };
        if *slot == Some(item_id) {
            *slot = None;
            true
        } else {
            false
        }
    }
}

/// Request DTO for POST /api/testimonials
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialRequest {
    #[validate(length(min = 10, max = 2000))]
    pub content: String,

    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[serde(default)]
    pub experience_id: Option<i32>,
    #[serde(default)]
    pub accommodation_id: Option<i32>,
    #[serde(default)]
    pub package_id: Option<i32>,
}

impl TestimonialRequest {
    /// Catalog rows this testimonial points at
    pub fn references(&self) -> Vec<(ItemKind, i32)> {
        [
            (ItemKind::Experience, self.experience_id),
            (ItemKind::Accommodation, self.accommodation_id),
            (ItemKind::Package, self.package_id),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, id)))
        .collect()
    }
}

/// Insert payload handed to storage
#[derive(Debug, Clone)]
pub struct NewTestimonial {
    pub user_id: i32,
    pub author_name: String,
    pub content: String,
    pub rating: i32,
    pub experience_id: Option<i32>,
    pub accommodation_id: Option<i32>,
    pub package_id: Option<i32>,
}

/// Query string for GET /api/testimonials
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialQuery {
    pub featured: Option<bool>,
    pub experience_id: Option<i32>,
    pub accommodation_id: Option<i32>,
    pub package_id: Option<i32>,
}

impl TestimonialQuery {
    pub fn matches(&self, t: &Testimonial) -> bool {
        self.featured.map_or(true, |f| t.featured == f)
            && self.experience_id.map_or(true, |id| t.experience_id == Some(id))
            && self.accommodation_id.map_or(true, |id| t.accommodation_id == Some(id))
            && self.package_id.map_or(true, |id| t.package_id == Some(id))
    }
}

/// Request DTO for PATCH /api/testimonials/{id}
#[derive(Debug, Deserialize)]
pub struct FeatureUpdate {
    pub featured: bool,
}
