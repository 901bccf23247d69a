// src/models/favorite.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::ItemKind;

/// A catalog item saved by a user; unique per (user, kind, item)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub item_kind: ItemKind,
    pub item_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for POST /api/favorites
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub item_kind: ItemKind,
    pub item_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub user_id: i32,
    pub item_kind: ItemKind,
    pub item_id: i32,
}

/// Query string for GET /api/favorites
#[derive(Debug, Default, Deserialize)]
pub struct FavoriteQuery {
    pub kind: Option<ItemKind>,
}
