// src/services/favorite_service.rs

use crate::db::{FavoriteStore, Storage};
use crate::errors::AppError;
use crate::models::{Favorite, FavoriteRequest, ItemKind, NewFavorite, User};
use crate::services::catalog_service;

pub async fn list(
    storage: &dyn Storage,
    user: &User,
    kind: Option<ItemKind>,
) -> Result<Vec<Favorite>, AppError> {
    storage.list_favorites(user.id, kind).await
}

/// Save an existing catalog item; saving it twice is a conflict
pub async fn add(
    storage: &dyn Storage,
    user: &User,
    req: FavoriteRequest,
) -> Result<Favorite, AppError> {
    catalog_service::ensure_item_exists(storage, req.item_kind, req.item_id).await?;

    let favorite = storage
        .create_favorite(NewFavorite {
            user_id: user.id,
            item_kind: req.item_kind,
            item_id: req.item_id,
        })
        .await?;
    log::info!(
        "User {} saved {} {} as favorite",
        user.id,
        req.item_kind,
        req.item_id
    );
    Ok(favorite)
}

/// Only the owner may remove a favorite
pub async fn remove(storage: &dyn Storage, user: &User, id: i32) -> Result<(), AppError> {
    let favorite = storage.get_favorite(id).await?;
    if favorite.user_id != user.id {
        log::warn!("User {} tried to remove favorite {}", user.id, id);
        return Err(AppError::Forbidden);
    }
    storage.delete_favorite(id).await
}
