// src/services/catalog_service.rs
// DOCUMENTATION: Business logic shared by the five catalog collections
// PURPOSE: Validation, listing, cascade cleanup and item lookups by kind

use validator::Validate;

use crate::db::{FavoriteStore, Storage, TestimonialStore};
use crate::errors::AppError;
use crate::models::{
    Accommodation, CatalogEntity, CatalogFilter, CatalogPatch, CatalogQuery, Experience,
    ItemKind, ListResponse, Package, PricingUnit, Restaurant, VehicleRental,
};

/// Paginated, filtered listing
pub async fn list<T: CatalogEntity>(
    storage: &dyn Storage,
    query: CatalogQuery,
) -> Result<ListResponse<T>, AppError> {
    let filter = CatalogFilter::from_query(query)?;
    let (items, total) = T::store(storage).list(&filter).await?;
    log::debug!("Listed {} of {} {} items", items.len(), total, T::KIND);
    Ok(ListResponse::new(items, total, &filter))
}

/// Featured items, best rated first
pub async fn featured<T: CatalogEntity>(storage: &dyn Storage) -> Result<Vec<T>, AppError> {
    let (items, _) = T::store(storage)
        .list(&CatalogFilter::featured_only())
        .await?;
    Ok(items)
}

pub async fn get<T: CatalogEntity>(storage: &dyn Storage, id: i32) -> Result<T, AppError> {
    T::store(storage).get(id).await
}

pub async fn create<T: CatalogEntity>(
    storage: &dyn Storage,
    draft: T::Draft,
) -> Result<T, AppError> {
    draft.validate()?;
    T::store(storage).create(draft).await
}

/// Partial update; absent fields are left unchanged
pub async fn update<T: CatalogEntity>(
    storage: &dyn Storage,
    id: i32,
    patch: T::Patch,
) -> Result<T, AppError> {
    if patch.is_empty() {
        return Err(AppError::InvalidInput(
            "update body must contain at least one field".to_string(),
        ));
    }
    patch.validate()?;
    T::store(storage).update(id, patch).await
}

/// Delete an item, then drop favorites pointing at it and detach its testimonials
/// Bookings keep their item id and title
pub async fn delete<T: CatalogEntity>(storage: &dyn Storage, id: i32) -> Result<(), AppError> {
    T::store(storage).delete(id).await?;

    let favorites = storage.delete_favorites_for_item(T::KIND, id).await?;
    let testimonials = storage.detach_testimonials(T::KIND, id).await?;
    if favorites > 0 || testimonials > 0 {
        log::info!(
            "Removed {} favorite(s) and detached {} testimonial(s) of {} {}",
            favorites,
            testimonials,
            T::KIND,
            id
        );
    }
    Ok(())
}

/// What bookings need to know about an item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuote {
    pub kind: ItemKind,
    pub id: i32,
    pub title: String,
    pub unit_price: f64,
    pub pricing: PricingUnit,
    pub capacity: Option<i32>,
    pub bookable: bool,
}

impl ItemQuote {
    fn of<T: CatalogEntity>(item: &T) -> Self {
        ItemQuote {
            kind: T::KIND,
            id: item.id(),
            title: item.title().to_string(),
            unit_price: item.unit_price(),
            pricing: T::KIND.pricing_unit(),
            capacity: item.capacity(),
            bookable: item.bookable(),
        }
    }
}

async fn quote_of<T: CatalogEntity>(storage: &dyn Storage, id: i32) -> Result<ItemQuote, AppError> {
    let item = T::store(storage).get(id).await?;
    Ok(ItemQuote::of(&item))
}

/// Look an item up by kind; NotFound when it does not exist
pub async fn quote_item(
    storage: &dyn Storage,
    kind: ItemKind,
    id: i32,
) -> Result<ItemQuote, AppError> {
    match kind {
        ItemKind::Experience => quote_of::<Experience>(storage, id).await,
        ItemKind::Accommodation => quote_of::<Accommodation>(storage, id).await,
        ItemKind::Package => quote_of::<Package>(storage, id).await,
        ItemKind::Vehicle => quote_of::<VehicleRental>(storage, id).await,
        ItemKind::Restaurant => quote_of::<Restaurant>(storage, id).await,
    }
}

pub async fn ensure_item_exists(
    storage: &dyn Storage,
    kind: ItemKind,
    id: i32,
) -> Result<(), AppError> {
    quote_item(storage, kind, id).await.map(|_| ())
}
