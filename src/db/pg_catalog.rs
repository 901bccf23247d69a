// src/db/pg_catalog.rs
// DOCUMENTATION: Postgres access for the five catalog tables
// PURPOSE: One generic CatalogStore implementation driven by per-table column maps

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::marker::PhantomData;

use super::CatalogStore;
use crate::errors::AppError;
use crate::models::{
    Accommodation, AccommodationPatch, CatalogEntity, CatalogFilter, Experience,
    ExperiencePatch, NewAccommodation, NewExperience, NewPackage, NewRestaurant,
    NewVehicleRental, Package, PackagePatch, Restaurant, RestaurantPatch, SortOrder,
    VehicleRental, VehicleRentalPatch,
};

/// A bindable column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(String),
    OptText(Option<String>),
    Int(i32),
    Float(f64),
    Bool(bool),
    TextList(Vec<String>),
}

fn push_value(qb: &mut QueryBuilder<'_, Postgres>, value: SqlValue) {
    match value {
        SqlValue::Text(v) => qb.push_bind(v),
        SqlValue::OptText(v) => qb.push_bind(v),
        SqlValue::Int(v) => qb.push_bind(v),
        SqlValue::Float(v) => qb.push_bind(v),
        SqlValue::Bool(v) => qb.push_bind(v),
        SqlValue::TextList(v) => qb.push_bind(v),
    };
}

/// Table layout of a catalog entity
pub trait PgCatalogRow: CatalogEntity + for<'r> FromRow<'r, PgRow> {
    const TABLE: &'static str;
    const TITLE_COLUMN: &'static str;
    const PRICE_COLUMN: &'static str;
    const CATEGORY_COLUMN: &'static str;
    /// None for tables without a location
    const LOCATION_COLUMN: Option<&'static str>;

    /// Every insertable column with its value
    fn draft_columns(draft: Self::Draft) -> Vec<(&'static str, SqlValue)>;

    /// Only the columns present in the patch
    fn patch_columns(patch: Self::Patch) -> Vec<(&'static str, SqlValue)>;
}

/// Push a patch field when present
macro_rules! patch_field {
    ($cols:ident, $value:expr, $name:literal, $variant:ident) => {
        if let Some(v) = $value {
            $cols.push(($name, SqlValue::$variant(v)));
        }
    };
}

fn ilike_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Append the WHERE clause shared by list and count
fn push_filters<T: PgCatalogRow>(qb: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    qb.push(" WHERE TRUE");

    if let Some(search) = &filter.search {
        let pattern = ilike_pattern(search);
        qb.push(format!(" AND ({} ILIKE ", T::TITLE_COLUMN))
            .push_bind(pattern.clone())
            .push(" OR description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(category) = &filter.category {
        qb.push(format!(" AND LOWER({}) = LOWER(", T::CATEGORY_COLUMN))
            .push_bind(category.clone())
            .push(")");
    }

    if let Some(location) = &filter.location {
        match T::LOCATION_COLUMN {
            Some(column) => {
                qb.push(format!(" AND {} ILIKE ", column))
                    .push_bind(ilike_pattern(location));
            }
            None => {
                qb.push(" AND FALSE");
            }
        }
    }

    if let Some(featured) = filter.featured {
        qb.push(" AND featured = ").push_bind(featured);
    }
    if let Some(min) = filter.min_price {
        qb.push(format!(" AND {} >= ", T::PRICE_COLUMN)).push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(format!(" AND {} <= ", T::PRICE_COLUMN)).push_bind(max);
    }
    if let Some(min) = filter.min_rating {
        qb.push(" AND rating >= ").push_bind(min);
    }
}

/// ORDER BY clause matching CatalogFilter::compare
fn order_clause<T: PgCatalogRow>(sort: SortOrder) -> String {
    let primary = match sort {
        SortOrder::Featured => "featured DESC, rating DESC".to_string(),
        SortOrder::PriceAsc => format!("{} ASC", T::PRICE_COLUMN),
        SortOrder::PriceDesc => format!("{} DESC", T::PRICE_COLUMN),
        SortOrder::Rating => "rating DESC".to_string(),
        SortOrder::Newest => "created_at DESC".to_string(),
        SortOrder::Title => format!("LOWER({}) ASC", T::TITLE_COLUMN),
    };
    format!(" ORDER BY {}, id ASC", primary)
}

fn db_error(context: &str, e: sqlx::Error) -> AppError {
    log::error!("{}: {}", context, e);
    AppError::DatabaseError(e.to_string())
}

fn not_found<T: PgCatalogRow>(id: i32) -> AppError {
    log::warn!("{} not found: {}", T::KIND, id);
    AppError::NotFound(format!("{} {}", T::KIND, id))
}

/// CatalogStore over one table
pub struct PgCatalog<T> {
    pool: PgPool,
    _row: PhantomData<fn() -> T>,
}

impl<T> PgCatalog<T> {
    pub fn new(pool: PgPool) -> Self {
        PgCatalog {
            pool,
            _row: PhantomData,
        }
    }
}

#[async_trait]
impl<T: PgCatalogRow> CatalogStore<T> for PgCatalog<T> {
    async fn list(&self, filter: &CatalogFilter) -> Result<(Vec<T>, i64), AppError> {
        let mut count_qb = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", T::TABLE));
        push_filters::<T>(&mut count_qb, filter);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(&format!("Failed to count {} rows", T::KIND), e))?;

        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {}", T::TABLE));
        push_filters::<T>(&mut qb, filter);
        qb.push(order_clause::<T>(filter.sort));
        qb.push(" LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let items = qb
            .build_query_as::<T>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error(&format!("Failed to list {} rows", T::KIND), e))?;

        Ok((items, total))
    }

    async fn get(&self, id: i32) -> Result<T, AppError> {
        sqlx::query_as::<_, T>(&format!("SELECT * FROM {} WHERE id = $1", T::TABLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(&format!("Database error fetching {}", T::KIND), e))?
            .ok_or_else(|| not_found::<T>(id))
    }

    async fn create(&self, draft: T::Draft) -> Result<T, AppError> {
        let columns = T::draft_columns(draft);

        let mut qb = QueryBuilder::<Postgres>::new(format!("INSERT INTO {} (", T::TABLE));
        let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        qb.push(names.join(", "));
        qb.push(") VALUES (");
        for (i, (_, value)) in columns.into_iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            push_value(&mut qb, value);
        }
        qb.push(") RETURNING *");

        let item = qb
            .build_query_as::<T>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(&format!("Failed to insert {}", T::KIND), e))?;

        log::info!("Created {} with id: {}", T::KIND, item.id());
        Ok(item)
    }

    async fn update(&self, id: i32, patch: T::Patch) -> Result<T, AppError> {
        let columns = T::patch_columns(patch);
        if columns.is_empty() {
            return self.get(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET ", T::TABLE));
        for (i, (name, value)) in columns.into_iter().enumerate() {
            if i > 0 {
                qb.push(", ");
            }
            qb.push(format!("{} = ", name));
            push_value(&mut qb, value);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let item = qb
            .build_query_as::<T>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error(&format!("Failed to update {} {}", T::KIND, id), e))?
            .ok_or_else(|| not_found::<T>(id))?;

        log::info!("Updated {}: {}", T::KIND, id);
        Ok(item)
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::TABLE))
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error(&format!("Failed to delete {} {}", T::KIND, id), e))?;

        if result.rows_affected() == 0 {
            return Err(not_found::<T>(id));
        }
        log::info!("Deleted {}: {}", T::KIND, id);
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", T::TABLE))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error(&format!("Failed to count {} rows", T::KIND), e))
    }

    async fn count_featured(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE featured = true",
            T::TABLE
        ))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error(&format!("Failed to count featured {} rows", T::KIND), e))
    }
}

impl PgCatalogRow for Experience {
    const TABLE: &'static str = "experiences";
    const TITLE_COLUMN: &'static str = "title";
    const PRICE_COLUMN: &'static str = "price";
    const CATEGORY_COLUMN: &'static str = "category";
    const LOCATION_COLUMN: Option<&'static str> = Some("location");

    fn draft_columns(d: NewExperience) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("title", SqlValue::Text(d.title)),
            ("description", SqlValue::Text(d.description)),
            ("category", SqlValue::Text(d.category)),
            ("location", SqlValue::Text(d.location)),
            ("duration", SqlValue::Text(d.duration)),
            ("price", SqlValue::Float(d.price)),
            ("max_guests", SqlValue::Int(d.max_guests)),
            ("image_url", SqlValue::Text(d.image_url)),
            ("rating", SqlValue::Float(d.rating.unwrap_or(0.0))),
            ("featured", SqlValue::Bool(d.featured)),
        ]
    }

    fn patch_columns(p: ExperiencePatch) -> Vec<(&'static str, SqlValue)> {
        let mut cols = Vec::new();
        patch_field!(cols, p.title, "title", Text);
        patch_field!(cols, p.description, "description", Text);
        patch_field!(cols, p.category, "category", Text);
        patch_field!(cols, p.location, "location", Text);
        patch_field!(cols, p.duration, "duration", Text);
        patch_field!(cols, p.price, "price", Float);
        patch_field!(cols, p.max_guests, "max_guests", Int);
        patch_field!(cols, p.image_url, "image_url", Text);
        patch_field!(cols, p.rating, "rating", Float);
        patch_field!(cols, p.featured, "featured", Bool);
        cols
    }
}

impl PgCatalogRow for Accommodation {
    const TABLE: &'static str = "accommodations";
    const TITLE_COLUMN: &'static str = "name";
    const PRICE_COLUMN: &'static str = "price_per_night";
    const CATEGORY_COLUMN: &'static str = "accommodation_type";
    const LOCATION_COLUMN: Option<&'static str> = Some("location");

    fn draft_columns(d: NewAccommodation) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", SqlValue::Text(d.name)),
            ("description", SqlValue::Text(d.description)),
            ("accommodation_type", SqlValue::Text(d.accommodation_type)),
            ("location", SqlValue::Text(d.location)),
            ("price_per_night", SqlValue::Float(d.price_per_night)),
            ("bedrooms", SqlValue::Int(d.bedrooms)),
            ("bathrooms", SqlValue::Int(d.bathrooms)),
            ("max_guests", SqlValue::Int(d.max_guests)),
            ("amenities", SqlValue::TextList(d.amenities)),
            ("image_url", SqlValue::Text(d.image_url)),
            ("rating", SqlValue::Float(d.rating.unwrap_or(0.0))),
            ("featured", SqlValue::Bool(d.featured)),
        ]
    }

    fn patch_columns(p: AccommodationPatch) -> Vec<(&'static str, SqlValue)> {
        let mut cols = Vec::new();
        patch_field!(cols, p.name, "name", Text);
        patch_field!(cols, p.description, "description", Text);
        patch_field!(cols, p.accommodation_type, "accommodation_type", Text);
        patch_field!(cols, p.location, "location", Text);
        patch_field!(cols, p.price_per_night, "price_per_night", Float);
        patch_field!(cols, p.bedrooms, "bedrooms", Int);
        patch_field!(cols, p.bathrooms, "bathrooms", Int);
        patch_field!(cols, p.max_guests, "max_guests", Int);
        patch_field!(cols, p.amenities, "amenities", TextList);
        patch_field!(cols, p.image_url, "image_url", Text);
        patch_field!(cols, p.rating, "rating", Float);
        patch_field!(cols, p.featured, "featured", Bool);
        cols
    }
}

impl PgCatalogRow for Package {
    const TABLE: &'static str = "packages";
    const TITLE_COLUMN: &'static str = "title";
    const PRICE_COLUMN: &'static str = "price";
    const CATEGORY_COLUMN: &'static str = "category";
    const LOCATION_COLUMN: Option<&'static str> = None;

    fn draft_columns(d: NewPackage) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("title", SqlValue::Text(d.title)),
            ("description", SqlValue::Text(d.description)),
            ("category", SqlValue::Text(d.category)),
            ("duration_days", SqlValue::Int(d.duration_days)),
            ("price", SqlValue::Float(d.price)),
            ("max_travelers", SqlValue::Int(d.max_travelers)),
            ("includes", SqlValue::TextList(d.includes)),
            ("image_url", SqlValue::Text(d.image_url)),
            ("rating", SqlValue::Float(d.rating.unwrap_or(0.0))),
            ("featured", SqlValue::Bool(d.featured)),
        ]
    }

    fn patch_columns(p: PackagePatch) -> Vec<(&'static str, SqlValue)> {
        let mut cols = Vec::new();
        patch_field!(cols, p.title, "title", Text);
        patch_field!(cols, p.description, "description", Text);
        patch_field!(cols, p.category, "category", Text);
        patch_field!(cols, p.duration_days, "duration_days", Int);
        patch_field!(cols, p.price, "price", Float);
        patch_field!(cols, p.max_travelers, "max_travelers", Int);
        patch_field!(cols, p.includes, "includes", TextList);
        patch_field!(cols, p.image_url, "image_url", Text);
        patch_field!(cols, p.rating, "rating", Float);
        patch_field!(cols, p.featured, "featured", Bool);
        cols
    }
}

impl PgCatalogRow for VehicleRental {
    const TABLE: &'static str = "vehicle_rentals";
    const TITLE_COLUMN: &'static str = "name";
    const PRICE_COLUMN: &'static str = "price_per_day";
    const CATEGORY_COLUMN: &'static str = "vehicle_type";
    const LOCATION_COLUMN: Option<&'static str> = Some("location");

    fn draft_columns(d: NewVehicleRental) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", SqlValue::Text(d.name)),
            ("description", SqlValue::Text(d.description)),
            ("vehicle_type", SqlValue::Text(d.vehicle_type)),
            ("location", SqlValue::Text(d.location)),
            ("price_per_day", SqlValue::Float(d.price_per_day)),
            ("seats", SqlValue::Int(d.seats)),
            ("available", SqlValue::Bool(d.available)),
            ("image_url", SqlValue::Text(d.image_url)),
            ("rating", SqlValue::Float(d.rating.unwrap_or(0.0))),
            ("featured", SqlValue::Bool(d.featured)),
        ]
    }

    fn patch_columns(p: VehicleRentalPatch) -> Vec<(&'static str, SqlValue)> {
        let mut cols = Vec::new();
        patch_field!(cols, p.name, "name", Text);
        patch_field!(cols, p.description, "description", Text);
        patch_field!(cols, p.vehicle_type, "vehicle_type", Text);
        patch_field!(cols, p.location, "location", Text);
        patch_field!(cols, p.price_per_day, "price_per_day", Float);
        patch_field!(cols, p.seats, "seats", Int);
        patch_field!(cols, p.available, "available", Bool);
        patch_field!(cols, p.image_url, "image_url", Text);
        patch_field!(cols, p.rating, "rating", Float);
        patch_field!(cols, p.featured, "featured", Bool);
        cols
    }
}

impl PgCatalogRow for Restaurant {
    const TABLE: &'static str = "restaurants";
    const TITLE_COLUMN: &'static str = "name";
    const PRICE_COLUMN: &'static str = "average_price";
    const CATEGORY_COLUMN: &'static str = "cuisine";
    const LOCATION_COLUMN: Option<&'static str> = Some("location");

    fn draft_columns(d: NewRestaurant) -> Vec<(&'static str, SqlValue)> {
        vec![
            ("name", SqlValue::Text(d.name)),
            ("description", SqlValue::Text(d.description)),
            ("cuisine", SqlValue::Text(d.cuisine)),
            ("price_range", SqlValue::Text(d.price_range)),
            ("average_price", SqlValue::Float(d.average_price)),
            ("location", SqlValue::Text(d.location)),
            ("opening_hours", SqlValue::Text(d.opening_hours)),
            ("phone", SqlValue::OptText(d.phone)),
            ("image_url", SqlValue::Text(d.image_url)),
            ("rating", SqlValue::Float(d.rating.unwrap_or(0.0))),
            ("featured", SqlValue::Bool(d.featured)),
        ]
    }

    fn patch_columns(p: RestaurantPatch) -> Vec<(&'static str, SqlValue)> {
        let mut cols = Vec::new();
        patch_field!(cols, p.name, "name", Text);
        patch_field!(cols, p.description, "description", Text);
        patch_field!(cols, p.cuisine, "cuisine", Text);
        patch_field!(cols, p.price_range, "price_range", Text);
        patch_field!(cols, p.average_price, "average_price", Float);
        patch_field!(cols, p.location, "location", Text);
        patch_field!(cols, p.opening_hours, "opening_hours", Text);
        if let Some(phone) = p.phone {
            cols.push(("phone", SqlValue::OptText(Some(phone))));
        }
        patch_field!(cols, p.image_url, "image_url", Text);
        patch_field!(cols, p.rating, "rating", Float);
        patch_field!(cols, p.featured, "featured", Bool);
        cols
    }
}
