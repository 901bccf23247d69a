// src/db/postgres.rs
// DOCUMENTATION: Postgres storage backend - all non-catalog SQL queries
// PURPOSE: Users, testimonials, bookings and favorites over a PgPool

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use super::pg_catalog::PgCatalog;
use super::{BookingStore, CatalogStore, FavoriteStore, Storage, TestimonialStore, UserStore};
use crate::errors::AppError;
use crate::models::*;

/// Postgres error code for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

fn db_error(context: &str, e: sqlx::Error) -> AppError {
    log::error!("{}: {}", context, e);
    AppError::DatabaseError(e.to_string())
}

/// Like db_error, but a unique violation becomes AlreadyExists(duplicate)
fn insert_error(context: &str, duplicate: String, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some(UNIQUE_VIOLATION) {
            log::warn!("{}: {}", context, duplicate);
            return AppError::AlreadyExists(duplicate);
        }
    }
    db_error(context, e)
}

fn not_found(what: &str, id: i32) -> AppError {
    log::warn!("{} not found: {}", what, id);
    AppError::NotFound(format!("{} {}", what, id))
}

/// Internal struct for mapping users rows
/// DOCUMENTATION: role is TEXT and preferences JSONB
#[derive(Debug, FromRow)]
struct UserRow {
    id: i32,
    email: String,
    password_hash: String,
    full_name: String,
    phone: Option<String>,
    avatar_url: Option<String>,
    role: String,
    preferences: Json<TravelPreferences>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn to_user(self) -> Result<User, AppError> {
        Ok(User {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
            full_name: self.full_name,
            phone: self.phone,
            avatar_url: self.avatar_url,
            role: self.role.parse()?,
            preferences: self.preferences.0,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct BookingRow {
    id: i32,
    user_id: i32,
    item_kind: String,
    item_id: i32,
    item_title: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    guests: i32,
    total_price: f64,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    fn to_booking(self) -> Result<Booking, AppError> {
        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            item_kind: self.item_kind.parse()?,
            item_id: self.item_id,
            item_title: self.item_title,
            start_date: self.start_date,
            end_date: self.end_date,
            guests: self.guests,
            total_price: self.total_price,
            status: self.status.parse()?,
            notes: self.notes,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct FavoriteRow {
    id: i32,
    user_id: i32,
    item_kind: String,
    item_id: i32,
    created_at: DateTime<Utc>,
}

impl FavoriteRow {
    fn to_favorite(self) -> Result<Favorite, AppError> {
        Ok(Favorite {
            id: self.id,
            user_id: self.user_id,
            item_kind: self.item_kind.parse()?,
            item_id: self.item_id,
            created_at: self.created_at,
        })
    }
}

/// Testimonial foreign key column for a catalog kind
fn testimonial_column(kind: ItemKind) -> Option<&'static str> {
    match kind {
        ItemKind::Experience => Some("experience_id"),
        ItemKind::Accommodation => Some("accommodation_id"),
        ItemKind::Package => Some("package_id"),
        ItemKind::Vehicle | ItemKind::Restaurant => None,
    }
}

/// Postgres-backed implementation of the storage interface
pub struct PgStorage {
    pool: PgPool,
    experiences: PgCatalog<Experience>,
    accommodations: PgCatalog<Accommodation>,
    packages: PgCatalog<Package>,
    vehicles: PgCatalog<VehicleRental>,
    restaurants: PgCatalog<Restaurant>,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        PgStorage {
            experiences: PgCatalog::new(pool.clone()),
            accommodations: PgCatalog::new(pool.clone()),
            packages: PgCatalog::new(pool.clone()),
            vehicles: PgCatalog::new(pool.clone()),
            restaurants: PgCatalog::new(pool.clone()),
            pool,
        }
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, full_name, phone, avatar_url, role, preferences, created_at";

#[async_trait]
impl UserStore for PgStorage {
    async fn get_user(&self, id: i32) -> Result<User, AppError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Database error fetching user", e))?
            .ok_or_else(|| not_found("user", id))?
            .to_user()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Database error fetching user by email", e))?
        .map(UserRow::to_user)
        .transpose()
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, password_hash, full_name, phone, role, preferences)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.full_name)
        .bind(&new_user.phone)
        .bind(new_user.role.as_str())
        .bind(Json(&new_user.preferences))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            insert_error(
                "Failed to insert user",
                format!("email {} is already registered", new_user.email),
                e,
            )
        })?;

        log::info!("Created user with id: {}", row.id);
        row.to_user()
    }

    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> Result<User, AppError> {
        sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET full_name = COALESCE($2, full_name),
                phone = COALESCE($3, phone),
                avatar_url = COALESCE($4, avatar_url),
                preferences = COALESCE($5, preferences)
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&update.full_name)
        .bind(&update.phone)
        .bind(&update.avatar_url)
        .bind(update.preferences.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update profile", e))?
        .ok_or_else(|| not_found("user", id))?
        .to_user()
    }

    async fn set_password_hash(&self, id: i32, password_hash: String) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update password", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found("user", id));
        }
        Ok(())
    }

    async fn set_role(&self, id: i32, role: Role) -> Result<User, AppError> {
        sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE users SET role = $2 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update role", e))?
        .ok_or_else(|| not_found("user", id))?
        .to_user()
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        sqlx::query_as::<_, UserRow>(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list users", e))?
            .into_iter()
            .map(UserRow::to_user)
            .collect()
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count users", e))
    }
}

#[async_trait]
impl TestimonialStore for PgStorage {
    async fn list_testimonials(
        &self,
        query: &TestimonialQuery,
    ) -> Result<Vec<Testimonial>, AppError> {
        sqlx::query_as::<_, Testimonial>(
            r#"
            SELECT * FROM testimonials
            WHERE ($1::BOOLEAN IS NULL OR featured = $1)
              AND ($2::INT IS NULL OR experience_id = $2)
              AND ($3::INT IS NULL OR accommodation_id = $3)
              AND ($4::INT IS NULL OR package_id = $4)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(query.featured)
        .bind(query.experience_id)
        .bind(query.accommodation_id)
        .bind(query.package_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list testimonials", e))
    }

    async fn get_testimonial(&self, id: i32) -> Result<Testimonial, AppError> {
        sqlx::query_as::<_, Testimonial>("SELECT * FROM testimonials WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Database error fetching testimonial", e))?
            .ok_or_else(|| not_found("testimonial", id))
    }

    async fn create_testimonial(&self, new: NewTestimonial) -> Result<Testimonial, AppError> {
        sqlx::query_as::<_, Testimonial>(
            r#"
            INSERT INTO testimonials (
                user_id, experience_id, accommodation_id, package_id,
                author_name, content, rating
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(new.user_id)
        .bind(new.experience_id)
        .bind(new.accommodation_id)
        .bind(new.package_id)
        .bind(&new.author_name)
        .bind(&new.content)
        .bind(new.rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert testimonial", e))
    }

    async fn set_testimonial_featured(
        &self,
        id: i32,
        featured: bool,
    ) -> Result<Testimonial, AppError> {
        sqlx::query_as::<_, Testimonial>(
            "UPDATE testimonials SET featured = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(featured)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update testimonial", e))?
        .ok_or_else(|| not_found("testimonial", id))
    }

    async fn delete_testimonial(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM testimonials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete testimonial", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found("testimonial", id));
        }
        Ok(())
    }

    async fn detach_testimonials(&self, kind: ItemKind, item_id: i32) -> Result<u64, AppError> {
        let Some(column) = testimonial_column(kind) else {
            return Ok(0);
        };

        let result = sqlx::query(&format!(
            "UPDATE testimonials SET {0} = NULL WHERE {0} = $1",
            column
        ))
        .bind(item_id)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to detach testimonials", e))?;

        Ok(result.rows_affected())
    }

    async fn count_testimonials(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM testimonials")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count testimonials", e))
    }
}

#[async_trait]
impl BookingStore for PgStorage {
    async fn list_bookings(&self, user_id: Option<i32>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, BookingRow>(
            r#"
            SELECT * FROM bookings
            WHERE ($1::INT IS NULL OR user_id = $1)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list bookings", e))?
        .into_iter()
        .map(BookingRow::to_booking)
        .collect()
    }

    async fn get_booking(&self, id: i32) -> Result<Booking, AppError> {
        sqlx::query_as::<_, BookingRow>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Database error fetching booking", e))?
            .ok_or_else(|| not_found("booking", id))?
            .to_booking()
    }

    async fn create_booking(&self, new: NewBooking) -> Result<Booking, AppError> {
        let row = sqlx::query_as::<_, BookingRow>(
            r#"
            INSERT INTO bookings (
                user_id, item_kind, item_id, item_title,
                start_date, end_date, guests, total_price, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(new.user_id)
        .bind(new.item_kind.as_str())
        .bind(new.item_id)
        .bind(&new.item_title)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.guests)
        .bind(new.total_price)
        .bind(BookingStatus::Pending.as_str())
        .bind(&new.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("Failed to insert booking", e))?;

        log::info!("Created booking with id: {}", row.id);
        row.to_booking()
    }

    async fn set_booking_status(
        &self,
        id: i32,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        sqlx::query_as::<_, BookingRow>("UPDATE bookings SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to update booking status", e))?
            .ok_or_else(|| not_found("booking", id))?
            .to_booking()
    }

    async fn count_bookings_by_status(&self) -> Result<Vec<(BookingStatus, i64)>, AppError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM bookings GROUP BY status")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("Failed to count bookings", e))?;

        let mut counts: Vec<(BookingStatus, i64)> =
            BookingStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for (status, count) in rows {
            let status: BookingStatus = status.parse()?;
            if let Some(slot) = counts.iter_mut().find(|(s, _)| *s == status) {
                slot.1 = count;
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl FavoriteStore for PgStorage {
    async fn list_favorites(
        &self,
        user_id: i32,
        kind: Option<ItemKind>,
    ) -> Result<Vec<Favorite>, AppError> {
        sqlx::query_as::<_, FavoriteRow>(
            r#"
            SELECT * FROM favorites
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR item_kind = $2)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .bind(kind.map(|k| k.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list favorites", e))?
        .into_iter()
        .map(FavoriteRow::to_favorite)
        .collect()
    }

    async fn get_favorite(&self, id: i32) -> Result<Favorite, AppError> {
        sqlx::query_as::<_, FavoriteRow>("SELECT * FROM favorites WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Database error fetching favorite", e))?
            .ok_or_else(|| not_found("favorite", id))?
            .to_favorite()
    }

    async fn create_favorite(&self, new: NewFavorite) -> Result<Favorite, AppError> {
        sqlx::query_as::<_, FavoriteRow>(
            r#"
            INSERT INTO favorites (user_id, item_kind, item_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(new.user_id)
        .bind(new.item_kind.as_str())
        .bind(new.item_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            insert_error(
                "Failed to insert favorite",
                format!("{} {} is already a favorite", new.item_kind, new.item_id),
                e,
            )
        })?
        .to_favorite()
    }

    async fn delete_favorite(&self, id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete favorite", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found("favorite", id));
        }
        Ok(())
    }

    async fn delete_favorites_for_item(
        &self,
        kind: ItemKind,
        item_id: i32,
    ) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM favorites WHERE item_kind = $1 AND item_id = $2")
            .bind(kind.as_str())
            .bind(item_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete favorites", e))?;

        Ok(result.rows_affected())
    }
}

impl Storage for PgStorage {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    fn experiences(&self) -> &dyn CatalogStore<Experience> {
        &self.experiences
    }

    fn accommodations(&self) -> &dyn CatalogStore<Accommodation> {
        &self.accommodations
    }

    fn packages(&self) -> &dyn CatalogStore<Package> {
        &self.packages
    }

    fn vehicles(&self) -> &dyn CatalogStore<VehicleRental> {
        &self.vehicles
    }

    fn restaurants(&self) -> &dyn CatalogStore<Restaurant> {
        &self.restaurants
    }
}
