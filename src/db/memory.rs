// src/db/memory.rs
// DOCUMENTATION: In-memory storage backend
// PURPOSE: One ordered map per entity with auto-incrementing integer ids

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{BookingStore, CatalogStore, FavoriteStore, Storage, TestimonialStore, UserStore};
use crate::errors::AppError;
use crate::models::{
    filter_and_sort, Accommodation, Booking, BookingStatus, CatalogEntity, CatalogFilter,
    Experience, Favorite, ItemKind, NewBooking, NewFavorite, NewTestimonial, NewUser, Package,
    ProfileUpdate, Restaurant, Role, Testimonial, TestimonialQuery, User, VehicleRental,
};

/// Rows keyed by id plus the next id to hand out
struct Table<T> {
    rows: BTreeMap<i32, T>,
    next_id: i32,
}

impl<T> Table<T> {
    fn new() -> Self {
        Table {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> &T {
        let id = self.next_id;
        self.next_id += 1;
        self.rows.entry(id).or_insert(build(id))
    }
}

fn not_found(what: &str, id: i32) -> AppError {
    log::warn!("{} not found: {}", what, id);
    AppError::NotFound(format!("{} {}", what, id))
}

/// One catalog collection behind its own lock
pub struct MemCatalog<T> {
    table: RwLock<Table<T>>,
}

impl<T> MemCatalog<T> {
    fn new() -> Self {
        MemCatalog {
            table: RwLock::new(Table::new()),
        }
    }
}

#[async_trait]
impl<T: CatalogEntity> CatalogStore<T> for MemCatalog<T> {
    async fn list(&self, filter: &CatalogFilter) -> Result<(Vec<T>, i64), AppError> {
        let table = self.table.read().await;
        let items = table.rows.values().cloned().collect();
        Ok(filter_and_sort(items, filter))
    }

    async fn get(&self, id: i32) -> Result<T, AppError> {
        let table = self.table.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(T::KIND.as_str(), id))
    }

    async fn create(&self, draft: T::Draft) -> Result<T, AppError> {
        let mut table = self.table.write().await;
        let now = Utc::now();
        let item = table.insert_with(|id| T::from_draft(id, draft, now)).clone();
        log::info!("Created {} with id: {}", T::KIND, item.id());
        Ok(item)
    }

    async fn update(&self, id: i32, patch: T::Patch) -> Result<T, AppError> {
        let mut table = self.table.write().await;
        let item = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| not_found(T::KIND.as_str(), id))?;
        item.apply_patch(patch);
        log::info!("Updated {}: {}", T::KIND, id);
        Ok(item.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), AppError> {
        let mut table = self.table.write().await;
        table
            .rows
            .remove(&id)
            .ok_or_else(|| not_found(T::KIND.as_str(), id))?;
        log::info!("Deleted {}: {}", T::KIND, id);
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.table.read().await.rows.len() as i64)
    }

    async fn count_featured(&self) -> Result<i64, AppError> {
        let table = self.table.read().await;
        Ok(table.rows.values().filter(|i| i.featured()).count() as i64)
    }
}

/// Map-backed implementation of the storage interface
/// DOCUMENTATION: Default backend; contents are lost on restart
pub struct MemStorage {
    users: RwLock<Table<User>>,
    experiences: MemCatalog<Experience>,
    accommodations: MemCatalog<Accommodation>,
    packages: MemCatalog<Package>,
    vehicles: MemCatalog<VehicleRental>,
    restaurants: MemCatalog<Restaurant>,
    testimonials: RwLock<Table<Testimonial>>,
    bookings: RwLock<Table<Booking>>,
    favorites: RwLock<Table<Favorite>>,
}

impl MemStorage {
    pub fn new() -> Self {
        MemStorage {
            users: RwLock::new(Table::new()),
            experiences: MemCatalog::new(),
            accommodations: MemCatalog::new(),
            packages: MemCatalog::new(),
            vehicles: MemCatalog::new(),
            restaurants: MemCatalog::new(),
            testimonials: RwLock::new(Table::new()),
            bookings: RwLock::new(Table::new()),
            favorites: RwLock::new(Table::new()),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemStorage {
    async fn get_user(&self, id: i32) -> Result<User, AppError> {
        let users = self.users.read().await;
        users
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("user", id))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.rows.values().find(|u| u.email == email).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.rows.values().any(|u| u.email == new_user.email) {
            return Err(AppError::AlreadyExists(format!(
                "email {} is already registered",
                new_user.email
            )));
        }

        let now = Utc::now();
        let user = users
            .insert_with(|id| User {
                id,
                email: new_user.email,
                password_hash: new_user.password_hash,
                full_name: new_user.full_name,
                phone: new_user.phone,
                avatar_url: None,
                role: new_user.role,
                preferences: new_user.preferences,
                created_at: now,
            })
            .clone();
        log::info!("Created user with id: {}", user.id);
        Ok(user)
    }

    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let user = users.rows.get_mut(&id).ok_or_else(|| not_found("user", id))?;
        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        if let Some(phone) = update.phone {
            user.phone = Some(phone);
        }
        if let Some(avatar_url) = update.avatar_url {
            user.avatar_url = Some(avatar_url);
        }
        if let Some(preferences) = update.preferences {
            user.preferences = preferences;
        }
        Ok(user.clone())
    }

    async fn set_password_hash(&self, id: i32, password_hash: String) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users.rows.get_mut(&id).ok_or_else(|| not_found("user", id))?;
        user.password_hash = password_hash;
        Ok(())
    }

    async fn set_role(&self, id: i32, role: Role) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        let user = users.rows.get_mut(&id).ok_or_else(|| not_found("user", id))?;
        user.role = role;
        Ok(user.clone())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.read().await.rows.values().cloned().collect())
    }

    async fn count_users(&self) -> Result<i64, AppError> {
        Ok(self.users.read().await.rows.len() as i64)
    }
}

#[async_trait]
impl TestimonialStore for MemStorage {
    async fn list_testimonials(
        &self,
        query: &TestimonialQuery,
    ) -> Result<Vec<Testimonial>, AppError> {
        let table = self.testimonials.read().await;
        // Ids grow with insertion, so reverse id order is newest first
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|t| query.matches(t))
            .cloned()
            .collect())
    }

    async fn get_testimonial(&self, id: i32) -> Result<Testimonial, AppError> {
        let table = self.testimonials.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("testimonial", id))
    }

    async fn create_testimonial(&self, new: NewTestimonial) -> Result<Testimonial, AppError> {
        let mut table = self.testimonials.write().await;
        let now = Utc::now();
        let testimonial = table
            .insert_with(|id| Testimonial {
                id,
                user_id: new.user_id,
                experience_id: new.experience_id,
                accommodation_id: new.accommodation_id,
                package_id: new.package_id,
                author_name: new.author_name,
                content: new.content,
                rating: new.rating,
                featured: false,
                created_at: now,
            })
            .clone();
        Ok(testimonial)
    }

    async fn set_testimonial_featured(
        &self,
        id: i32,
        featured: bool,
    ) -> Result<Testimonial, AppError> {
        let mut table = self.testimonials.write().await;
        let testimonial = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| not_found("testimonial", id))?;
        testimonial.featured = featured;
        Ok(testimonial.clone())
    }

    async fn delete_testimonial(&self, id: i32) -> Result<(), AppError> {
        let mut table = self.testimonials.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("testimonial", id))
    }

    async fn detach_testimonials(&self, kind: ItemKind, item_id: i32) -> Result<u64, AppError> {
        let mut table = self.testimonials.write().await;
        let detached = table
            .rows
            .values_mut()
            .filter_map(|t| t.detach(kind, item_id).then_some(()))
            .count();
        Ok(detached as u64)
    }

    async fn count_testimonials(&self) -> Result<i64, AppError> {
        Ok(self.testimonials.read().await.rows.len() as i64)
    }
}

#[async_trait]
impl BookingStore for MemStorage {
    async fn list_bookings(&self, user_id: Option<i32>) -> Result<Vec<Booking>, AppError> {
        let table = self.bookings.read().await;
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|b| user_id.map_or(true, |uid| b.user_id == uid))
            .cloned()
            .collect())
    }

    async fn get_booking(&self, id: i32) -> Result<Booking, AppError> {
        let table = self.bookings.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("booking", id))
    }

    async fn create_booking(&self, new: NewBooking) -> Result<Booking, AppError> {
        let mut table = self.bookings.write().await;
        let now = Utc::now();
        let booking = table
            .insert_with(|id| Booking {
                id,
                user_id: new.user_id,
                item_kind: new.item_kind,
                item_id: new.item_id,
                item_title: new.item_title,
                start_date: new.start_date,
                end_date: new.end_date,
                guests: new.guests,
                total_price: new.total_price,
                status: BookingStatus::Pending,
                notes: new.notes,
                created_at: now,
            })
            .clone();
        log::info!("Created booking with id: {}", booking.id);
        Ok(booking)
    }

    async fn set_booking_status(
        &self,
        id: i32,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let mut table = self.bookings.write().await;
        let booking = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| not_found("booking", id))?;
        booking.status = status;
        Ok(booking.clone())
    }

    async fn count_bookings_by_status(&self) -> Result<Vec<(BookingStatus, i64)>, AppError> {
        let table = self.bookings.read().await;
        Ok(BookingStatus::ALL
            .into_iter()
            .map(|status| {
                let count = table.rows.values().filter(|b| b.status == status).count();
                (status, count as i64)
            })
            .collect())
    }
}

#[async_trait]
impl FavoriteStore for MemStorage {
    async fn list_favorites(
        &self,
        user_id: i32,
        kind: Option<ItemKind>,
    ) -> Result<Vec<Favorite>, AppError> {
        let table = self.favorites.read().await;
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|f| f.user_id == user_id && kind.map_or(true, |k| f.item_kind == k))
            .cloned()
            .collect())
    }

    async fn get_favorite(&self, id: i32) -> Result<Favorite, AppError> {
        let table = self.favorites.read().await;
        table
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("favorite", id))
    }

    async fn create_favorite(&self, new: NewFavorite) -> Result<Favorite, AppError> {
        let mut table = self.favorites.write().await;
        let duplicate = table.rows.values().any(|f| {
            f.user_id == new.user_id && f.item_kind == new.item_kind && f.item_id == new.item_id
        });
        if duplicate {
            return Err(AppError::AlreadyExists(format!(
                "{} {} is already a favorite",
                new.item_kind, new.item_id
            )));
        }

        let now = Utc::now();
        let favorite = table
            .insert_with(|id| Favorite {
                id,
                user_id: new.user_id,
                item_kind: new.item_kind,
                item_id: new.item_id,
                created_at: now,
            })
            .clone();
        Ok(favorite)
    }

    async fn delete_favorite(&self, id: i32) -> Result<(), AppError> {
        let mut table = self.favorites.write().await;
        table
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("favorite", id))
    }

    async fn delete_favorites_for_item(
        &self,
        kind: ItemKind,
        item_id: i32,
    ) -> Result<u64, AppError> {
        let mut table = self.favorites.write().await;
        let before = table.rows.len();
        table
            .rows
            .retain(|_, f| !(f.item_kind == kind && f.item_id == item_id));
        Ok((before - table.rows.len()) as u64)
    }
}

impl Storage for MemStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
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
