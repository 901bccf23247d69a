// src/db/mod.rs
// DOCUMENTATION: Storage interface shared by every backend
// PURPOSE: Abstract persistence from business logic

pub mod memory;
pub mod pg_catalog;
pub mod postgres;
pub mod seed;

pub use memory::MemStorage;
pub use postgres::PgStorage;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{
    Accommodation, Booking, BookingStatus, CatalogEntity, CatalogFilter, Experience, Favorite,
    ItemKind, NewBooking, NewFavorite, NewTestimonial, NewUser, Package, ProfileUpdate,
    Restaurant, Role, Testimonial, TestimonialQuery, User, VehicleRental,
};

/// CRUD over one catalog collection
#[async_trait]
pub trait CatalogStore<T: CatalogEntity>: Send + Sync {
    /// Returns the requested page and the total number of matches
    async fn list(&self, filter: &CatalogFilter) -> Result<(Vec<T>, i64), AppError>;
    async fn get(&self, id: i32) -> Result<T, AppError>;
    async fn create(&self, draft: T::Draft) -> Result<T, AppError>;
    async fn update(&self, id: i32, patch: T::Patch) -> Result<T, AppError>;
    async fn delete(&self, id: i32) -> Result<(), AppError>;
    async fn count(&self) -> Result<i64, AppError>;
    async fn count_featured(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: i32) -> Result<User, AppError>;
    /// Lookup by already-normalized (lower-case) email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;
    async fn update_profile(&self, id: i32, update: ProfileUpdate) -> Result<User, AppError>;
    async fn set_password_hash(&self, id: i32, password_hash: String) -> Result<(), AppError>;
    async fn set_role(&self, id: i32, role: Role) -> Result<User, AppError>;
    async fn list_users(&self) -> Result<Vec<User>, AppError>;
    async fn count_users(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait TestimonialStore: Send + Sync {
    /// Newest first
    async fn list_testimonials(&self, query: &TestimonialQuery)
        -> Result<Vec<Testimonial>, AppError>;
    async fn get_testimonial(&self, id: i32) -> Result<Testimonial, AppError>;
    async fn create_testimonial(&self, new: NewTestimonial) -> Result<Testimonial, AppError>;
    async fn set_testimonial_featured(&self, id: i32, featured: bool)
        -> Result<Testimonial, AppError>;
    async fn delete_testimonial(&self, id: i32) -> Result<(), AppError>;
    /// Null out references to a removed catalog item; returns rows touched
    async fn detach_testimonials(&self, kind: ItemKind, item_id: i32) -> Result<u64, AppError>;
    async fn count_testimonials(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Newest first; all bookings when user_id is None
    async fn list_bookings(&self, user_id: Option<i32>) -> Result<Vec<Booking>, AppError>;
    async fn get_booking(&self, id: i32) -> Result<Booking, AppError>;
    async fn create_booking(&self, new: NewBooking) -> Result<Booking, AppError>;
    async fn set_booking_status(&self, id: i32, status: BookingStatus)
        -> Result<Booking, AppError>;
    async fn count_bookings_by_status(&self) -> Result<Vec<(BookingStatus, i64)>, AppError>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    async fn list_favorites(
        &self,
        user_id: i32,
        kind: Option<ItemKind>,
    ) -> Result<Vec<Favorite>, AppError>;
    async fn get_favorite(&self, id: i32) -> Result<Favorite, AppError>;
    /// Fails with AlreadyExists on a duplicate (user, kind, item)
    async fn create_favorite(&self, new: NewFavorite) -> Result<Favorite, AppError>;
    async fn delete_favorite(&self, id: i32) -> Result<(), AppError>;
    async fn delete_favorites_for_item(&self, kind: ItemKind, item_id: i32)
        -> Result<u64, AppError>;
}

/// The full storage interface the API is written against
pub trait Storage: UserStore + TestimonialStore + BookingStore + FavoriteStore {
    /// Short backend name reported by /health
    fn backend_name(&self) -> &'static str;

    fn experiences(&self) -> &dyn CatalogStore<Experience>;
    fn accommodations(&self) -> &dyn CatalogStore<Accommodation>;
    fn packages(&self) -> &dyn CatalogStore<Package>;
    fn vehicles(&self) -> &dyn CatalogStore<VehicleRental>;
    fn restaurants(&self) -> &dyn CatalogStore<Restaurant>;
}
