// src/services/testimonial_service.rs

use validator::Validate;

use crate::db::{Storage, TestimonialStore};
use crate::errors::AppError;
use crate::models::{NewTestimonial, Testimonial, TestimonialQuery, TestimonialRequest, User};
use crate::services::catalog_service;

pub async fn list(
    storage: &dyn Storage,
    query: &TestimonialQuery,
) -> Result<Vec<Testimonial>, AppError> {
    storage.list_testimonials(query).await
}

/// Publish a testimonial signed with the author's name
/// Every referenced catalog item must exist
/// The length rule applies to the content once surrounding whitespace is trimmed
pub async fn create(
    storage: &dyn Storage,
    author: &User,
    mut req: TestimonialRequest,
) -> Result<Testimonial, AppError> {
    req.content = req.content.trim().to_string();
    req.validate()?;
    for (kind, id) in req.references() {
        catalog_service::ensure_item_exists(storage, kind, id).await?;
    }

    let testimonial = storage
        .create_testimonial(NewTestimonial {
            user_id: author.id,
            author_name: author.full_name.clone(),
            content: req.content,
            rating: req.rating,
            experience_id: req.experience_id,
            accommodation_id: req.accommodation_id,
            package_id: req.package_id,
        })
        .await?;

    log::info!("User {} posted testimonial {}", author.id, testimonial.id);
    Ok(testimonial)
}

pub async fn set_featured(
    storage: &dyn Storage,
    id: i32,
    featured: bool,
) -> Result<Testimonial, AppError> {
    let testimonial = storage.set_testimonial_featured(id, featured).await?;
    log::info!("Testimonial {} featured={}", id, featured);
    Ok(testimonial)
}

/// Authors may delete their own testimonials; admins may delete any
pub async fn delete(storage: &dyn Storage, user: &User, id: i32) -> Result<(), AppError> {
    let testimonial = storage.get_testimonial(id).await?;
    if testimonial.user_id != user.id && !user.is_admin() {
        log::warn!("User {} tried to delete testimonial {}", user.id, id);
        return Err(AppError::Forbidden);
    }
    storage.delete_testimonial(id).await?;
    log::info!("Deleted testimonial {}", id);
    Ok(())
}
