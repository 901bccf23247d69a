// src/handlers/testimonials.rs
// DOCUMENTATION: HTTP handlers for guest testimonials
// PURPOSE: Public listing, posting by signed-in users, curation by admins

use actix_web::{web, HttpResponse, Responder};

use crate::db::Storage;
use crate::errors::AppError;
use crate::handlers::guards::{AdminUser, AuthenticatedUser};
use crate::models::{FeatureUpdate, TestimonialQuery, TestimonialRequest};
use crate::services::testimonial_service;

/// GET /api/testimonials
pub async fn list_testimonials(
    storage: web::Data<dyn Storage>,
    query: web::Query<TestimonialQuery>,
) -> Result<impl Responder, AppError> {
    let testimonials = testimonial_service::list(storage.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(testimonials))
}

/// POST /api/testimonials
pub async fn create_testimonial(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
    body: web::Json<TestimonialRequest>,
) -> Result<impl Responder, AppError> {
    let testimonial =
        testimonial_service::create(storage.get_ref(), &auth.user, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(testimonial))
}

/// PATCH /api/testimonials/{id}
pub async fn feature_testimonial(
    storage: web::Data<dyn Storage>,
    _admin: AdminUser,
    path: web::Path<i32>,
    body: web::Json<FeatureUpdate>,
) -> Result<impl Responder, AppError> {
    let testimonial =
        testimonial_service::set_featured(storage.get_ref(), path.into_inner(), body.featured)
            .await?;
    Ok(HttpResponse::Ok().json(testimonial))
}

/// DELETE /api/testimonials/{id}
pub async fn delete_testimonial(
    storage: web::Data<dyn Storage>,
    auth: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    testimonial_service::delete(storage.get_ref(), &auth.user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/testimonials")
            .route("", web::get().to(list_testimonials))
            .route("", web::post().to(create_testimonial))
            .route("/{id}", web::patch().to(feature_testimonial))
            .route("/{id}", web::delete().to(delete_testimonial)),
    );
}
