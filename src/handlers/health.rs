// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Simple endpoint to verify service status and the active storage backend

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::db::Storage;

pub async fn health_check(storage: web::Data<dyn Storage>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "tuca-noronha",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": storage.backend_name()
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
