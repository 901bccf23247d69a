// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, storage, sessions and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{start_cleanup_task, LoginThrottle, SessionStore};
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info"
        };
        std::env::set_var(
            "RUST_LOG",
            format!("{},actix_web=info,sqlx=warn", log_level),
        );
    }
    env_logger::init();

    log::info!("Starting tuca-noronha booking service...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize storage backend
    let storage = match config::init_storage(&config).await {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Failed to initialize storage: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Seed admin account and sample catalog
    match db::seed::run(storage.as_ref(), &config).await {
        Ok(report) => log::info!(
            "Seeding done (admin created: {}, catalog items: {})",
            report.admin_created,
            report.catalog_items
        ),
        Err(e) => {
            log::error!("Failed to seed storage: {}", e);
            std::process::exit(1);
        }
    }

    // 6. Sessions and login throttling
    let sessions = Arc::new(SessionStore::new(config.session_ttl(), config.cookie_secure));
    start_cleanup_task(sessions.clone(), config.session_cleanup_seconds);
    log::info!(
        "Started session cleanup task (TTL: {}h, interval: {}s)",
        config.session_ttl_hours,
        config.session_cleanup_seconds
    );

    let throttle = Arc::new(LoginThrottle::new(config.login_attempts_per_minute));
    let throttle_cleanup = throttle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            throttle_cleanup.cleanup();
        }
    });

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);

    HttpServer::new(move || {
        App::new()
            // Application state (storage, sessions and login throttle)
            .app_data(web::Data::from(storage.clone()))
            .app_data(web::Data::from(sessions.clone()))
            .app_data(web::Data::from(throttle.clone()))
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .app_data(handlers::path_config())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::auth_config)
            .configure(handlers::profile_config)
            .configure(handlers::catalog_config)
            .configure(handlers::testimonials_config)
            .configure(handlers::bookings_config)
            .configure(handlers::favorites_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
