// src/db/seed.rs
// DOCUMENTATION: Startup seeding
// PURPOSE: Ensure the administrator account exists and fill an empty catalog with sample data

use crate::config::Config;
use crate::db::{Storage, UserStore};
use crate::errors::AppError;
use crate::models::*;
use crate::services::auth_service;

/// Result of a seeding run, logged by main
#[derive(Debug, Default, PartialEq)]
pub struct SeedReport {
    pub admin_created: bool,
    pub catalog_items: usize,
}

/// Create the configured administrator unless the email is already taken
pub async fn seed_admin(storage: &dyn Storage, config: &Config) -> Result<bool, AppError> {
    let email = config.admin_email.trim().to_lowercase();
    if storage.find_user_by_email(&email).await?.is_some() {
        log::debug!("Admin account {} already present", email);
        return Ok(false);
    }

    let password_hash = auth_service::hash_password(&config.admin_password)?;
    storage
        .create_user(NewUser {
            email: email.clone(),
            password_hash,
            full_name: "Administrador Tuca Noronha".to_string(),
            phone: None,
            role: Role::Admin,
            preferences: TravelPreferences::default(),
        })
        .await?;

    log::info!("Seeded admin account {}", email);
    Ok(true)
}

/// Insert sample items into every collection, but only when the catalog is empty
pub async fn seed_catalog(storage: &dyn Storage) -> Result<usize, AppError> {
    let existing = storage.experiences().count().await?
        + storage.accommodations().count().await?
        + storage.packages().count().await?
        + storage.vehicles().count().await?
        + storage.restaurants().count().await?;
    if existing > 0 {
        log::debug!("Catalog already holds {} items; skipping sample data", existing);
        return Ok(0);
    }

    let mut inserted = 0;
    for draft in sample_experiences() {
        storage.experiences().create(draft).await?;
        inserted += 1;
    }
    for draft in sample_accommodations() {
        storage.accommodations().create(draft).await?;
        inserted += 1;
    }
    for draft in sample_packages() {
        storage.packages().create(draft).await?;
        inserted += 1;
    }
    for draft in sample_vehicles() {
        storage.vehicles().create(draft).await?;
        inserted += 1;
    }
    for draft in sample_restaurants() {
        storage.restaurants().create(draft).await?;
        inserted += 1;
    }

    log::info!("Seeded {} sample catalog items", inserted);
    Ok(inserted)
}

pub async fn run(storage: &dyn Storage, config: &Config) -> Result<SeedReport, AppError> {
    let admin_created = seed_admin(storage, config).await?;
    let catalog_items = if config.seed_sample_data {
        seed_catalog(storage).await?
    } else {
        0
    };
    Ok(SeedReport {
        admin_created,
        catalog_items,
    })
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn sample_experiences() -> Vec<NewExperience> {
    vec![
        NewExperience {
            title: "Mergulho de batismo na Baía dos Porcos".to_string(),
            description: "Primeiro mergulho com cilindro acompanhado de instrutor credenciado, \
                          em águas cristalinas com tartarugas e peixes recifais."
                .to_string(),
            category: "diving".to_string(),
            location: "Baía dos Porcos".to_string(),
            duration: "3 horas".to_string(),
            price: 480.0,
            max_guests: 6,
            image_url: "/images/experiences/mergulho-batismo.jpg".to_string(),
            rating: Some(4.9),
            featured: true,
        },
        NewExperience {
            title: "Passeio de barco ao pôr do sol".to_string(),
            description: "Navegação pelo mar de dentro com parada para avistar golfinhos rotadores \
                          e pôr do sol no Morro Dois Irmãos."
                .to_string(),
            category: "boat_tour".to_string(),
            location: "Porto de Santo Antônio".to_string(),
            duration: "4 horas".to_string(),
            price: 260.0,
            max_guests: 20,
            image_url: "/images/experiences/barco-por-do-sol.jpg".to_string(),
            rating: Some(4.8),
            featured: true,
        },
        NewExperience {
            title: "Trilha do Atalaia".to_string(),
            description: "Trilha guiada com piscinas naturais e snorkeling controlado pelo ICMBio."
                .to_string(),
            category: "hiking".to_string(),
            location: "Praia do Atalaia".to_string(),
            duration: "2 horas".to_string(),
            price: 150.0,
            max_guests: 12,
            image_url: "/images/experiences/trilha-atalaia.jpg".to_string(),
            rating: Some(4.7),
            featured: false,
        },
    ]
}

fn sample_accommodations() -> Vec<NewAccommodation> {
    vec![
        NewAccommodation {
            name: "Pousada Mar de Dentro".to_string(),
            description: "Pousada charmosa com vista para o mar e café da manhã regional."
                .to_string(),
            accommodation_type: "pousada".to_string(),
            location: "Vila dos Remédios".to_string(),
            price_per_night: 890.0,
            bedrooms: 1,
            bathrooms: 1,
            max_guests: 3,
            amenities: strings(&["wifi", "ar-condicionado", "café da manhã", "piscina"]),
            image_url: "/images/accommodations/mar-de-dentro.jpg".to_string(),
            rating: Some(4.8),
            featured: true,
        },
        NewAccommodation {
            name: "Casa Sueste".to_string(),
            description: "Casa inteira para famílias, próxima à Baía do Sueste.".to_string(),
            accommodation_type: "house".to_string(),
            location: "Sueste".to_string(),
            price_per_night: 1450.0,
            bedrooms: 3,
            bathrooms: 2,
            max_guests: 7,
            amenities: strings(&["wifi", "cozinha equipada", "churrasqueira"]),
            image_url: "/images/accommodations/casa-sueste.jpg".to_string(),
            rating: Some(4.6),
            featured: false,
        },
    ]
}

fn sample_packages() -> Vec<NewPackage> {
    vec![
        NewPackage {
            title: "Noronha Essencial".to_string(),
            description: "Cinco dias com hospedagem, passeio de barco e ilha tour.".to_string(),
            category: "classic".to_string(),
            duration_days: 5,
            price: 5200.0,
            max_travelers: 4,
            includes: strings(&["hospedagem", "café da manhã", "ilha tour", "passeio de barco"]),
            image_url: "/images/packages/essencial.jpg".to_string(),
            rating: Some(4.9),
            featured: true,
        },
        NewPackage {
            title: "Aventura Submarina".to_string(),
            description: "Uma semana dedicada a mergulhos credenciados e snorkeling.".to_string(),
            category: "diving".to_string(),
            duration_days: 7,
            price: 8900.0,
            max_travelers: 2,
            includes: strings(&["hospedagem", "4 mergulhos", "equipamento", "traslados"]),
            image_url: "/images/packages/aventura-submarina.jpg".to_string(),
            rating: Some(4.7),
            featured: false,
        },
    ]
}

fn sample_vehicles() -> Vec<NewVehicleRental> {
    vec![
        NewVehicleRental {
            name: "Buggy clássico".to_string(),
            description: "Buggy conversível ideal para explorar as praias da ilha.".to_string(),
            vehicle_type: "buggy".to_string(),
            location: "Vila dos Remédios".to_string(),
            price_per_day: 320.0,
            seats: 4,
            available: true,
            image_url: "/images/vehicles/buggy.jpg".to_string(),
            rating: Some(4.6),
            featured: true,
        },
        NewVehicleRental {
            name: "Scooter elétrica".to_string(),
            description: "Scooter silenciosa para duas pessoas.".to_string(),
            vehicle_type: "scooter".to_string(),
            location: "Boldró".to_string(),
            price_per_day: 180.0,
            seats: 2,
            available: true,
            image_url: "/images/vehicles/scooter.jpg".to_string(),
            rating: Some(4.3),
            featured: false,
        },
    ]
}

fn sample_restaurants() -> Vec<NewRestaurant> {
    vec![
        NewRestaurant {
            name: "Mergulhão".to_string(),
            description: "Frutos do mar com vista para o Porto de Santo Antônio.".to_string(),
            cuisine: "seafood".to_string(),
            price_range: "$$$".to_string(),
            average_price: 180.0,
            location: "Porto de Santo Antônio".to_string(),
            opening_hours: "12:00-23:00".to_string(),
            phone: Some("(81) 3619-0000".to_string()),
            image_url: "/images/restaurants/mergulhao.jpg".to_string(),
            rating: Some(4.7),
            featured: true,
        },
        NewRestaurant {
            name: "Cacimba Bistrô".to_string(),
            description: "Cozinha regional contemporânea na vila.".to_string(),
            cuisine: "brazilian".to_string(),
            price_range: "$$".to_string(),
            average_price: 110.0,
            location: "Vila dos Remédios".to_string(),
            opening_hours: "18:00-23:30".to_string(),
            phone: None,
            image_url: "/images/restaurants/cacimba.jpg".to_string(),
            rating: Some(4.5),
            featured: false,
        },
    ]
}
