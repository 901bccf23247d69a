// src/services/booking_service.rs
// DOCUMENTATION: Reservation rules
// PURPOSE: Date and capacity checks, price calculation, status transitions and access control

use chrono::NaiveDate;
use validator::Validate;

use crate::db::{BookingStore, Storage};
use crate::errors::AppError;
use crate::models::{Booking, BookingRequest, BookingStatus, NewBooking, PricingUnit, User};
use crate::services::catalog_service::{self, ItemQuote};

/// Compute the total for a request against an item
/// DOCUMENTATION: Per guest for experiences, packages and restaurants;
/// per night for accommodations (end - start); per day for vehicles (inclusive)
pub fn price_booking(
    quote: &ItemQuote,
    req: &BookingRequest,
    today: NaiveDate,
) -> Result<f64, AppError> {
    if req.start_date < today {
        return Err(AppError::InvalidInput(
            "startDate must not be in the past".to_string(),
        ));
    }
    if let Some(end) = req.end_date {
        if end < req.start_date {
            return Err(AppError::InvalidInput(
                "endDate must not be before startDate".to_string(),
            ));
        }
    }
    if !quote.bookable {
        return Err(AppError::InvalidInput(format!(
            "{} {} is not available for booking",
            quote.kind, quote.id
        )));
    }
    if let Some(capacity) = quote.capacity {
        if req.guests > capacity {
            return Err(AppError::InvalidInput(format!(
                "{} {} accepts at most {} guests",
                quote.kind, quote.id, capacity
            )));
        }
    }

    let total = match quote.pricing {
        PricingUnit::PerGuest => quote.unit_price * req.guests as f64,
        PricingUnit::PerNight => {
            let end = req.end_date.ok_or_else(|| {
                AppError::InvalidInput("endDate is required for accommodations".to_string())
            })?;
            let nights = (end - req.start_date).num_days();
            if nights < 1 {
                return Err(AppError::InvalidInput(
                    "a stay must last at least one night".to_string(),
                ));
            }
            quote.unit_price * nights as f64
        }
        PricingUnit::PerDay => {
            let end = req.end_date.unwrap_or(req.start_date);
            let days = (end - req.start_date).num_days() + 1;
            quote.unit_price * days as f64
        }
    };

    Ok(total)
}

/// Create a pending booking for the caller
pub async fn create_booking(
    storage: &dyn Storage,
    user: &User,
    req: BookingRequest,
    today: NaiveDate,
) -> Result<Booking, AppError> {
    req.validate()?;

    let quote = catalog_service::quote_item(storage, req.item_kind, req.item_id).await?;
    let total_price = price_booking(&quote, &req, today)?;

    storage
        .create_booking(NewBooking {
            user_id: user.id,
            item_kind: req.item_kind,
            item_id: req.item_id,
            item_title: quote.title,
            start_date: req.start_date,
            end_date: req.end_date,
            guests: req.guests,
            total_price,
            notes: req.notes,
        })
        .await
}

pub async fn list_for_user(storage: &dyn Storage, user: &User) -> Result<Vec<Booking>, AppError> {
    storage.list_bookings(Some(user.id)).await
}

pub async fn list_all(storage: &dyn Storage) -> Result<Vec<Booking>, AppError> {
    storage.list_bookings(None).await
}

/// A booking visible to its owner and to admins
pub async fn get_visible(storage: &dyn Storage, user: &User, id: i32) -> Result<Booking, AppError> {
    let booking = storage.get_booking(id).await?;
    if booking.user_id != user.id && !user.is_admin() {
        log::warn!("User {} tried to access booking {}", user.id, id);
        return Err(AppError::Forbidden);
    }
    Ok(booking)
}

async fn transition(
    storage: &dyn Storage,
    booking: Booking,
    next: BookingStatus,
) -> Result<Booking, AppError> {
    if !booking.status.can_transition_to(next) {
        return Err(AppError::InvalidTransition(format!(
            "booking {} cannot move from {} to {}",
            booking.id, booking.status, next
        )));
    }
    let updated = storage.set_booking_status(booking.id, next).await?;
    log::info!(
        "Booking {} moved from {} to {}",
        booking.id,
        booking.status,
        next
    );
    Ok(updated)
}

/// Cancel a booking on behalf of its owner or an admin
pub async fn cancel(storage: &dyn Storage, user: &User, id: i32) -> Result<Booking, AppError> {
    let booking = get_visible(storage, user, id).await?;
    transition(storage, booking, BookingStatus::Cancelled).await
}

/// Admin status change
pub async fn set_status(
    storage: &dyn Storage,
    id: i32,
    status: BookingStatus,
) -> Result<Booking, AppError> {
    let booking = storage.get_booking(id).await?;
    transition(storage, booking, status).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemStorage, UserStore};
    use crate::models::{
        Accommodation, Experience, ItemKind, NewUser, Role, TravelPreferences, VehicleRental,
    };
    use crate::services::catalog_service::{create, fixtures};
    use tokio_test::{assert_err, assert_ok};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2030, 1, 1)
    }

    fn quote(pricing: PricingUnit, unit_price: f64, capacity: Option<i32>) -> ItemQuote {
        ItemQuote {
            kind: ItemKind::Experience,
            id: 1,
            title: "Item".to_string(),
            unit_price,
            pricing,
            capacity,
            bookable: true,
        }
    }

    fn request(start: NaiveDate, end: Option<NaiveDate>, guests: i32) -> BookingRequest {
        BookingRequest {
            item_kind: ItemKind::Experience,
            item_id: 1,
            start_date: start,
            end_date: end,
            guests,
            notes: None,
        }
    }

    async fn user(storage: &MemStorage, email: &str, role: Role) -> User {
        assert_ok!(
            storage
                .create_user(NewUser {
                    email: email.to_string(),
                    password_hash: "hash".to_string(),
                    full_name: "Test".to_string(),
                    phone: None,
                    role,
                    preferences: TravelPreferences::default(),
                })
                .await
        )
    }

    #[test]
    fn test_per_guest_pricing() {
        let total = price_booking(
            &quote(PricingUnit::PerGuest, 250.0, Some(10)),
            &request(date(2030, 2, 1), None, 3),
            today(),
        );
        assert_eq!(assert_ok!(total), 750.0);
    }

    #[test]
    fn test_per_night_pricing_requires_a_night() {
        let q = quote(PricingUnit::PerNight, 800.0, Some(4));
        let total = price_booking(&q, &request(date(2030, 2, 1), Some(date(2030, 2, 4)), 2), today());
        assert_eq!(assert_ok!(total), 2400.0);

        for end in [Some(date(2030, 2, 1)), None] {
            let err = assert_err!(price_booking(&q, &request(date(2030, 2, 1), end, 2), today()));
            assert!(matches!(err, AppError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_per_day_pricing_is_inclusive() {
        let q = quote(PricingUnit::PerDay, 300.0, Some(4));
        let same_day = price_booking(&q, &request(date(2030, 2, 1), Some(date(2030, 2, 1)), 1), today());
        assert_eq!(assert_ok!(same_day), 300.0);

        let three_days = price_booking(&q, &request(date(2030, 2, 1), Some(date(2030, 2, 3)), 1), today());
        assert_eq!(assert_ok!(three_days), 900.0);

        assert_err!(price_booking(&q, &request(date(2030, 2, 3), Some(date(2030, 2, 1)), 1), today()));
    }

    #[test]
    fn test_rejects_past_dates_capacity_and_unavailable_items() {
        let q = quote(PricingUnit::PerGuest, 100.0, Some(2));
        assert_err!(price_booking(&q, &request(date(2029, 12, 31), None, 1), today()));
        assert_err!(price_booking(&q, &request(date(2030, 1, 1), None, 3), today()));
        assert_ok!(price_booking(&q, &request(date(2030, 1, 1), None, 2), today()));

        let unavailable = ItemQuote {
            bookable: false,
            ..quote(PricingUnit::PerDay, 100.0, None)
        };
        assert_err!(price_booking(&unavailable, &request(date(2030, 1, 2), None, 1), today()));
    }

    #[tokio::test]
    async fn test_create_booking_snapshots_title_and_price() {
        let storage = MemStorage::new();
        let guest = user(&storage, "guest@example.com", Role::User).await;
        let stay = assert_ok!(
            create::<Accommodation>(&storage, fixtures::accommodation("Pousada Sueste", 900.0)).await
        );

        let req = BookingRequest {
            item_kind: ItemKind::Accommodation,
            item_id: stay.id,
            start_date: date(2030, 3, 10),
            end_date: Some(date(2030, 3, 12)),
            guests: 2,
            notes: Some("Chegada tarde".to_string()),
        };
        let booking = assert_ok!(create_booking(&storage, &guest, req, today()).await);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.total_price, 1800.0);
        assert_eq!(booking.item_title, "Pousada Sueste");
        assert_eq!(booking.user_id, guest.id);

        let missing = BookingRequest {
            item_kind: ItemKind::Package,
            item_id: 42,
            ..request(date(2030, 3, 10), None, 1)
        };
        let err = assert_err!(create_booking(&storage, &guest, missing, today()).await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_unavailable_vehicle_cannot_be_booked() {
        let storage = MemStorage::new();
        let guest = user(&storage, "guest@example.com", Role::User).await;
        let buggy = assert_ok!(
            create::<VehicleRental>(&storage, fixtures::vehicle("Buggy", 300.0, false)).await
        );
        let req = BookingRequest {
            item_kind: ItemKind::Vehicle,
            item_id: buggy.id,
            ..request(date(2030, 3, 10), None, 2)
        };
        let err = assert_err!(create_booking(&storage, &guest, req, today()).await);
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_access_and_transitions() {
        let storage = MemStorage::new();
        let owner = user(&storage, "owner@example.com", Role::User).await;
        let other = user(&storage, "other@example.com", Role::User).await;
        let admin = user(&storage, "admin@example.com", Role::Admin).await;
        let exp = assert_ok!(
            create::<Experience>(&storage, fixtures::experience("Barco", 200.0, 10)).await
        );
        let booking = assert_ok!(
            create_booking(&storage, &owner, request(date(2030, 5, 1), None, 2), today()).await
        );
        assert_eq!(booking.item_id, exp.id);

        let err = assert_err!(get_visible(&storage, &other, booking.id).await);
        assert!(matches!(err, AppError::Forbidden));
        assert_ok!(get_visible(&storage, &admin, booking.id).await);
        assert_err!(cancel(&storage, &other, booking.id).await);

        let confirmed = assert_ok!(set_status(&storage, booking.id, BookingStatus::Confirmed).await);
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        let err = assert_err!(set_status(&storage, booking.id, BookingStatus::Pending).await);
        assert!(matches!(err, AppError::InvalidTransition(_)));

        let cancelled = assert_ok!(cancel(&storage, &owner, booking.id).await);
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        let err = assert_err!(cancel(&storage, &owner, booking.id).await);
        assert!(matches!(err, AppError::InvalidTransition(_)));

        assert_eq!(assert_ok!(list_for_user(&storage, &owner).await).len(), 1);
        assert!(assert_ok!(list_for_user(&storage, &other).await).is_empty());
        assert_eq!(assert_ok!(list_all(&storage).await).len(), 1);
    }
}
