// src/models/booking.rs
// DOCUMENTATION: Reservations of catalog items by signed-in users
// PURPOSE: Booking record, status lifecycle and request DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::catalog::ItemKind;
use crate::errors::AppError;

/// Booking lifecycle: pending -> confirmed -> cancelled, or pending -> cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown booking status '{}'", s)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub item_kind: ItemKind,
    pub item_id: i32,

    /// Item title at booking time, kept if the item is later removed
    pub item_title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub guests: i32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for POST /api/bookings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub item_kind: ItemKind,
    pub item_id: i32,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    #[validate(range(min = 1, max = 100))]
    pub guests: i32,

    #[validate(length(max = 1000))]
    #[serde(default)]
    pub notes: Option<String>,
}

/// Insert payload handed to storage; status starts as pending
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: i32,
    pub item_kind: ItemKind,
    pub item_id: i32,
    pub item_title: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub guests: i32,
    pub total_price: f64,
    pub notes: Option<String>,
}

/// Request DTO for PATCH /api/admin/bookings/{id}/status
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}
