use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::bookings::{draft::BookingDraft, pricing::Quote};
use crate::catalog::{AddOnId, CarId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Gcash,
    Paymaya,
    Card,
    Bank,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Gcash => "gcash",
            PaymentMethod::Paymaya => "paymaya",
            PaymentMethod::Card => "card",
            PaymentMethod::Bank => "bank",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcash" => Ok(PaymentMethod::Gcash),
            "paymaya" => Ok(PaymentMethod::Paymaya),
            "card" => Ok(PaymentMethod::Card),
            "bank" => Ok(PaymentMethod::Bank),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct BookingRow {
    pub id: Uuid,
    pub user_id: i64,
    pub car_id: i64,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub dropoff_date: String,
    pub dropoff_time: String,
    pub add_ons: Json<Vec<AddOnId>>,
    pub payment_method: String,
    pub quote: Json<Quote>,
    pub status: String,
    pub created_at: OffsetDateTime,
}

/// A confirmed booking as stored server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub user_id: i64,
    pub car_id: CarId,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub dropoff_date: String,
    pub dropoff_time: String,
    pub add_ons: Vec<AddOnId>,
    pub payment_method: PaymentMethod,
    pub quote: Quote,
    pub status: BookingStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Booking {
    /// A freshly confirmed booking built from a validated draft.
    pub fn confirmed(
        user_id: i64,
        draft: BookingDraft,
        payment_method: PaymentMethod,
        quote: Quote,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            car_id: draft.car_id,
            pickup_location: draft.pickup_location,
            dropoff_location: draft.dropoff_location,
            pickup_date: draft.pickup_date,
            pickup_time: draft.pickup_time,
            dropoff_date: draft.dropoff_date,
            dropoff_time: draft.dropoff_time,
            add_ons: draft.add_ons,
            payment_method,
            quote,
            status: BookingStatus::Confirmed,
            created_at,
        }
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = sqlx::Error;

    fn try_from(r: BookingRow) -> Result<Self, Self::Error> {
        let decode = |msg: String| sqlx::Error::Decode(msg.into());
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            car_id: CarId::try_from(r.car_id).map_err(|e| decode(e.to_string()))?,
            pickup_location: r.pickup_location,
            dropoff_location: r.dropoff_location,
            pickup_date: r.pickup_date,
            pickup_time: r.pickup_time,
            dropoff_date: r.dropoff_date,
            dropoff_time: r.dropoff_time,
            add_ons: r.add_ons.0,
            payment_method: r.payment_method.parse().map_err(decode)?,
            quote: r.quote.0,
            status: r.status.parse().map_err(decode)?,
            created_at: r.created_at,
        })
    }
}
