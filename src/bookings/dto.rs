use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bookings::{draft::BookingDraft, pricing::Quote};

/// Body of `POST /api/bookings`: the checkout draft plus the account id
/// returned at login.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: Option<i64>,
    #[serde(flatten)]
    pub draft: BookingDraft,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingResponse {
    pub success: bool,
    pub booking_id: Uuid,
    pub quote: Quote,
}
