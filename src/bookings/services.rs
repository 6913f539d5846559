use std::time::Duration;

use thiserror::Error;
use time::{macros::offset, OffsetDateTime, UtcOffset};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    bookings::{
        draft::{BookingDraft, DraftError},
        pricing::{self, Quote},
        repo::BookingRepository,
        repo_types::{Booking, BookingStatus},
    },
    catalog::{Car, Catalog},
    error::AppError,
};

/// Pickup dates and times are local to the rental branches.
pub const BRANCH_OFFSET: UtcOffset = offset!(+8);

/// Free cancellation ends this long before pickup.
pub const CANCELLATION_NOTICE: time::Duration = time::Duration::hours(24);

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("User id required.")]
    MissingUserId,

    #[error("User not found.")]
    UnknownUser,

    #[error("Car not found.")]
    CarNotFound,

    #[error("Car is not available for booking.")]
    CarUnavailable,

    #[error("Booking not found.")]
    NotFound,

    #[error("Booking is already cancelled.")]
    AlreadyCancelled,

    #[error("Free cancellation ends 24 hours before pickup.")]
    CancellationWindowClosed,

    #[error("Database error.")]
    Storage(#[source] sqlx::Error),
}

impl From<BookingError> for AppError {
    fn from(error: BookingError) -> Self {
        match error {
            BookingError::Draft(_) | BookingError::MissingUserId => {
                AppError::BadRequest(error.to_string())
            }
            BookingError::UnknownUser | BookingError::CarNotFound | BookingError::NotFound => {
                AppError::NotFound(error.to_string())
            }
            BookingError::CarUnavailable
            | BookingError::AlreadyCancelled
            | BookingError::CancellationWindowClosed => AppError::Conflict(error.to_string()),
            BookingError::Storage(e) => AppError::Storage(e),
        }
    }
}

/// Both timestamps must parse, the return must come after the pickup, and
/// the pickup must not have passed at the branch.
fn check_schedule(draft: &BookingDraft, now: OffsetDateTime) -> Result<(), DraftError> {
    let pickup = draft.pickup_at().ok_or_else(|| {
        DraftError::InvalidTime(format!("{} {}", draft.pickup_date, draft.pickup_time))
    })?;
    let dropoff = draft.dropoff_at().ok_or_else(|| {
        DraftError::InvalidTime(format!("{} {}", draft.dropoff_date, draft.dropoff_time))
    })?;
    if dropoff <= pickup {
        return Err(DraftError::DropoffBeforePickup);
    }
    if pickup.assume_offset(BRANCH_OFFSET) < now {
        return Err(DraftError::DateInPast);
    }
    Ok(())
}

fn car<'a>(catalog: &'a Catalog, draft: &BookingDraft) -> Result<&'a Car, BookingError> {
    catalog.get(draft.car_id).ok_or(BookingError::CarNotFound)
}

/// Price a draft against the catalog. Incomplete dates are not an error.
pub fn quote(catalog: &Catalog, draft: &BookingDraft) -> Result<Quote, BookingError> {
    let car = car(catalog, draft)?;
    Ok(draft.quote(car.daily_price, &car.add_ons))
}

/// Validate a draft, wait out the processing delay and store the booking.
pub async fn confirm(
    repo: &dyn BookingRepository,
    catalog: &Catalog,
    processing_delay: Duration,
    user_id: Option<i64>,
    mut draft: BookingDraft,
) -> Result<Booking, BookingError> {
    let user_id = user_id.ok_or(BookingError::MissingUserId)?;
    let car = car(catalog, &draft)?;
    if !car.available {
        return Err(BookingError::CarUnavailable);
    }
    let payment_method = draft.validate_for_confirmation()?;
    check_schedule(&draft, OffsetDateTime::now_utc())?;
    for location in [&draft.pickup_location, &draft.dropoff_location] {
        if !catalog.is_known_location(location.trim()) {
            return Err(DraftError::UnknownLocation(location.clone()).into());
        }
    }
    if let Some(id) = draft
        .add_ons
        .iter()
        .find(|id| !car.add_ons.iter().any(|a| a.id == **id))
    {
        return Err(DraftError::UnknownAddOn(*id).into());
    }
    draft.add_ons.sort_unstable();
    draft.add_ons.dedup();

    let quote = draft.quote(car.daily_price, &car.add_ons);
    tokio::time::sleep(processing_delay).await;

    let booking = Booking::confirmed(
        user_id,
        draft,
        payment_method,
        quote,
        OffsetDateTime::now_utc(),
    );
    repo.create(&booking).await?;
    info!(booking_id = %booking.id, user_id, car_id = booking.car_id, total = %booking.quote.total, "booking confirmed");
    Ok(booking)
}

pub async fn list_for_user(
    repo: &dyn BookingRepository,
    user_id: Option<i64>,
) -> Result<Vec<Booking>, BookingError> {
    let user_id = user_id.ok_or(BookingError::MissingUserId)?;
    repo.list_by_user(user_id).await
}

pub async fn get(repo: &dyn BookingRepository, id: Uuid) -> Result<Booking, BookingError> {
    repo.get(id).await?.ok_or(BookingError::NotFound)
}

/// Cancel a booking whose pickup is more than 24 hours after `now`.
///
/// A booking with an unreadable pickup timestamp can always be cancelled.
pub async fn cancel(
    repo: &dyn BookingRepository,
    id: Uuid,
    now: OffsetDateTime,
) -> Result<Booking, BookingError> {
    let booking = get(repo, id).await?;
    if booking.status == BookingStatus::Cancelled {
        return Err(BookingError::AlreadyCancelled);
    }
    let pickup = pricing::parse_timestamp(&booking.pickup_date, &booking.pickup_time)
        .map(|p| p.assume_offset(BRANCH_OFFSET));
    if pickup.is_some_and(|pickup| pickup - now <= CANCELLATION_NOTICE) {
        warn!(booking_id = %id, "cancellation requested inside the notice window");
        return Err(BookingError::CancellationWindowClosed);
    }

    let cancelled = repo
        .update_status(id, BookingStatus::Cancelled)
        .await?
        .ok_or(BookingError::NotFound)?;
    info!(booking_id = %id, "booking cancelled");
    Ok(cancelled)
}
