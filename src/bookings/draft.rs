//! Booking draft lifecycle.
//!
//! `Empty → LocationsChosen → DatesChosen → Drafted → Quoted → Confirmed`
//!
//! Each transition validates its own input. A transition that fails leaves
//! the draft exactly as it was, so the caller can correct the input and try
//! again.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Date, OffsetDateTime, PrimitiveDateTime};
use tracing::{debug, info};
use uuid::Uuid;

use crate::bookings::pricing::{self, Quote};
use crate::bookings::repo_types::{BookingStatus, PaymentMethod};
use crate::catalog::{AddOn, AddOnId, CarId, Catalog};
use crate::client::{session::ClientSession, storage::KeyValueStore};

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Please select pickup and dropoff locations.")]
    MissingLocation,
    #[error("Unknown location: {0}")]
    UnknownLocation(String),
    #[error("Please select pickup and return dates.")]
    MissingDate,
    #[error("Pickup date cannot be in the past.")]
    DateInPast,
    #[error("Return must be after pickup.")]
    DropoffBeforePickup,
    #[error("Invalid time slot: {0}")]
    InvalidTime(String),
    #[error("Please log in to continue booking.")]
    AuthenticationRequired,
    #[error("No pending booking found.")]
    NoPendingDraft,
    #[error("Pending booking is for car {pending}, not car {requested}.")]
    CarMismatch { pending: CarId, requested: CarId },
    #[error("Car not found.")]
    UnknownCar(CarId),
    #[error("Unknown add-on: {0}")]
    UnknownAddOn(AddOnId),
    #[error("Please fill in {0}.")]
    MissingField(&'static str),
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),
    #[error("Cannot {action} while the booking is {state}.")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("failed to save booking")]
    Storage(#[from] serde_json::Error),
}

fn format_date(d: Date) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}

fn format_time(t: time::Time) -> String {
    format!("{:02}:{:02}", t.hour(), t.minute())
}

/// Booking parameters as persisted under `pending_booking` and as sent to
/// the booking service. Dates are `YYYY-MM-DD`, times `HH:MM`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingDraft {
    pub car_id: CarId,
    pub pickup_location: String,
    pub dropoff_location: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub dropoff_date: String,
    pub dropoff_time: String,
    pub add_ons: Vec<AddOnId>,
    pub payment_method: String,
}

impl BookingDraft {
    pub fn pickup_at(&self) -> Option<PrimitiveDateTime> {
        pricing::parse_timestamp(&self.pickup_date, &self.pickup_time)
    }

    pub fn dropoff_at(&self) -> Option<PrimitiveDateTime> {
        pricing::parse_timestamp(&self.dropoff_date, &self.dropoff_time)
    }

    pub fn quote(&self, daily_rate: Decimal, offered: &[AddOn]) -> Quote {
        pricing::quote(
            daily_rate,
            self.pickup_at(),
            self.dropoff_at(),
            &self.add_ons,
            offered,
        )
    }

    /// Check everything a confirmation needs and return the payment method.
    pub fn validate_for_confirmation(&self) -> Result<PaymentMethod, DraftError> {
        let required = [
            ("pickup location", &self.pickup_location),
            ("dropoff location", &self.dropoff_location),
            ("pickup date", &self.pickup_date),
            ("pickup time", &self.pickup_time),
            ("return date", &self.dropoff_date),
            ("return time", &self.dropoff_time),
            ("payment method", &self.payment_method),
        ];
        if let Some(&(name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(DraftError::MissingField(name));
        }
        self.payment_method
            .parse()
            .map_err(|_| DraftError::UnknownPaymentMethod(self.payment_method.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locations {
    pub pickup: String,
    pub dropoff: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub pickup: PrimitiveDateTime,
    pub dropoff: PrimitiveDateTime,
}

/// Date picker state of the detail screen.
///
/// Dates before today are never selectable, and neither is a return date
/// before the chosen pickup date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSelection {
    today: Date,
    pickup: Option<Date>,
    dropoff: Option<Date>,
}

impl DateSelection {
    pub fn new(today: Date) -> Self {
        Self {
            today,
            pickup: None,
            dropoff: None,
        }
    }

    pub fn pickup(&self) -> Option<Date> {
        self.pickup
    }

    pub fn dropoff(&self) -> Option<Date> {
        self.dropoff
    }

    pub fn is_pickup_disabled(&self, date: Date) -> bool {
        date < self.today
    }

    pub fn is_dropoff_disabled(&self, date: Date) -> bool {
        date < self.pickup.unwrap_or(self.today).max(self.today)
    }

    /// A pickup date after the selected return date clears the return date.
    pub fn select_pickup(&mut self, date: Date) -> Result<(), DraftError> {
        if self.is_pickup_disabled(date) {
            return Err(DraftError::DateInPast);
        }
        self.pickup = Some(date);
        if self.dropoff.is_some_and(|d| d < date) {
            self.dropoff = None;
        }
        Ok(())
    }

    pub fn select_dropoff(&mut self, date: Date) -> Result<(), DraftError> {
        if date < self.today {
            return Err(DraftError::DateInPast);
        }
        if self.is_dropoff_disabled(date) {
            return Err(DraftError::DropoffBeforePickup);
        }
        self.dropoff = Some(date);
        Ok(())
    }
}

/// Checkout screen state: the draft plus the live add-on and payment
/// selection, with a quote kept in step with both.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    draft: BookingDraft,
    car_name: String,
    daily_rate: Decimal,
    offered: Vec<AddOn>,
    quote: Quote,
}

impl Checkout {
    /// Consume the pending draft for `car_id`. A draft for another car is
    /// left in storage.
    pub fn load<S: KeyValueStore>(
        session: &mut ClientSession<S>,
        catalog: &Catalog,
        car_id: CarId,
    ) -> Result<Self, DraftError> {
        let pending = session.pending_draft().ok_or(DraftError::NoPendingDraft)?;
        if pending.car_id != car_id {
            return Err(DraftError::CarMismatch {
                pending: pending.car_id,
                requested: car_id,
            });
        }
        let car = catalog.get(car_id).ok_or(DraftError::UnknownCar(car_id))?;
        let mut draft = session
            .take_pending_draft()
            .ok_or(DraftError::NoPendingDraft)?;

        draft.add_ons.retain(|id| car.add_ons.iter().any(|a| a.id == *id));
        draft.add_ons.sort_unstable();
        draft.add_ons.dedup();
        let quote = draft.quote(car.daily_price, &car.add_ons);
        Ok(Self {
            draft,
            car_name: car.name.to_owned(),
            daily_rate: car.daily_price,
            offered: car.add_ons.clone(),
            quote,
        })
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn quote(&self) -> &Quote {
        &self.quote
    }

    pub fn selected_add_ons(&self) -> &[AddOnId] {
        &self.draft.add_ons
    }

    fn requote(&mut self) {
        self.quote = self.draft.quote(self.daily_rate, &self.offered);
    }

    pub fn toggle_add_on(&mut self, id: AddOnId, selected: bool) -> Result<(), DraftError> {
        if !self.offered.iter().any(|a| a.id == id) {
            return Err(DraftError::UnknownAddOn(id));
        }
        self.draft.add_ons.retain(|a| *a != id);
        if selected {
            self.draft.add_ons.push(id);
            self.draft.add_ons.sort_unstable();
        }
        self.requote();
        Ok(())
    }

    pub fn select_payment_method(&mut self, raw: &str) -> Result<(), DraftError> {
        let method: PaymentMethod = raw
            .parse()
            .map_err(|_| DraftError::UnknownPaymentMethod(raw.to_owned()))?;
        self.draft.payment_method = method.as_str().to_owned();
        self.requote();
        Ok(())
    }
}

/// A booking confirmed on this browser profile, appended to
/// `rideflex_bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedBooking {
    pub id: Uuid,
    pub car_name: String,
    #[serde(flatten)]
    pub draft: BookingDraft,
    pub quote: Quote,
    pub status: BookingStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub booked_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Draft {
    Empty {
        car_id: CarId,
    },
    LocationsChosen {
        car_id: CarId,
        locations: Locations,
    },
    DatesChosen {
        car_id: CarId,
        locations: Locations,
        schedule: Schedule,
    },
    Drafted(BookingDraft),
    Quoted(Checkout),
    Confirmed(ConfirmedBooking),
}

impl Draft {
    pub fn new(car_id: CarId) -> Self {
        Draft::Empty { car_id }
    }

    pub fn state(&self) -> &'static str {
        match self {
            Draft::Empty { .. } => "empty",
            Draft::LocationsChosen { .. } => "locations chosen",
            Draft::DatesChosen { .. } => "dates chosen",
            Draft::Drafted(_) => "drafted",
            Draft::Quoted(_) => "quoted",
            Draft::Confirmed(_) => "confirmed",
        }
    }

    pub fn car_id(&self) -> CarId {
        match self {
            Draft::Empty { car_id }
            | Draft::LocationsChosen { car_id, .. }
            | Draft::DatesChosen { car_id, .. } => *car_id,
            Draft::Drafted(draft) => draft.car_id,
            Draft::Quoted(checkout) => checkout.draft.car_id,
            Draft::Confirmed(booking) => booking.draft.car_id,
        }
    }

    fn invalid(&self, action: &'static str) -> DraftError {
        DraftError::InvalidTransition {
            action,
            state: self.state(),
        }
    }

    /// Set both locations. Dates already chosen are kept.
    pub fn choose_locations(
        &mut self,
        catalog: &Catalog,
        pickup: &str,
        dropoff: &str,
    ) -> Result<(), DraftError> {
        let (pickup, dropoff) = (pickup.trim(), dropoff.trim());
        if pickup.is_empty() || dropoff.is_empty() {
            return Err(DraftError::MissingLocation);
        }
        if let Some(unknown) = [pickup, dropoff]
            .into_iter()
            .find(|l| !catalog.is_known_location(l))
        {
            return Err(DraftError::UnknownLocation(unknown.to_owned()));
        }
        let locations = Locations {
            pickup: pickup.to_owned(),
            dropoff: dropoff.to_owned(),
        };

        *self = match self {
            Draft::Empty { car_id } | Draft::LocationsChosen { car_id, .. } => {
                Draft::LocationsChosen {
                    car_id: *car_id,
                    locations,
                }
            }
            Draft::DatesChosen {
                car_id, schedule, ..
            } => Draft::DatesChosen {
                car_id: *car_id,
                locations,
                schedule: *schedule,
            },
            _ => return Err(self.invalid("change locations")),
        };
        Ok(())
    }

    pub fn choose_dates(
        &mut self,
        selection: &DateSelection,
        pickup_time: &str,
        dropoff_time: &str,
    ) -> Result<(), DraftError> {
        let (car_id, locations) = match self {
            Draft::LocationsChosen { car_id, locations }
            | Draft::DatesChosen {
                car_id, locations, ..
            } => (*car_id, locations.clone()),
            _ => return Err(self.invalid("choose dates")),
        };
        let (Some(pickup_date), Some(dropoff_date)) = (selection.pickup(), selection.dropoff())
        else {
            return Err(DraftError::MissingDate);
        };
        if dropoff_date < pickup_date {
            return Err(DraftError::DropoffBeforePickup);
        }
        let pickup_time = pricing::parse_time(pickup_time)
            .ok_or_else(|| DraftError::InvalidTime(pickup_time.to_owned()))?;
        let dropoff_time = pricing::parse_time(dropoff_time)
            .ok_or_else(|| DraftError::InvalidTime(dropoff_time.to_owned()))?;
        let schedule = Schedule {
            pickup: PrimitiveDateTime::new(pickup_date, pickup_time),
            dropoff: PrimitiveDateTime::new(dropoff_date, dropoff_time),
        };
        // a same-day return still has to come after the pickup slot
        if schedule.dropoff <= schedule.pickup {
            return Err(DraftError::DropoffBeforePickup);
        }

        *self = Draft::DatesChosen {
            car_id,
            locations,
            schedule,
        };
        Ok(())
    }

    /// "Book now". Needs a logged-in session; the draft is persisted for the
    /// checkout screen.
    pub fn submit<S: KeyValueStore>(
        &mut self,
        session: &mut ClientSession<S>,
    ) -> Result<(), DraftError> {
        let Draft::DatesChosen {
            car_id,
            locations,
            schedule,
        } = self
        else {
            return Err(self.invalid("book"));
        };
        if !session.is_logged_in() {
            debug!(car_id = *car_id, "booking held until login");
            return Err(DraftError::AuthenticationRequired);
        }

        let draft = BookingDraft {
            car_id: *car_id,
            pickup_location: locations.pickup.clone(),
            dropoff_location: locations.dropoff.clone(),
            pickup_date: format_date(schedule.pickup.date()),
            pickup_time: format_time(schedule.pickup.time()),
            dropoff_date: format_date(schedule.dropoff.date()),
            dropoff_time: format_time(schedule.dropoff.time()),
            add_ons: Vec::new(),
            payment_method: String::new(),
        };
        session.save_pending_draft(&draft)?;
        *self = Draft::Drafted(draft);
        Ok(())
    }

    pub fn open_checkout<S: KeyValueStore>(
        &mut self,
        session: &mut ClientSession<S>,
        catalog: &Catalog,
    ) -> Result<(), DraftError> {
        let Draft::Drafted(draft) = self else {
            return Err(self.invalid("open checkout"));
        };
        let checkout = Checkout::load(session, catalog, draft.car_id)?;
        *self = Draft::Quoted(checkout);
        Ok(())
    }

    pub fn checkout(&self) -> Option<&Checkout> {
        match self {
            Draft::Quoted(checkout) => Some(checkout),
            _ => None,
        }
    }

    fn checkout_mut(&mut self, action: &'static str) -> Result<&mut Checkout, DraftError> {
        match self {
            Draft::Quoted(checkout) => Ok(checkout),
            other => Err(other.invalid(action)),
        }
    }

    pub fn toggle_add_on(&mut self, id: AddOnId, selected: bool) -> Result<(), DraftError> {
        self.checkout_mut("change add-ons")?.toggle_add_on(id, selected)
    }

    pub fn select_payment_method(&mut self, method: &str) -> Result<(), DraftError> {
        self.checkout_mut("change payment method")?
            .select_payment_method(method)
    }

    /// Validate, wait out the processing delay, then record the booking on
    /// this profile and clear the pending draft.
    pub async fn confirm<S: KeyValueStore>(
        &mut self,
        session: &mut ClientSession<S>,
        processing_delay: Duration,
    ) -> Result<ConfirmedBooking, DraftError> {
        let checkout = self.checkout_mut("confirm")?;
        checkout.draft.validate_for_confirmation()?;
        tokio::time::sleep(processing_delay).await;

        let booking = ConfirmedBooking {
            id: Uuid::new_v4(),
            car_name: checkout.car_name.clone(),
            draft: checkout.draft.clone(),
            quote: checkout.quote.clone(),
            status: BookingStatus::Confirmed,
            booked_at: OffsetDateTime::now_utc(),
        };
        session.record_booking(&booking)?;
        session.clear_pending_draft();
        info!(booking_id = %booking.id, car_id = booking.draft.car_id, "booking confirmed");

        *self = Draft::Confirmed(booking.clone());
        Ok(booking)
    }
}
