//! Rental price quote.
//!
//! Every amount in a [`Quote`] is non-negative. An invalid or inverted date
//! range does not fail: it prices the rental at zero while per-day add-ons
//! are still billed for one day.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{macros::format_description, Date, PrimitiveDateTime, Time};

use crate::catalog::{AddOn, AddOnId, BillingUnit};

/// Value-added tax applied to the subtotal (12%).
pub fn tax_rate() -> Decimal {
    Decimal::new(12, 2)
}

const SECONDS_PER_DAY: i64 = 86_400;

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

pub fn parse_time(raw: &str) -> Option<Time> {
    Time::parse(raw.trim(), format_description!("[hour]:[minute]")).ok()
}

/// Combine a `YYYY-MM-DD` date and an `HH:MM` time slot.
pub fn parse_timestamp(date: &str, time: &str) -> Option<PrimitiveDateTime> {
    Some(PrimitiveDateTime::new(parse_date(date)?, parse_time(time)?))
}

/// Whole rental days, rounded up. `None` when either end is missing or the
/// range is empty or inverted.
pub fn rental_days(
    pickup: Option<PrimitiveDateTime>,
    dropoff: Option<PrimitiveDateTime>,
) -> Option<i64> {
    let seconds = (dropoff? - pickup?).whole_seconds();
    if seconds <= 0 {
        return None;
    }
    Some((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOnLine {
    pub id: AddOnId,
    pub name: String,
    pub unit: BillingUnit,
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Billed rental days; 0 when the date range is invalid.
    pub duration_days: i64,
    pub rental_cost: Decimal,
    pub add_on_cost: Decimal,
    pub add_on_lines: Vec<AddOnLine>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

fn non_negative(amount: Decimal) -> Decimal {
    amount.max(Decimal::ZERO)
}

/// Price a rental.
///
/// Selected ids not present in `catalog` are ignored, and an id selected
/// twice is billed once.
pub fn quote(
    daily_rate: Decimal,
    pickup: Option<PrimitiveDateTime>,
    dropoff: Option<PrimitiveDateTime>,
    selected: &[AddOnId],
    catalog: &[AddOn],
) -> Quote {
    let days = rental_days(pickup, dropoff);
    let rental_cost = days.map_or(Decimal::ZERO, |d| non_negative(Decimal::from(d) * daily_rate));

    // per-day add-ons still bill one day when the range is unusable
    let add_on_days = Decimal::from(days.unwrap_or(1));
    let mut add_on_lines: Vec<AddOnLine> = Vec::new();
    for add_on in catalog.iter().filter(|a| selected.contains(&a.id)) {
        let cost = match add_on.unit {
            BillingUnit::Trip => add_on.price,
            BillingUnit::Day => add_on.price * add_on_days,
        };
        add_on_lines.push(AddOnLine {
            id: add_on.id,
            name: add_on.name.to_owned(),
            unit: add_on.unit,
            cost: non_negative(cost),
        });
    }
    let add_on_cost: Decimal = add_on_lines.iter().map(|l| l.cost).sum();

    let subtotal = non_negative(rental_cost + add_on_cost);
    let tax = non_negative((subtotal * tax_rate()).round_dp(2));
    let total = non_negative(subtotal + tax);

    Quote {
        duration_days: days.unwrap_or(0),
        rental_cost,
        add_on_cost,
        add_on_lines,
        subtotal,
        tax,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn ts(date: &str, time: &str) -> Option<PrimitiveDateTime> {
        parse_timestamp(date, time)
    }

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn add_on(id: AddOnId, price: i64, unit: BillingUnit) -> AddOn {
        AddOn {
            id,
            name: "Extra",
            price: dec(price),
            unit,
            description: "",
        }
    }

    #[test]
    fn two_full_days() {
        let days = rental_days(ts("2025-01-01", "08:00"), ts("2025-01-03", "08:00"));
        assert_eq!(days, Some(2));

        let q = quote(dec(1800), ts("2025-01-01", "08:00"), ts("2025-01-03", "08:00"), &[], &[]);
        assert_eq!(q.rental_cost, dec(2) * dec(1800));
    }

    #[test]
    fn partial_day_rounds_up() {
        let days = rental_days(ts("2025-01-01", "08:00"), ts("2025-01-02", "09:00"));
        assert_eq!(days, Some(2));
        let days = rental_days(ts("2025-01-01", "08:00"), ts("2025-01-01", "09:00"));
        assert_eq!(days, Some(1));
    }

    #[test]
    fn trip_add_on_is_flat_and_day_add_on_scales() {
        let catalog = [add_on(1, 500, BillingUnit::Trip), add_on(2, 200, BillingUnit::Day)];

        let one_day = quote(dec(1000), ts("2025-05-01", "10:00"), ts("2025-05-02", "10:00"), &[1], &catalog);
        let week = quote(dec(1000), ts("2025-05-01", "10:00"), ts("2025-05-08", "10:00"), &[1], &catalog);
        assert_eq!(one_day.add_on_cost, dec(500));
        assert_eq!(week.add_on_cost, dec(500));

        let three_days = quote(dec(1000), ts("2025-05-01", "10:00"), ts("2025-05-04", "10:00"), &[2], &catalog);
        assert_eq!(three_days.add_on_cost, dec(600));
    }

    #[test]
    fn tax_is_twelve_percent() {
        let catalog = [add_on(1, 1000, BillingUnit::Trip)];
        // no dates: rental is zero, subtotal is the trip add-on alone
        let q = quote(dec(1800), None, None, &[1], &catalog);
        assert_eq!(q.subtotal, dec(1000));
        assert_eq!(q.tax, dec(120));
        assert_eq!(q.total, dec(1120));
    }

    #[test]
    fn inverted_or_empty_range_prices_rental_at_zero() {
        let catalog = [add_on(1, 150, BillingUnit::Day), add_on(2, 500, BillingUnit::Trip)];
        for (pickup, dropoff) in [
            (ts("2025-03-12", "09:00"), ts("2025-03-10", "09:00")),
            (ts("2025-03-10", "09:00"), ts("2025-03-10", "09:00")),
        ] {
            let q = quote(dec(1800), pickup, dropoff, &[1, 2], &catalog);
            assert_eq!(q.duration_days, 0);
            assert_eq!(q.rental_cost, Decimal::ZERO);
            assert_eq!(q.add_on_cost, dec(650));
            assert!(q.subtotal >= Decimal::ZERO);
            assert!(q.tax >= Decimal::ZERO);
            assert!(q.total >= Decimal::ZERO);
        }
    }

    #[test]
    fn unparseable_timestamps_price_rental_at_zero() {
        assert!(parse_timestamp("2025-02-30", "09:00").is_none());
        assert!(parse_timestamp("2025-03-10", "9 am").is_none());
        assert!(parse_timestamp("", "").is_none());

        let q = quote(dec(1800), ts("not-a-date", "09:00"), ts("2025-03-12", "09:00"), &[], &[]);
        assert_eq!(q.rental_cost, Decimal::ZERO);
        assert_eq!(q.total, Decimal::ZERO);
    }

    #[test]
    fn checkout_example_from_the_vios_page() {
        let catalog = Catalog::seeded();
        // Delivery Service (500/trip) and GPS Navigation (150/day)
        let q = quote(
            dec(1800),
            ts("2025-03-10", "09:00"),
            ts("2025-03-12", "09:00"),
            &[2, 4],
            catalog.add_ons(),
        );
        assert_eq!(q.duration_days, 2);
        assert_eq!(q.rental_cost, dec(3600));
        assert_eq!(q.add_on_cost, dec(800));
        assert_eq!(q.subtotal, dec(4400));
        assert_eq!(q.tax, dec(528));
        assert_eq!(q.total, dec(4928));
        assert_eq!(q.add_on_lines.len(), 2);
        assert_eq!(q.add_on_lines[1].cost, dec(300));
    }

    #[test]
    fn unknown_and_repeated_add_ons() {
        let catalog = [add_on(1, 500, BillingUnit::Trip)];
        let q = quote(dec(1000), None, None, &[1, 1, 9], &catalog);
        assert_eq!(q.add_on_cost, dec(500));
    }

    #[test]
    fn negative_prices_are_clamped() {
        let catalog = [add_on(1, -5000, BillingUnit::Trip)];
        let q = quote(dec(-100), ts("2025-01-01", "08:00"), ts("2025-01-02", "08:00"), &[1], &catalog);
        assert_eq!(q.rental_cost, Decimal::ZERO);
        assert_eq!(q.subtotal, Decimal::ZERO);
        assert_eq!(q.tax, Decimal::ZERO);
        assert_eq!(q.total, Decimal::ZERO);
    }
}
