//! Read-only fleet catalog.
//!
//! The catalog is built once at startup and handed to whoever needs it; there
//! is no global instance.

use std::{fmt, str::FromStr};

use axum::Router;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

mod data;
pub mod filter;
pub mod handlers;

pub use filter::{CarFilter, FeatureFlag, PriceBand, SortOrder};

pub fn router() -> Router<AppState> {
    handlers::catalog_routes()
}

pub type CarId = u32;
pub type AddOnId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sedan,
    Suv,
    Van,
    Hatchback,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Sedan,
        Category::Suv,
        Category::Van,
        Category::Hatchback,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Sedan => "sedan",
            Category::Suv => "suv",
            Category::Van => "van",
            Category::Hatchback => "hatchback",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Specs {
    pub transmission: &'static str,
    pub fuel: &'static str,
    pub seats: u8,
    pub luggage: u8,
}

/// How an add-on is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingUnit {
    /// Price multiplied by the rental duration in days.
    Day,
    /// Flat price charged once per booking.
    Trip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddOn {
    pub id: AddOnId,
    pub name: &'static str,
    pub price: Decimal,
    pub unit: BillingUnit,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: CarId,
    pub name: &'static str,
    pub category: Category,
    pub daily_price: Decimal,
    pub hourly_price: Decimal,
    pub location: &'static str,
    pub specs: Specs,
    pub rating: f32,
    pub reviews: u32,
    pub available: bool,
    pub features: Vec<&'static str>,
    pub add_ons: Vec<AddOn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub count: usize,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    cars: Vec<Car>,
    add_ons: Vec<AddOn>,
}

impl Catalog {
    pub fn new(cars: Vec<Car>, add_ons: Vec<AddOn>) -> Self {
        Self { cars, add_ons }
    }

    /// The Rideflex fleet.
    pub fn seeded() -> Self {
        let add_ons = data::add_ons();
        Self::new(data::cars(&add_ons), add_ons)
    }

    pub fn get(&self, id: CarId) -> Option<&Car> {
        self.cars.iter().find(|car| car.id == id)
    }

    pub fn list(&self) -> &[Car] {
        &self.cars
    }

    /// Add-ons offered at checkout.
    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    pub fn add_on(&self, id: AddOnId) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == id)
    }

    pub fn is_known_location(&self, location: &str) -> bool {
        data::LOCATIONS.contains(&location)
    }

    /// Cars matching `filter`, ordered by `sort`.
    pub fn search(&self, filter: &CarFilter, sort: SortOrder) -> Vec<&Car> {
        let mut cars: Vec<&Car> = self.cars.iter().filter(|car| filter.matches(car)).collect();
        sort.apply(&mut cars);
        cars
    }

    pub fn category_counts(&self) -> Vec<CategoryCount> {
        Category::ALL
            .into_iter()
            .map(|category| CategoryCount {
                category,
                count: self.cars.iter().filter(|c| c.category == category).count(),
            })
            .filter(|c| c.count > 0)
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_catalog_lookup() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.list().len(), 6);
        let vios = catalog.get(1).unwrap();
        assert_eq!(vios.name, "Toyota Vios");
        assert_eq!(vios.daily_price, Decimal::from(1800));
        assert_eq!(vios.add_ons.len(), 4);
        assert!(catalog.get(99).is_none());
    }

    #[test]
    fn add_on_units() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.add_on(2).unwrap().unit, BillingUnit::Trip);
        assert_eq!(catalog.add_on(4).unwrap().unit, BillingUnit::Day);
        assert_eq!(catalog.add_on(4).unwrap().price, Decimal::from(150));
    }

    #[test]
    fn category_parsing_is_case_insensitive() {
        assert_eq!("SUV".parse::<Category>().unwrap(), Category::Suv);
        assert!("truck".parse::<Category>().is_err());
    }

    #[test]
    fn category_counts_skip_empty_categories() {
        let counts = Catalog::seeded().category_counts();
        let pairs: Vec<_> = counts.iter().map(|c| (c.category, c.count)).collect();
        assert_eq!(
            pairs,
            vec![(Category::Sedan, 2), (Category::Suv, 2), (Category::Van, 2)]
        );
    }

    #[test]
    fn known_locations() {
        let catalog = Catalog::seeded();
        assert!(catalog.is_known_location("Davao City"));
        assert!(!catalog.is_known_location("Tagaytay"));
    }
}
