use std::str::FromStr;

use rust_decimal::Decimal;

use super::{Car, Category};

/// Sidebar price bands of the listings screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    Under2000,
    From2000To4000,
    Over4000,
}

impl PriceBand {
    pub fn contains(self, daily_price: Decimal) -> bool {
        let low = Decimal::from(2000);
        let high = Decimal::from(4000);
        match self {
            PriceBand::Under2000 => daily_price < low,
            PriceBand::From2000To4000 => daily_price >= low && daily_price <= high,
            PriceBand::Over4000 => daily_price > high,
        }
    }
}

impl FromStr for PriceBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "under2000" | "0-2000" => Ok(PriceBand::Under2000),
            "2000-4000" => Ok(PriceBand::From2000To4000),
            "over4000" | "4000+" => Ok(PriceBand::Over4000),
            other => Err(format!("unknown price band: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureFlag {
    Automatic,
    Ac,
    Gps,
    Bluetooth,
}

impl FeatureFlag {
    fn needle(self) -> &'static str {
        match self {
            FeatureFlag::Automatic => "automatic",
            FeatureFlag::Ac => "ac",
            FeatureFlag::Gps => "gps",
            FeatureFlag::Bluetooth => "bluetooth",
        }
    }

    fn matches(self, car: &Car) -> bool {
        car.features
            .iter()
            .any(|f| f.to_lowercase().contains(self.needle()))
    }
}

impl FromStr for FeatureFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "automatic" => Ok(FeatureFlag::Automatic),
            "ac" => Ok(FeatureFlag::Ac),
            "gps" => Ok(FeatureFlag::Gps),
            "bluetooth" => Ok(FeatureFlag::Bluetooth),
            other => Err(format!("unknown feature: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Most reviewed first.
    #[default]
    Popular,
    PriceLow,
    PriceHigh,
    Rating,
    Name,
}

impl SortOrder {
    pub fn apply(self, cars: &mut [&Car]) {
        match self {
            SortOrder::Popular => cars.sort_by(|a, b| b.reviews.cmp(&a.reviews)),
            SortOrder::PriceLow => cars.sort_by(|a, b| a.daily_price.cmp(&b.daily_price)),
            SortOrder::PriceHigh => cars.sort_by(|a, b| b.daily_price.cmp(&a.daily_price)),
            SortOrder::Rating => cars.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortOrder::Name => cars.sort_by_key(|c| c.name.to_lowercase()),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "popular" | "recommended" => Ok(SortOrder::Popular),
            "price-low" => Ok(SortOrder::PriceLow),
            "price-high" => Ok(SortOrder::PriceHigh),
            "rating" => Ok(SortOrder::Rating),
            "name" => Ok(SortOrder::Name),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Listing filters. Every criterion is optional; an empty filter matches all.
#[derive(Debug, Clone, Default)]
pub struct CarFilter {
    pub pickup_location: Option<String>,
    pub category: Option<Category>,
    pub price: Option<PriceBand>,
    pub features: Vec<FeatureFlag>,
    pub available_only: bool,
}

impl CarFilter {
    pub fn matches(&self, car: &Car) -> bool {
        if let Some(location) = self.pickup_location.as_deref() {
            if !car
                .location
                .to_lowercase()
                .contains(&location.trim().to_lowercase())
            {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != car.category) {
            return false;
        }
        if self.price.is_some_and(|band| !band.contains(car.daily_price)) {
            return false;
        }
        if self.available_only && !car.available {
            return false;
        }
        self.features.iter().all(|flag| flag.matches(car))
    }
}
