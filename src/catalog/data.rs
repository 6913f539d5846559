use rust_decimal::Decimal;

use super::{AddOn, BillingUnit, Car, Category, Specs};

pub(super) const LOCATIONS: &[&str] = &[
    "Manila - BGC",
    "Manila - Makati",
    "Manila - Ortigas",
    "Manila - Alabang",
    "Cebu City",
    "Davao City",
];

pub(super) fn add_ons() -> Vec<AddOn> {
    vec![
        AddOn {
            id: 1,
            name: "Professional Driver",
            price: Decimal::from(800),
            unit: BillingUnit::Day,
            description: "Experienced driver included",
        },
        AddOn {
            id: 2,
            name: "Delivery Service",
            price: Decimal::from(500),
            unit: BillingUnit::Trip,
            description: "Car delivered to your location",
        },
        AddOn {
            id: 3,
            name: "Baby Car Seat",
            price: Decimal::from(200),
            unit: BillingUnit::Day,
            description: "Child safety seat",
        },
        AddOn {
            id: 4,
            name: "GPS Navigation",
            price: Decimal::from(150),
            unit: BillingUnit::Day,
            description: "Garmin GPS device",
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn car(
    id: u32,
    name: &'static str,
    category: Category,
    (daily, hourly): (i64, i64),
    (rating, reviews): (f32, u32),
    specs: Specs,
    available: bool,
    location: &'static str,
    features: Vec<&'static str>,
    add_ons: &[AddOn],
) -> Car {
    Car {
        id,
        name,
        category,
        daily_price: Decimal::from(daily),
        hourly_price: Decimal::from(hourly),
        location,
        specs,
        rating,
        reviews,
        available,
        features,
        add_ons: add_ons.to_vec(),
    }
}

pub(super) fn cars(add_ons: &[AddOn]) -> Vec<Car> {
    vec![
        car(
            1,
            "Toyota Vios",
            Category::Sedan,
            (1800, 120),
            (4.8, 156),
            Specs { transmission: "Automatic", fuel: "Gasoline", seats: 5, luggage: 2 },
            true,
            "Manila - BGC",
            vec!["Automatic", "AC", "Bluetooth", "USB Charging"],
            add_ons,
        ),
        car(
            2,
            "Honda City",
            Category::Sedan,
            (1900, 130),
            (4.7, 89),
            Specs { transmission: "CVT", fuel: "Gasoline", seats: 5, luggage: 2 },
            true,
            "Manila - Makati",
            vec!["Automatic", "AC", "GPS", "Bluetooth"],
            add_ons,
        ),
        car(
            3,
            "Honda CR-V",
            Category::Suv,
            (3200, 220),
            (4.9, 203),
            Specs { transmission: "CVT", fuel: "Gasoline", seats: 7, luggage: 4 },
            true,
            "Manila - BGC",
            vec!["Automatic", "AC", "GPS", "Bluetooth", "7 Seats"],
            add_ons,
        ),
        car(
            4,
            "Toyota Fortuner",
            Category::Suv,
            (3800, 280),
            (4.8, 167),
            Specs { transmission: "Automatic", fuel: "Diesel", seats: 7, luggage: 4 },
            false,
            "Manila - Ortigas",
            vec!["Automatic", "AC", "4WD", "7 Seats"],
            add_ons,
        ),
        car(
            5,
            "Toyota Hiace",
            Category::Van,
            (4500, 350),
            (4.7, 112),
            Specs { transmission: "Manual", fuel: "Diesel", seats: 15, luggage: 6 },
            true,
            "Manila - Alabang",
            vec!["Manual", "15 Seats", "AC"],
            add_ons,
        ),
        car(
            6,
            "Nissan Urvan",
            Category::Van,
            (4200, 320),
            (4.6, 78),
            Specs { transmission: "Manual", fuel: "Gasoline", seats: 12, luggage: 5 },
            true,
            "Cebu City",
            vec!["Manual", "12 Seats", "AC", "Bluetooth"],
            add_ons,
        ),
    ]
}
