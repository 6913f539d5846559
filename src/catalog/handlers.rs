use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    catalog::{AddOn, Car, CarFilter, CarId, CategoryCount, SortOrder},
    error::AppError,
    state::AppState,
};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/api/cars", get(list_cars))
        .route("/api/cars/:id", get(get_car))
        .route("/api/addons", get(list_add_ons))
}

/// Query string of the listings screen. Search criteria that do not affect
/// filtering (dates, times, dropoff) pass through untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarQuery {
    pub pickup_location: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    /// Comma-separated feature flags.
    pub features: Option<String>,
    pub available: Option<bool>,
    pub sort: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty() && *v != "all")
}

impl CarQuery {
    pub fn parse(&self) -> Result<(CarFilter, SortOrder), AppError> {
        let category = non_empty(self.category.as_deref())
            .map(str::parse)
            .transpose()
            .map_err(AppError::BadRequest)?;
        let price = non_empty(self.price.as_deref())
            .map(str::parse)
            .transpose()
            .map_err(AppError::BadRequest)?;
        let features = self
            .features
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter(|f| !f.trim().is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map_err(AppError::BadRequest)?;
        let sort = self
            .sort
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(AppError::BadRequest)?;

        let filter = CarFilter {
            pickup_location: non_empty(self.pickup_location.as_deref()).map(String::from),
            category,
            price,
            features,
            available_only: self.available.unwrap_or(false),
        };
        Ok((filter, sort))
    }
}

#[derive(Debug, Serialize)]
pub struct CarListResponse {
    pub total: usize,
    pub categories: Vec<CategoryCount>,
    pub cars: Vec<Car>,
}

#[instrument(skip(state))]
pub async fn list_cars(
    State(state): State<AppState>,
    query: Result<Query<CarQuery>, QueryRejection>,
) -> Result<Json<CarListResponse>, AppError> {
    let Query(query) = query?;
    let (filter, sort) = query.parse()?;
    let cars: Vec<Car> = state
        .catalog
        .search(&filter, sort)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(CarListResponse {
        total: cars.len(),
        categories: state.catalog.category_counts(),
        cars,
    }))
}

#[instrument(skip(state))]
pub async fn get_car(
    State(state): State<AppState>,
    id: Result<Path<CarId>, PathRejection>,
) -> Result<Json<Car>, AppError> {
    let Path(id) = id?;
    state
        .catalog
        .get(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Car not found.".into()))
}

pub async fn list_add_ons(State(state): State<AppState>) -> Json<Vec<AddOn>> {
    Json(state.catalog.add_ons().to_vec())
}
