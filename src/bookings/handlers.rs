use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    bookings::{
        draft::BookingDraft,
        dto::{BookingListQuery, CreateBookingRequest, CreateBookingResponse},
        pricing::Quote,
        repo_types::Booking,
        services,
    },
    error::AppError,
    state::AppState,
};

pub fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route("/api/bookings/quote", post(quote_booking))
        .route("/api/bookings/:id", get(get_booking))
        .route("/api/bookings/:id/cancel", post(cancel_booking))
}

#[instrument(skip(state, payload))]
pub async fn quote_booking(
    State(state): State<AppState>,
    payload: Result<Json<BookingDraft>, JsonRejection>,
) -> Result<Json<Quote>, AppError> {
    let Json(draft) = payload?;
    let quote = services::quote(&state.catalog, &draft)?;
    Ok(Json(quote))
}

#[instrument(skip(state, payload))]
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> Result<Json<CreateBookingResponse>, AppError> {
    let Json(payload) = payload?;
    let booking = services::confirm(
        state.bookings.as_ref(),
        &state.catalog,
        state.config.processing_delay,
        payload.user_id,
        payload.draft,
    )
    .await?;
    Ok(Json(CreateBookingResponse {
        success: true,
        booking_id: booking.id,
        quote: booking.quote,
    }))
}

#[instrument(skip(state))]
pub async fn list_bookings(
    State(state): State<AppState>,
    query: Result<Query<BookingListQuery>, QueryRejection>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let Query(query) = query?;
    let bookings = services::list_for_user(state.bookings.as_ref(), query.user_id).await?;
    Ok(Json(bookings))
}

#[instrument(skip(state))]
pub async fn get_booking(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, AppError> {
    let Path(id) = id?;
    let booking = services::get(state.bookings.as_ref(), id).await?;
    Ok(Json(booking))
}

#[instrument(skip(state))]
pub async fn cancel_booking(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, AppError> {
    let Path(id) = id?;
    let booking =
        services::cancel(state.bookings.as_ref(), id, OffsetDateTime::now_utc()).await?;
    Ok(Json(booking))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    /// Router over a fresh database holding one account; returns its id.
    async fn app() -> (Router, i64) {
        let state = AppState::for_tests().await.unwrap();
        let app = crate::accounts::router()
            .merge(booking_routes())
            .with_state(state);
        let (status, body) = send(
            &app,
            "POST",
            "/api/signup",
            Some(json!({
                "firstName": "Maria",
                "lastName": "Santos",
                "email": "maria@example.com",
                "phone": "+63 917 555 0101",
                "password": "pass1234",
                "residentialAddress": "Cebu City"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let user_id = body["userId"].as_i64().unwrap();
        (app, user_id)
    }

    fn draft(user_id: i64) -> Value {
        json!({
            "userId": user_id,
            "carId": 1,
            "pickupLocation": "Manila - BGC",
            "dropoffLocation": "Manila - BGC",
            "pickupDate": "2099-03-10",
            "pickupTime": "09:00",
            "dropoffDate": "2099-03-12",
            "dropoffTime": "09:00",
            "addOns": [2, 4],
            "paymentMethod": "card"
        })
    }

    #[tokio::test]
    async fn quote_endpoint() {
        let (app, _) = app().await;
        let (status, body) = send(&app, "POST", "/api/bookings/quote", Some(draft(0))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rentalCost"], "3600");
        assert_eq!(body["tax"], "528.00");
        assert_eq!(body["total"], "4928.00");

        let (status, _) = send(&app, "POST", "/api/bookings/quote", Some(json!({"carId": 42}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_list_get_cancel() {
        let (app, user_id) = app().await;

        let (status, body) = send(&app, "POST", "/api/bookings", Some(draft(user_id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["quote"]["total"], "4928.00");
        let id = body["bookingId"].as_str().unwrap().to_owned();

        let (status, body) = send(&app, "GET", &format!("/api/bookings?userId={user_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], id.as_str());
        assert_eq!(body[0]["status"], "confirmed");
        assert_eq!(body[0]["paymentMethod"], "card");

        let (status, body) = send(&app, "GET", &format!("/api/bookings/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["carId"], 1);

        let (status, body) = send(&app, "POST", &format!("/api/bookings/{id}/cancel"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cancelled");

        let (status, body) = send(&app, "POST", &format!("/api/bookings/{id}/cancel"), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Booking is already cancelled.");
    }

    #[tokio::test]
    async fn missing_payment_method_is_400() {
        let (app, user_id) = app().await;
        let mut body = draft(user_id);
        body["paymentMethod"] = json!("");
        let (status, body) = send(&app, "POST", "/api/bookings", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please fill in payment method.");

        let (status, body) = send(&app, "GET", &format!("/api/bookings?userId={user_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn past_or_inverted_dates_are_400() {
        let (app, user_id) = app().await;

        let mut stale = draft(user_id);
        stale["pickupDate"] = json!("2001-01-01");
        stale["pickupTime"] = json!("18:00");
        stale["dropoffDate"] = json!("2001-01-02");
        let (status, body) = send(&app, "POST", "/api/bookings", Some(stale)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Pickup date cannot be in the past.");

        let mut inverted = draft(user_id);
        inverted["dropoffDate"] = json!("2099-03-10");
        inverted["pickupTime"] = json!("18:00");
        let (status, body) = send(&app, "POST", "/api/bookings", Some(inverted)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Return must be after pickup.");

        let (status, body) = send(&app, "GET", &format!("/api/bookings?userId={user_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_404() {
        let (app, user_id) = app().await;
        let (status, body) = send(&app, "POST", "/api/bookings", Some(draft(user_id + 1))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "User not found.");
    }

    #[tokio::test]
    async fn bad_ids() {
        let (app, _) = app().await;
        let (status, _) = send(&app, "GET", "/api/bookings/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, "GET", &format!("/api/bookings/{}", Uuid::new_v4()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Booking not found.");

        let (status, body) = send(&app, "GET", "/api/bookings", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User id required.");
    }
}
