use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use sqlx::{error::ErrorKind, types::Json, SqlitePool};
use uuid::Uuid;

use crate::bookings::{
    repo_types::{Booking, BookingRow, BookingStatus},
    services::BookingError,
};

/// Where confirmed bookings live. Callers do not know whether the store is
/// local or remote.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fails with [`BookingError::UnknownUser`] when `booking.user_id` names
    /// no account.
    async fn create(&self, booking: &Booking) -> Result<(), BookingError>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, BookingError>;

    /// Newest first.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, BookingError>;

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingError>;
}

const SELECT_BOOKING: &str = r#"
    SELECT id, user_id, car_id, pickup_location, dropoff_location,
           pickup_date, pickup_time, dropoff_date, dropoff_time,
           add_ons, payment_method, quote, status, created_at
    FROM bookings
"#;

#[derive(Debug, Clone)]
pub struct SqliteBookingRepository {
    db: SqlitePool,
}

impl SqliteBookingRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

fn storage_error(error: sqlx::Error) -> BookingError {
    match error.as_database_error().map(|e| e.kind()) {
        Some(ErrorKind::ForeignKeyViolation) => BookingError::UnknownUser,
        _ => BookingError::Storage(error),
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<(), BookingError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, user_id, car_id, pickup_location, dropoff_location,
                pickup_date, pickup_time, dropoff_date, dropoff_time,
                add_ons, payment_method, quote, status, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(i64::from(booking.car_id))
        .bind(&booking.pickup_location)
        .bind(&booking.dropoff_location)
        .bind(&booking.pickup_date)
        .bind(&booking.pickup_time)
        .bind(&booking.dropoff_date)
        .bind(&booking.dropoff_time)
        .bind(Json(&booking.add_ons))
        .bind(booking.payment_method.as_str())
        .bind(Json(&booking.quote))
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .execute(&self.db)
        .await
        .map_err(storage_error)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, BookingError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!("{SELECT_BOOKING} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(storage_error)?;
        row.map(Booking::try_from)
            .transpose()
            .map_err(BookingError::Storage)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, BookingError> {
        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "{SELECT_BOOKING} WHERE user_id = ? ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .map_err(storage_error)?;
        rows.into_iter()
            .map(Booking::try_from)
            .collect::<Result<_, _>>()
            .map_err(BookingError::Storage)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingError> {
        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(storage_error)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }
}

/// Process-local store, used by tests and when no database is wanted.
///
/// Only users registered with [`MemoryBookingRepository::with_users`] or
/// [`MemoryBookingRepository::register_user`] can book.
#[derive(Debug, Default)]
pub struct MemoryBookingRepository {
    users: Mutex<HashSet<i64>>,
    bookings: Mutex<HashMap<Uuid, Booking>>,
}

impl MemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = i64>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().collect()),
            bookings: Mutex::default(),
        }
    }

    pub fn register_user(&self, user_id: i64) {
        self.users
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(user_id);
    }

    fn is_known_user(&self, user_id: i64) -> bool {
        self.users
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&user_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Booking>> {
        self.bookings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingRepository {
    async fn create(&self, booking: &Booking) -> Result<(), BookingError> {
        if !self.is_known_user(booking.user_id) {
            return Err(BookingError::UnknownUser);
        }
        self.lock().insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, BookingError> {
        Ok(self.lock().get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Booking>, BookingError> {
        let mut bookings: Vec<Booking> = self
            .lock()
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Option<Booking>, BookingError> {
        let mut bookings = self.lock();
        Ok(bookings.get_mut(&id).map(|booking| {
            booking.status = status;
            booking.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::repo_types::{Account, NewAccount};
    use crate::bookings::{draft::BookingDraft, repo_types::PaymentMethod};
    use crate::catalog::Catalog;
    use time::{Duration, OffsetDateTime};

    fn booking(user_id: i64, minutes_ago: i64) -> Booking {
        let draft = BookingDraft {
            car_id: 1,
            pickup_location: "Manila - BGC".into(),
            dropoff_location: "Manila - BGC".into(),
            pickup_date: "2025-03-10".into(),
            pickup_time: "09:00".into(),
            dropoff_date: "2025-03-12".into(),
            dropoff_time: "09:00".into(),
            add_ons: vec![2, 4],
            payment_method: "card".into(),
        };
        let catalog = Catalog::seeded();
        let car = catalog.get(1).unwrap();
        let quote = draft.quote(car.daily_price, &car.add_ons);
        let created_at = OffsetDateTime::now_utc().replace_nanosecond(0).unwrap()
            - Duration::minutes(minutes_ago);
        Booking::confirmed(user_id, draft, PaymentMethod::Card, quote, created_at)
    }

    async fn sqlite_repo() -> (SqliteBookingRepository, i64) {
        let db = crate::db::memory_pool().await.unwrap();
        let user_id = Account::create(
            &db,
            &NewAccount {
                first_name: "Juan".into(),
                last_name: "Dela Cruz".into(),
                email: "juan@example.com".into(),
                phone: "+63 917 123 4567".into(),
                password: "secret".into(),
                residential_address: "Makati".into(),
            },
        )
        .await
        .unwrap();
        (SqliteBookingRepository::new(db), user_id)
    }

    async fn exercise(repo: &dyn BookingRepository, user_id: i64) {
        let older = booking(user_id, 30);
        let newer = booking(user_id, 5);
        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let stored = repo.get(older.id).await.unwrap().unwrap();
        assert_eq!(stored, older);
        assert_eq!(stored.quote.total, older.quote.total);

        let listed = repo.list_by_user(user_id).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
        assert!(repo.list_by_user(user_id + 1).await.unwrap().is_empty());

        let cancelled = repo
            .update_status(newer.id, BookingStatus::Cancelled)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert!(repo
            .update_status(Uuid::new_v4(), BookingStatus::Cancelled)
            .await
            .unwrap()
            .is_none());
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());

        let stranger = booking(user_id + 100, 0);
        let err = repo.create(&stranger).await.unwrap_err();
        assert!(matches!(err, BookingError::UnknownUser));
        assert!(repo.get(stranger.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn sqlite_repository() {
        let (repo, user_id) = sqlite_repo().await;
        exercise(&repo, user_id).await;
    }

    #[tokio::test]
    async fn memory_repository() {
        exercise(&MemoryBookingRepository::with_users([7]), 7).await;
    }

    #[tokio::test]
    async fn registered_user_can_book_in_memory() {
        let repo = MemoryBookingRepository::new();
        let booking = booking(3, 0);
        assert!(matches!(
            repo.create(&booking).await,
            Err(BookingError::UnknownUser)
        ));
        repo.register_user(3);
        repo.create(&booking).await.unwrap();
        assert_eq!(repo.list_by_user(3).await.unwrap(), vec![booking]);
    }
}
