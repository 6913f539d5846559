use sqlx::SqlitePool;

use crate::accounts::repo_types::{Account, NewAccount};

impl Account {
    /// Find an account by email, ignoring ASCII case so rows stored with
    /// mixed case still match a normalized address.
    pub async fn find_by_email(db: &SqlitePool, email: &str) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, firstName, lastName, email, phone, password, residentialAddress
            FROM users
            WHERE email = ? COLLATE NOCASE
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> Result<Option<Account>, sqlx::Error> {
        sqlx::query_as::<_, Account>(
            r#"
            SELECT id, firstName, lastName, email, phone, password, residentialAddress
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Insert a row and return its generated id.
    ///
    /// Duplicate emails surface as a unique-constraint database error.
    pub async fn create(db: &SqlitePool, account: &NewAccount) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (firstName, lastName, email, phone, password, residentialAddress)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.password)
        .bind(&account.residential_address)
        .execute(db)
        .await?;
        Ok(result.last_insert_rowid())
    }
}
