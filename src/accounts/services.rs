use lazy_static::lazy_static;
use regex::Regex;
use sqlx::{error::ErrorKind, SqlitePool};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    accounts::{
        dto::{LoginRequest, SignupRequest},
        password::{verify_password, PasswordStorage},
        repo_types::{Account, NewAccount},
    },
    error::AppError,
};

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Email already exists.")]
    EmailTaken,

    /// Unknown email and wrong password share this variant on purpose.
    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("User not found.")]
    NotFound,

    #[error("Database error.")]
    Storage(#[source] sqlx::Error),

    #[error("password hashing failed")]
    Hashing(#[source] anyhow::Error),
}

impl From<sqlx::Error> for AccountError {
    fn from(error: sqlx::Error) -> Self {
        match error.as_database_error().map(|e| e.kind()) {
            Some(ErrorKind::UniqueViolation) => Self::EmailTaken,
            _ => Self::Storage(error),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(error: AccountError) -> Self {
        match error {
            AccountError::BadRequest(msg) => AppError::BadRequest(msg.into()),
            AccountError::EmailTaken => AppError::Conflict(error.to_string()),
            AccountError::InvalidCredentials => AppError::Unauthorized(error.to_string()),
            AccountError::NotFound => AppError::NotFound(error.to_string()),
            AccountError::Storage(e) => AppError::Storage(e),
            AccountError::Hashing(e) => AppError::Internal(e),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns the trimmed value, or `None` when it is absent or blank.
fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Profile lookup by email.
pub async fn lookup(db: &SqlitePool, email: Option<&str>) -> Result<Account, AccountError> {
    let email = email
        .map(normalize_email)
        .filter(|e| !e.is_empty())
        .ok_or(AccountError::BadRequest("Email required."))?;

    Account::find_by_email(db, &email)
        .await?
        .ok_or(AccountError::NotFound)
}

/// Validate a signup payload and insert the account, returning its id.
pub async fn create_account(
    db: &SqlitePool,
    storage: PasswordStorage,
    payload: SignupRequest,
) -> Result<i64, AccountError> {
    let missing = AccountError::BadRequest("All fields are required.");
    let (
        Some(first_name),
        Some(last_name),
        Some(email),
        Some(phone),
        Some(password),
        Some(residential_address),
    ) = (
        required(payload.first_name),
        required(payload.last_name),
        required(payload.email),
        required(payload.phone),
        // passwords are taken verbatim, only emptiness is checked
        payload.password.filter(|p| !p.is_empty()),
        required(payload.residential_address),
    )
    else {
        return Err(missing);
    };

    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AccountError::BadRequest("Invalid email."));
    }

    let password = storage.encode(&password).map_err(AccountError::Hashing)?;
    let account = NewAccount {
        first_name,
        last_name,
        email,
        phone,
        password,
        residential_address,
    };

    // The unique index is the only guard: a racing signup loses here with EmailTaken.
    let id = Account::create(db, &account).await?;
    info!(user_id = id, email = %account.email, "account created");
    Ok(id)
}

/// Check credentials and return the account id.
pub async fn authenticate(db: &SqlitePool, payload: LoginRequest) -> Result<i64, AccountError> {
    let (Some(email), Some(password)) = (
        required(payload.email),
        payload.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AccountError::BadRequest("Email and password required."));
    };
    let email = normalize_email(&email);

    let Some(account) = Account::find_by_email(db, &email).await? else {
        debug!(email = %email, "login unknown email");
        return Err(AccountError::InvalidCredentials);
    };

    if !verify_password(&password, &account.password) {
        debug!(user_id = account.id, "login invalid password");
        return Err(AccountError::InvalidCredentials);
    }

    info!(user_id = account.id, "user logged in");
    Ok(account.id)
}
