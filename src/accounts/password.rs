//! Password storage policy.
//!
//! By default the password is stored and compared verbatim. This is not fit
//! for production. Hashing changes the login contract for every existing
//! row, so it is opt-in through `PASSWORD_STORAGE=argon2`. Verification
//! accepts both formats, so enabling `argon2` does not lock out plaintext
//! rows.

use std::str::FromStr;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use serde::Deserialize;
use tracing::{error, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStorage {
    #[default]
    Plaintext,
    Argon2,
}

impl FromStr for PasswordStorage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" => Ok(Self::Plaintext),
            "argon2" => Ok(Self::Argon2),
            other => anyhow::bail!("unknown PASSWORD_STORAGE value: {other}"),
        }
    }
}

impl PasswordStorage {
    /// Produce the value written to the `password` column.
    pub fn encode(self, plain: &str) -> anyhow::Result<String> {
        match self {
            Self::Plaintext => Ok(plain.to_owned()),
            Self::Argon2 => hash_password(plain),
        }
    }
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Check `plain` against a stored value in either format.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => {
            if stored.starts_with("$argon2") {
                warn!("stored password looks hashed but does not parse");
            }
            stored == plain
        }
    }
}
