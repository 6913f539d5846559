use serde::{Deserialize, Serialize};

/// Request body for signup.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as "All fields are required." rather than a decode failure.
/// License and card fields sent by the signup form are accepted and ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub residential_address: Option<String>,
}

/// Request body for login.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Query string of `GET /api/user`.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
}

/// Response returned after signup or login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub user_id: i64,
}

impl AuthResponse {
    pub fn ok(user_id: i64) -> Self {
        Self {
            success: true,
            user_id,
        }
    }
}
