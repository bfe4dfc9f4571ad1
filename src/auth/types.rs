//! Types for authentication and user management

use serde::{Deserialize, Serialize};

/// User data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// The user ID
    pub id: i64,

    /// The login name
    pub username: String,

    /// The user's email address
    pub email: String,

    /// The user's first name
    #[serde(default)]
    pub first_name: String,

    /// The user's last name
    #[serde(default)]
    pub last_name: String,

    /// The user's phone number
    #[serde(default)]
    pub phone: Option<String>,

    /// URL of the user's avatar image
    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Whether the account is active
    #[serde(default)]
    pub is_active: bool,

    /// Whether the email address has been verified
    #[serde(default)]
    pub email_verified: bool,

    /// Whether the phone number has been verified
    #[serde(default)]
    pub phone_verified: bool,

    /// The last sign-in time
    #[serde(default)]
    pub last_login: Option<String>,

    /// The creation time
    #[serde(default)]
    pub created_at: Option<String>,

    /// The update time
    #[serde(default)]
    pub updated_at: Option<String>,

    /// The roles granted to the user
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl User {
    /// The user's display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A role granted to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// The role ID
    pub id: i64,

    /// The role name, e.g. `ADMIN`
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// Credentials for signing in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// The login name
    pub username: String,

    /// The password
    pub password: String,
}

/// Response to a successful sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// The bearer token for subsequent requests
    pub token: String,

    /// The signed-in user
    pub user: User,

    /// The refresh token, when the backend issues one
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Payload for registering a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// The login name
    pub username: String,

    /// The email address
    pub email: String,

    /// The user's first name
    pub first_name: String,

    /// The user's last name
    pub last_name: String,

    /// The user's phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// The password
    pub password: String,
}

/// Response to a registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Human-readable outcome message
    #[serde(default)]
    pub message: String,

    /// The created user
    pub user: User,

    /// A bearer token when the backend auto-signs-in new accounts
    #[serde(default)]
    pub token: Option<String>,
}

/// An authenticated session: the bearer token plus the user it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The bearer token
    pub token: String,

    /// The signed-in user
    pub user: User,
}
