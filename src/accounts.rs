//! Account endpoints: login, signup, profile fetch.
//!
//! Thin typed wrappers; credential storage and session persistence are
//! the host's concern. Batch processing in bill mode needs the
//! `user_id` these calls return.

use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::endpoints;
use crate::gateway::{Gateway, GatewayError};
use crate::models::recipe::MacroSet;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Gateway(GatewayError),

    /// The backend answered but refused the credentials or profile.
    #[error("{0}")]
    Rejected(String),

    #[error("malformed account response: {0}")]
    Shape(String),
}

/// Identity material returned on a successful login or signup.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: String,
    pub access_token: String,
    pub username: Option<String>,
}

/// New-account profile, sent camelCase as the backend expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupProfile {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
    pub height: f64,
    pub weight: f64,
    pub age: u32,
    pub gender: String,
    pub activity_level: String,
    pub goal: String,
    pub macros: MacroSet,
}

pub async fn login<G: Gateway>(
    gateway: &G,
    email: &str,
    password: &str,
) -> Result<AuthSession, AccountError> {
    let payload = json!({ "email": email, "password": password });
    let raw = call(gateway, endpoints::LOGIN, &payload, "Login failed").await?;
    session_from(&raw, "Login failed")
}

pub async fn signup<G: Gateway>(
    gateway: &G,
    profile: &SignupProfile,
) -> Result<AuthSession, AccountError> {
    let payload =
        serde_json::to_value(profile).map_err(|e| AccountError::Shape(e.to_string()))?;
    let raw = call(gateway, endpoints::SIGNUP, &payload, "Signup failed").await?;
    session_from(&raw, "Signup failed")
}

/// Fetch the stored profile for a user. The shape varies with signup
/// options, so the raw document is returned.
pub async fn fetch_user<G: Gateway>(
    gateway: &G,
    user_id: &str,
) -> Result<Value, AccountError> {
    gateway
        .get_json(&endpoints::fetch_user(user_id))
        .await
        .map_err(AccountError::Gateway)
}

async fn call<G: Gateway>(
    gateway: &G,
    endpoint: &str,
    payload: &Value,
    fallback: &str,
) -> Result<Value, AccountError> {
    match gateway.submit_json(Method::POST, endpoint, Some(payload)).await {
        Ok(raw) => Ok(raw),
        Err(GatewayError::Http { body, .. }) => {
            let detail = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| rejection_message(&v))
                .unwrap_or_else(|| fallback.to_string());
            Err(AccountError::Rejected(detail))
        }
        Err(e) => Err(AccountError::Gateway(e)),
    }
}

/// The backend reports identity either at the top level or nested under
/// `user`; both are accepted.
fn session_from(raw: &Value, fallback: &str) -> Result<AuthSession, AccountError> {
    let user = raw.get("user").unwrap_or(raw);

    let user_id = user
        .get("user_id")
        .or_else(|| user.get("id"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let access_token = raw
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string);

    match (user_id, access_token) {
        (Some(user_id), Some(access_token)) => Ok(AuthSession {
            user_id,
            access_token,
            username: user
                .get("username")
                .or_else(|| user.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        _ => Err(AccountError::Rejected(
            rejection_message(raw).unwrap_or_else(|| fallback.to_string()),
        )),
    }
}

fn rejection_message(raw: &Value) -> Option<String> {
    for key in ["error", "detail"] {
        if let Some(message) = raw.get(key).and_then(Value::as_str) {
            return Some(message.to_string());
        }
    }
    None
}
