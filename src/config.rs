//! Deployment configuration: backend base URL, timeouts, throttling and
//! endpoint paths.
//!
//! The backend base URL is deployment configuration — hosts pass it in;
//! the default points at a local development server.

use std::time::Duration;

pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default backend for local development.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Health probes must answer fast or the backend is treated as down.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Photo uploads and JSON calls share one generous timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Pause between consecutive photo submissions to bound backend load.
pub const DEFAULT_INTER_REQUEST_DELAY: Duration = Duration::from_millis(500);

pub fn default_log_filter() -> String {
    "pantryscan=info".to_string()
}

/// Connection settings for [`crate::gateway::RemoteGateway`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Backend base URL without a trailing slash.
    pub base_url: String,
    pub health_timeout: Duration,
    pub request_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            health_timeout: HEALTH_TIMEOUT,
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Backend endpoint paths, relative to the base URL.
pub mod endpoints {
    pub const HEALTH: &str = "health/";
    pub const PREDICT: &str = "predict/";
    pub const EXTRACT_BILL_UPLOAD: &str = "extract-bill-upload/";
    pub const DETECT_ITEMS: &str = "detect-items/";
    pub const ADD_INGREDIENT: &str = "add_ingredient/";
    pub const UPDATE_INVENTORY: &str = "update-inventory/";
    pub const LOGIN: &str = "login/";
    pub const SIGNUP: &str = "signup/";

    pub fn get_ingredients(user_id: &str) -> String {
        format!("get_ingredients/{user_id}")
    }

    pub fn update_ingredient(id: i64) -> String {
        format!("update_ingredient/{id}")
    }

    pub fn delete_ingredient(id: i64) -> String {
        format!("delete_ingredient/{id}")
    }

    pub fn generate_recipe(user_id: &str, meal_type: &str) -> String {
        format!("generate-recipe/{user_id}?meal_type={meal_type}")
    }

    pub fn fetch_user(user_id: &str) -> String {
        format!("fetch-user/{user_id}/")
    }
}
