//! Users API client: account login and token capture.

use crate::error::Result;
use serde_json::{Value, json};
use tracing::{debug, info};

/// Production base URL of the Users API.
pub const USERS_BASE_URL: &str = "https://api.users.cloud.corsano.com/";

/// Client for the Corsano Users API.
///
/// Holds the session token captured by [`UsersClient::login`]; all state
/// lives on the handle, one caller at a time.
#[derive(Debug, Clone)]
pub struct UsersClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl UsersClient {
    /// Create a client against the production API.
    pub fn new() -> Self {
        Self::with_base_url(USERS_BASE_URL)
    }

    /// Create a client against a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    /// The captured session token, if logged in.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Log in with account credentials. A `token` field in the response
    /// is captured on the handle; the raw response is returned either
    /// way so callers can inspect failures.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Value> {
        info!("Logging in to Corsano users API");
        let body = json!({ "email": email, "password": password });
        let res = self.post("login", &body).await?;

        if let Some(token) = res.get("token").and_then(Value::as_str) {
            self.token = Some(token.to_string());
        }
        Ok(res)
    }

    /// POST a JSON body to a path under the base URL.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path.trim_start_matches('/'));
        debug!(%url, "Corsano POST");

        let response = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        Ok(response.json().await?)
    }
}

impl Default for UsersClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = UsersClient::with_base_url("http://localhost:9999");
        assert_eq!(client.base_url, "http://localhost:9999/");
    }

    #[test]
    fn test_new_client_has_no_token() {
        assert!(UsersClient::new().token().is_none());
    }
}
