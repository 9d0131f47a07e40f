//! Health API client: token exchange and summary retrieval.

use crate::{
    error::{CorsanoError, Result},
    params::{ParamValue, encode_query},
    users::UsersClient,
};
use serde_json::{Value, json};
use tracing::{debug, info};

/// Production base URL of the Health API.
pub const HEALTH_BASE_URL: &str = "https://api.health.cloud.corsano.com/";

/// Parameters for a `user-summaries` request.
///
/// Defaults match the API: slots excluded, ten summaries per page,
/// first page.
#[derive(Debug, Clone)]
pub struct SummariesRequest {
    /// First day of the range (ISO date).
    pub date_from: String,
    /// Last day of the range (ISO date).
    pub date_to: String,
    /// Include intra-day slot data.
    pub include_slots: bool,
    /// Page size.
    pub per_page: u32,
    /// 1-based page number.
    pub page: u32,
    /// Restrict to specific summary types.
    pub types: Option<Vec<String>>,
}

impl SummariesRequest {
    /// Request summaries for a date range.
    pub fn new(date_from: impl Into<String>, date_to: impl Into<String>) -> Self {
        Self {
            date_from: date_from.into(),
            date_to: date_to.into(),
            include_slots: false,
            per_page: 10,
            page: 1,
            types: None,
        }
    }

    /// Include intra-day slot data.
    pub fn include_slots(mut self, include: bool) -> Self {
        self.include_slots = include;
        self
    }

    /// Set the page size.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Set the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Restrict to specific summary types.
    pub fn types(mut self, types: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    fn to_params(&self) -> Vec<(&'static str, ParamValue)> {
        let mut params = vec![
            ("date_from", ParamValue::single(&self.date_from)),
            ("date_to", ParamValue::single(&self.date_to)),
            (
                "include_slots",
                ParamValue::single(u8::from(self.include_slots)),
            ),
            ("per_page", ParamValue::single(self.per_page)),
            ("page", ParamValue::single(self.page)),
        ];
        if let Some(types) = &self.types {
            params.push(("types", ParamValue::list(types.clone())));
        }
        params
    }
}

/// Client for the Corsano Health API.
///
/// Authenticated requests carry the bearer token captured by
/// [`HealthClient::login`].
#[derive(Debug, Clone)]
pub struct HealthClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HealthClient {
    /// Create a client against the production API.
    pub fn new() -> Self {
        Self::with_base_url(HEALTH_BASE_URL)
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

    /// Exchange a Users API token for a Health API session. A `token`
    /// field in the response is captured on the handle.
    pub async fn login(&mut self, user_api_token: &str) -> Result<Value> {
        info!("Logging in to Corsano health API");
        let body = json!({ "user_api_token": user_api_token });
        let res = self.post("login", &body).await?;

        if let Some(token) = res.get("token").and_then(Value::as_str) {
            self.token = Some(token.to_string());
        }
        Ok(res)
    }

    /// Log in using the session token a [`UsersClient`] already holds,
    /// the way the dashboard chains the two APIs.
    pub async fn login_from(&mut self, users: &UsersClient) -> Result<Value> {
        let token = users.token().ok_or(CorsanoError::MissingToken)?;
        self.login(token).await
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

    /// GET a path with query parameters, sending the bearer token when
    /// logged in.
    pub async fn get(&self, path: &str, params: &[(&str, ParamValue)]) -> Result<Value> {
        let url = format!(
            "{}{}{}",
            self.base_url,
            path.trim_start_matches('/'),
            encode_query(params)
        );
        debug!(%url, "Corsano GET");

        let mut request = self
            .http
            .get(&url)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        Ok(response.json().await?)
    }

    /// Fetch daily summaries for a date range.
    pub async fn user_summaries(&self, request: &SummariesRequest) -> Result<Value> {
        self.get("user-summaries", &request.to_params()).await
    }
}

impl Default for HealthClient {
    fn default() -> Self {
        Self::new()
    }
}
