//! REST transport for Elasticsearch and Kibana.

use crate::{
    config::ElasticConfig,
    error::Result,
};
use reqwest::Method;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Content kind of a request, selecting headers and body encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    /// `application/json`, body serialized as a single JSON value.
    #[default]
    Json,
    /// `application/x-ndjson`, body serialized as one JSON object per
    /// line with a trailing newline.
    NdJson,
    /// `application/json` plus the `kbn-xsrf` header Kibana requires.
    Kibana,
}

impl ContentKind {
    /// The `Content-Type` header value for this kind.
    pub fn content_type(&self) -> &'static str {
        match self {
            ContentKind::Json | ContentKind::Kibana => "application/json",
            ContentKind::NdJson => "application/x-ndjson",
        }
    }

    /// Serialize a body for this content kind.
    ///
    /// For [`ContentKind::NdJson`] the body is expected to be an array;
    /// each element becomes one line. A non-array body is emitted as a
    /// single line.
    pub fn encode(&self, body: &Value) -> Result<String> {
        match self {
            ContentKind::Json | ContentKind::Kibana => Ok(serde_json::to_string(body)?),
            ContentKind::NdJson => {
                let lines = match body {
                    Value::Array(lines) => lines.as_slice(),
                    single => std::slice::from_ref(single),
                };
                let mut out = String::new();
                for line in lines {
                    out.push_str(&serde_json::to_string(line)?);
                    out.push('\n');
                }
                Ok(out)
            }
        }
    }
}

/// Elastic REST client.
///
/// A thin transport over the cluster's HTTP API: joins paths onto the
/// configured base URL, attaches basic auth, and parses responses as
/// JSON. Response shapes are not validated; error bodies come back as
/// plain values for the caller to inspect.
#[derive(Clone)]
pub struct ElasticClient {
    http: reqwest::Client,
    config: Arc<ElasticConfig>,
}

impl ElasticClient {
    /// Create a new client from a configuration.
    pub fn new(config: ElasticConfig) -> Result<Self> {
        info!("Initializing Elastic client for: {}", config.base_url);

        url::Url::parse(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &ElasticConfig {
        &self.config
    }

    /// Join a path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        kind: ContentKind,
    ) -> Result<Value> {
        let url = self.url(path);
        debug!(%method, %url, "Dispatching request");

        let mut request = self
            .http
            .request(method, &url)
            .header("Content-Type", kind.content_type());

        if kind == ContentKind::Kibana {
            request = request.header("kbn-xsrf", "true");
        }

        if let (Some(username), Some(password)) = (&self.config.username, &self.config.password) {
            request = request.basic_auth(username, Some(password));
        }

        if let Some(body) = body {
            request = request.body(kind.encode(body)?);
        }

        let response = request.send().await?;
        let text = response.text().await?;

        // DELETE on some endpoints answers with an empty body
        if text.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// GET a path and parse the response as JSON.
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path, None, ContentKind::Json).await
    }

    /// GET with an optional body and explicit content kind (search
    /// endpoints take their query in the request body).
    pub async fn get_with(
        &self,
        path: &str,
        body: Option<&Value>,
        kind: ContentKind,
    ) -> Result<Value> {
        self.request(Method::GET, path, body, kind).await
    }

    /// PUT a path with no body.
    pub async fn put(&self, path: &str) -> Result<Value> {
        self.request(Method::PUT, path, None, ContentKind::Json).await
    }

    /// PUT with an optional body and explicit content kind.
    pub async fn put_with(
        &self,
        path: &str,
        body: Option<&Value>,
        kind: ContentKind,
    ) -> Result<Value> {
        self.request(Method::PUT, path, body, kind).await
    }

    /// POST a JSON body.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.request(Method::POST, path, Some(body), ContentKind::Json)
            .await
    }

    /// POST with an explicit content kind.
    pub async fn post_with(&self, path: &str, body: &Value, kind: ContentKind) -> Result<Value> {
        self.request(Method::POST, path, Some(body), kind).await
    }

    /// DELETE a path.
    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.request(Method::DELETE, path, None, ContentKind::Json)
            .await
    }

    /// DELETE with an explicit content kind.
    pub async fn delete_with(&self, path: &str, kind: ContentKind) -> Result<Value> {
        self.request(Method::DELETE, path, None, kind).await
    }

    /// Look up a document anywhere in the cluster by its `_id`.
    pub async fn get_by_id(&self, id: &str) -> Result<Value> {
        let body = json!({
            "query": {
                "ids": { "values": [id] }
            },
            "fields": ["*"],
            "_source": true
        });
        self.get_with("_search", Some(&body), ContentKind::Json).await
    }
}

impl std::fmt::Debug for ElasticClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticClient")
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client =
            ElasticClient::new(ElasticConfig::new("http://localhost:9200/")).unwrap();

        assert_eq!(client.url("/metrics/_search"), "http://localhost:9200/metrics/_search");
        assert_eq!(client.url("metrics/_search"), "http://localhost:9200/metrics/_search");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(ElasticClient::new(ElasticConfig::new("not a url")).is_err());
    }

    #[test]
    fn test_ndjson_encoding() {
        let body = json!([{ "index": { "_id": "1" } }, { "hr": 61 }]);
        let encoded = ContentKind::NdJson.encode(&body).unwrap();

        assert_eq!(encoded, "{\"index\":{\"_id\":\"1\"}}\n{\"hr\":61}\n");
    }

    #[test]
    fn test_content_types() {
        assert_eq!(ContentKind::Json.content_type(), "application/json");
        assert_eq!(ContentKind::Kibana.content_type(), "application/json");
        assert_eq!(ContentKind::NdJson.content_type(), "application/x-ndjson");
    }
}
