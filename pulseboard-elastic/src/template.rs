//! Index template management.

use crate::{
    client::{ContentKind, ElasticClient},
    error::Result,
};
use serde_json::{Value, json};

/// Handle for one composable index template.
#[derive(Debug, Clone)]
pub struct IndexTemplate {
    client: ElasticClient,
    name: String,
}

impl IndexTemplate {
    /// Create an index template handle.
    pub fn new(client: &ElasticClient, name: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            name: name.into(),
        }
    }

    /// Create or replace the template with index patterns and mappings.
    pub async fn create(&self, index_patterns: &[&str], mappings: &Value) -> Result<Value> {
        let body = json!({
            "index_patterns": index_patterns,
            "template": { "mappings": mappings }
        });
        self.client
            .put_with(
                &format!("_index_template/{}", self.name),
                Some(&body),
                ContentKind::Json,
            )
            .await
    }

    /// Fetch the template.
    pub async fn get(&self) -> Result<Value> {
        self.client
            .get(&format!("_index_template/{}", self.name))
            .await
    }

    /// Delete the template.
    pub async fn delete(&self) -> Result<Value> {
        self.client
            .delete(&format!("_index_template/{}", self.name))
            .await
    }
}
