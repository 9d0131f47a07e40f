//! Kibana saved-objects and index-pattern administration.

use crate::{
    client::{ContentKind, ElasticClient},
    error::Result,
    table::Table,
};
use serde_json::{Map, Value, json};

/// Saved-objects API for one Kibana space.
#[derive(Debug, Clone)]
pub struct SavedObjects {
    client: ElasticClient,
    space_id: String,
}

impl SavedObjects {
    /// Create a saved-objects handle for a space.
    pub fn new(client: &ElasticClient, space_id: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            space_id: space_id.into(),
        }
    }

    fn base(&self) -> String {
        format!("/s/{}/api/saved_objects", self.space_id)
    }

    /// Fetch one saved object by type and id.
    pub async fn get(&self, obj_type: &str, obj_id: &str) -> Result<Value> {
        self.client
            .get_with(
                &format!("{}/{}/{}", self.base(), obj_type, obj_id),
                None,
                ContentKind::Kibana,
            )
            .await
    }

    /// Export a dashboard and its references.
    pub async fn export_dashboard(&self, id: &str) -> Result<Value> {
        let body = json!({
            "excludeExportDetails": true,
            "objects": [{
                "type": "dashboard",
                "id": id
            }]
        });
        self.client
            .post_with(&format!("{}/_export", self.base()), &body, ContentKind::Kibana)
            .await
    }

    /// List the space's dashboards as a title/id table.
    pub async fn dashboards(&self) -> Result<Table> {
        let path = format!(
            "{}/_find?type=dashboard&search_fields=title&search=*&fields=title",
            self.base()
        );
        let result = self.client.get_with(&path, None, ContentKind::Kibana).await?;

        let mut table = Table::new();
        if let Some(objects) = result["saved_objects"].as_array() {
            for item in objects {
                let mut row = Map::new();
                row.insert("title".to_string(), item["attributes"]["title"].clone());
                row.insert("id".to_string(), item["id"].clone());
                table.push(row);
            }
        }
        Ok(table)
    }
}

/// Index-pattern API for one pattern in one Kibana space.
#[derive(Debug, Clone)]
pub struct IndexPattern {
    client: ElasticClient,
    space_id: String,
    id: String,
}

impl IndexPattern {
    /// Create an index-pattern handle.
    pub fn new(
        client: &ElasticClient,
        space_id: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            client: client.clone(),
            space_id: space_id.into(),
            id: id.into(),
        }
    }

    fn base(&self) -> String {
        format!("/s/{}/api/index_patterns/index_pattern", self.space_id)
    }

    /// Fetch the index pattern.
    pub async fn get(&self) -> Result<Value> {
        self.client
            .get_with(
                &format!("{}/{}", self.base(), self.id),
                None,
                ContentKind::Kibana,
            )
            .await
    }

    /// Delete the index pattern.
    pub async fn delete(&self) -> Result<Value> {
        self.client
            .delete_with(&format!("{}/{}", self.base(), self.id), ContentKind::Kibana)
            .await
    }

    /// Create the index pattern with a title and extra attributes
    /// (`timeFieldName`, ...).
    pub async fn create(&self, title: &str, attrs: Option<&Map<String, Value>>) -> Result<Value> {
        let mut index_pattern = Map::new();
        index_pattern.insert("title".to_string(), json!(title));
        index_pattern.insert("id".to_string(), json!(self.id));
        if let Some(attrs) = attrs {
            for (key, value) in attrs {
                index_pattern.insert(key.clone(), value.clone());
            }
        }

        let body = json!({ "index_pattern": index_pattern });
        self.client
            .post_with(&self.base(), &body, ContentKind::Kibana)
            .await
    }

    /// Update attributes of the index pattern.
    pub async fn update(&self, attrs: &Map<String, Value>) -> Result<Value> {
        let body = json!({ "index_pattern": attrs });
        self.client
            .post_with(
                &format!("{}/{}", self.base(), self.id),
                &body,
                ContentKind::Kibana,
            )
            .await
    }

    /// Add a runtime field to the index pattern.
    pub async fn create_runtime_field(&self, name: &str, runtime_field: &Value) -> Result<Value> {
        let body = json!({
            "name": name,
            "runtimeField": runtime_field
        });
        self.client
            .post_with(
                &format!("{}/{}/runtime_field", self.base(), self.id),
                &body,
                ContentKind::Kibana,
            )
            .await
    }
}
