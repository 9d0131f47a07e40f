//! Per-index document and mapping operations.

use crate::{
    client::{ContentKind, ElasticClient},
    document::{FlatRecord, PrepareOptions, prepare},
    error::Result,
};
use chrono::Utc;
use chrono::format::{Item, StrftimeItems};
use serde_json::{Value, json};
use tracing::debug;

/// Handle for one index, addressed by a name template.
///
/// Templates may carry strftime directives (`metrics-%Y.%m`) which are
/// expanded against the current UTC time each call; templates without
/// directives resolve to themselves.
#[derive(Debug, Clone)]
pub struct Index {
    client: ElasticClient,
    name_template: String,
}

impl Index {
    /// Create an index handle.
    pub fn new(client: &ElasticClient, name_template: impl Into<String>) -> Self {
        Self {
            client: client.clone(),
            name_template: name_template.into(),
        }
    }

    /// Resolve the index name for the current time.
    pub fn name(&self) -> String {
        resolve_template(&self.name_template)
    }

    /// Fetch the index mappings.
    pub async fn mappings(&self) -> Result<Value> {
        self.client.get(&format!("{}/_mapping", self.name())).await
    }

    /// Create the index, optionally with explicit mappings.
    pub async fn create(&self, mappings: Option<&Value>) -> Result<Value> {
        let name = self.name();
        debug!(index = %name, "Creating index");

        match mappings {
            Some(mappings) => {
                let body = json!({ "mappings": mappings });
                self.client
                    .put_with(&name, Some(&body), ContentKind::Json)
                    .await
            }
            None => self.client.put(&name).await,
        }
    }

    /// Delete the index.
    pub async fn delete(&self) -> Result<Value> {
        let name = self.name();
        debug!(index = %name, "Deleting index");
        self.client.delete(&name).await
    }

    /// Update the index mappings in place.
    pub async fn update_mapping(&self, mappings: &Value) -> Result<Value> {
        self.client
            .put_with(
                &format!("{}/_mapping", self.name()),
                Some(mappings),
                ContentKind::Json,
            )
            .await
    }

    /// Reindex this index's documents into another index.
    pub async fn reindex(&self, dest: &str) -> Result<Value> {
        let body = json!({
            "source": { "index": self.name() },
            "dest": { "index": dest }
        });
        self.client.post("_reindex", &body).await
    }

    /// Write a record as a document, preparing it first.
    ///
    /// With an id template the document is PUT under that id (templates
    /// expand like index names); without one the cluster assigns an id.
    pub async fn write(
        &self,
        record: &FlatRecord,
        id_template: Option<&str>,
        options: &PrepareOptions,
    ) -> Result<Value> {
        let doc = Value::Object(prepare(record, options)?);

        match id_template {
            Some(id_template) => {
                let id = resolve_template(id_template);
                self.client
                    .put_with(
                        &format!("{}/_doc/{}", self.name(), id),
                        Some(&doc),
                        ContentKind::Json,
                    )
                    .await
            }
            None => {
                self.client
                    .post(&format!("{}/_doc/", self.name()), &doc)
                    .await
            }
        }
    }

    /// Partially update the document at an id with a prepared record.
    pub async fn update(
        &self,
        record: &FlatRecord,
        id_template: &str,
        options: &PrepareOptions,
    ) -> Result<Value> {
        let doc = json!({ "doc": prepare(record, options)? });
        let id = resolve_template(id_template);
        self.client
            .post(&format!("{}/_update/{}", self.name(), id), &doc)
            .await
    }

    /// Read a document's source by id, optionally narrowing to one
    /// subfield or excluding source fields.
    ///
    /// Error envelopes (objects carrying both `error` and `status`) are
    /// returned as-is so the caller can inspect them.
    pub async fn read(
        &self,
        id_template: &str,
        subfield: Option<&str>,
        excludes: Option<&str>,
    ) -> Result<Value> {
        let id = resolve_template(id_template);
        let path = match excludes {
            Some(excludes) => format!(
                "{}/_doc/{}/_source?_source_excludes={}",
                self.name(),
                id,
                excludes
            ),
            None => format!("{}/_doc/{}/_source", self.name(), id),
        };

        let doc = self.client.get(&path).await?;

        if doc.get("error").is_some() && doc.get("status").is_some() {
            return Ok(doc);
        }
        match subfield {
            Some(subfield) => Ok(doc[subfield].clone()),
            None => Ok(doc),
        }
    }

    /// Run a search against this index.
    pub async fn search(&self, body: &Value) -> Result<Value> {
        self.client
            .get_with(
                &format!("{}/_search", self.name()),
                Some(body),
                ContentKind::Json,
            )
            .await
    }
}

/// Expand strftime directives in a name or id template against the
/// current UTC time. Templates without `%`, or with directives chrono
/// cannot parse, pass through verbatim.
pub(crate) fn resolve_template(template: &str) -> String {
    if !template.contains('%') {
        return template.to_string();
    }

    let items: Vec<Item<'_>> = StrftimeItems::new(template).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return template.to_string();
    }
    Utc::now().format_with_items(items.iter()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_plain_template_passes_through() {
        assert_eq!(resolve_template("metrics"), "metrics");
        assert_eq!(resolve_template("cu-7-data"), "cu-7-data");
    }

    #[test]
    fn test_strftime_template_expands() {
        let resolved = resolve_template("metrics-%Y");
        assert_eq!(resolved, format!("metrics-{}", Utc::now().year()));
    }

    #[test]
    fn test_invalid_directive_passes_through() {
        assert_eq!(resolve_template("metrics-%Q"), "metrics-%Q");
    }
}
