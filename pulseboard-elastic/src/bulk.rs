//! Bulk NDJSON assembly and table-shaped reads over `_search`.

use crate::{
    client::{ContentKind, ElasticClient},
    document::{FlattenOptions, PrepareOptions, flatten, prepare},
    error::Result,
    index::Index,
    search::{BoolFilter, DocQuery},
    table::Table,
};
use serde_json::{Map, Value, json};
use tracing::debug;

/// The three bulk actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Index a full document.
    Index,
    /// Partially update a document.
    Update,
    /// Delete a document.
    Delete,
}

impl BulkAction {
    /// The action keyword on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Index => "index",
            BulkAction::Update => "update",
            BulkAction::Delete => "delete",
        }
    }
}

/// Assemble bulk request lines from staged rows.
///
/// Columns whose name starts with `_` (`_index`, `_id`, ...) form the
/// action-metadata object; the remaining columns form the document, which
/// is prepared before emission. `Index` rows yield an action line plus a
/// document line, `Update` wraps the document under `doc`, `Delete`
/// yields the action line alone. Row order is preserved.
pub fn assemble(rows: &Table, action: BulkAction, options: &PrepareOptions) -> Result<Vec<Value>> {
    let mut lines = Vec::with_capacity(rows.len() * 2);

    for row in rows {
        let mut meta = Map::new();
        let mut doc = Map::new();
        for (key, value) in row {
            if key.starts_with('_') {
                meta.insert(key.clone(), value.clone());
            } else {
                doc.insert(key.clone(), value.clone());
            }
        }

        lines.push(json!({ action.as_str(): Value::Object(meta) }));
        match action {
            BulkAction::Index => lines.push(Value::Object(prepare(&doc, options)?)),
            BulkAction::Update => lines.push(json!({ "doc": prepare(&doc, options)? })),
            BulkAction::Delete => {}
        }
    }

    Ok(lines)
}

/// Handle for the `_bulk` endpoint and table-shaped reads.
#[derive(Debug, Clone)]
pub struct Bulk {
    client: ElasticClient,
    path: String,
}

impl Bulk {
    /// Create a bulk handle.
    pub fn new(client: &ElasticClient) -> Self {
        Self {
            client: client.clone(),
            path: "/_bulk".to_string(),
        }
    }

    /// Create a bulk handle routing documents through an ingest pipeline.
    pub fn with_pipeline(client: &ElasticClient, pipeline: &str) -> Self {
        Self {
            client: client.clone(),
            path: format!("/_bulk?pipeline={pipeline}"),
        }
    }

    async fn send(&self, lines: Vec<Value>) -> Result<Value> {
        debug!(lines = lines.len(), path = %self.path, "Posting bulk body");
        self.client
            .post_with(&self.path, &Value::Array(lines), ContentKind::NdJson)
            .await
    }

    /// Index all rows.
    pub async fn write(&self, rows: &Table) -> Result<Value> {
        self.write_with(rows, &PrepareOptions::default()).await
    }

    /// Index all rows with explicit preparation options.
    pub async fn write_with(&self, rows: &Table, options: &PrepareOptions) -> Result<Value> {
        self.send(assemble(rows, BulkAction::Index, options)?).await
    }

    /// Partially update all rows. Updates leave the timestamp field
    /// untouched.
    pub async fn update(&self, rows: &Table) -> Result<Value> {
        self.update_with(rows, &PrepareOptions::without_timestamp())
            .await
    }

    /// Partially update all rows with explicit preparation options.
    pub async fn update_with(&self, rows: &Table, options: &PrepareOptions) -> Result<Value> {
        self.send(assemble(rows, BulkAction::Update, options)?).await
    }

    /// Delete all rows; only `_index`/`_id` columns are consulted.
    pub async fn delete(&self, rows: &Table) -> Result<Value> {
        let options = PrepareOptions::without_timestamp();
        self.send(assemble(rows, BulkAction::Delete, &options)?)
            .await
    }

    // --------- reading based on search -------------------

    /// Read up to `size` documents from `target` with `match_all`.
    pub async fn read_all(&self, target: &str, size: u64) -> Result<Table> {
        let query = json!({
            "size": size,
            "query": { "match_all": {} }
        });
        let result = Index::new(&self.client, target).search(&query).await?;
        Ok(hits_to_table(&result))
    }

    /// Read the newest document per distinct `unique_field` value,
    /// ordered by `order_field`, up to `size` groups.
    pub async fn read_latest(
        &self,
        target: &str,
        unique_field: &str,
        order_field: &str,
        size: u64,
    ) -> Result<Table> {
        let query = json!({
            "size": size,
            "query": { "match_all": {} },
            "collapse": {
                "field": unique_field,
                "inner_hits": {
                    "name": "latest",
                    "size": 1,
                    "sort": [ { order_field: "desc" } ]
                }
            }
        });
        let result = Index::new(&self.client, target).search(&query).await?;

        let latest: Vec<Value> = result["hits"]["hits"]
            .as_array()
            .map(|hits| {
                hits.iter()
                    .filter_map(|item| item["inner_hits"]["latest"]["hits"]["hits"].get(0))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(hits_to_table(&Value::Array(latest)))
    }

    /// Run a [`DocQuery`] and reshape the hits into a table.
    pub async fn query(&self, query: &DocQuery) -> Result<Table> {
        Ok(hits_to_table(&self.query_raw(query).await?))
    }

    /// Run a [`DocQuery`] and return the raw search response.
    pub async fn query_raw(&self, query: &DocQuery) -> Result<Value> {
        Index::new(&self.client, query.target())
            .search(&query.build())
            .await
    }

    /// Run a [`BoolFilter`] query and reshape the hits into a table.
    pub async fn bool_query(&self, filter: &BoolFilter) -> Result<Table> {
        let result = Index::new(&self.client, filter.target())
            .search(&filter.build())
            .await?;
        Ok(hits_to_table(&result))
    }
}

/// Reshape a search response (or a bare hit array) into a table.
///
/// `_type` and `_score` are dropped, each hit's `_source` is flattened
/// with sequences kept opaque, and top-level `fields` values overwrite
/// the matching source columns.
pub fn hits_to_table(result: &Value) -> Table {
    const DROP_COLUMNS: [&str; 2] = ["_type", "_score"];

    let hits = match result["hits"]["hits"].as_array() {
        Some(hits) => hits,
        None => match result.as_array() {
            Some(hits) => hits,
            None => return Table::new(),
        },
    };

    let mut table = Table::new();
    for hit in hits {
        let Some(hit) = hit.as_object() else { continue };

        let mut row = Map::new();
        for (key, value) in hit {
            if DROP_COLUMNS.contains(&key.as_str()) || key == "_source" || key == "fields" {
                continue;
            }
            row.insert(key.clone(), value.clone());
        }

        if let Some(source) = hit.get("_source").and_then(Value::as_object) {
            for (key, value) in flatten(source, &FlattenOptions::default()) {
                row.insert(key, value);
            }
        }
        if let Some(fields) = hit.get("fields").and_then(Value::as_object) {
            for (key, value) in fields {
                row.insert(key.clone(), value.clone());
            }
        }

        table.push(row);
    }
    table
}
