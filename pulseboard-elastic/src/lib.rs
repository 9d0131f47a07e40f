//! Elasticsearch and Kibana REST client for wearable-data pipelines.
//!
//! This crate provides a thin client over the cluster's HTTP API with
//! support for:
//! - A flat/nested document codec (dot-path flatten/unflatten) with
//!   cleaning and timestamp injection before writes
//! - Single-document and NDJSON bulk indexing from tabular rows
//! - Table-shaped search reads (match/term, bool filters, collapse)
//! - Index, index-template, and ingest-pipeline management
//! - Role/customer provisioning and Kibana saved-object administration
//!
//! # Example
//!
//! ```rust,no_run
//! use pulseboard_elastic::{Bulk, ElasticClient, ElasticConfig, Index, PrepareOptions};
//! use serde_json::{Map, json};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ElasticConfig::new("https://localhost:9200")
//!         .with_basic_auth("ingester", "secret");
//!     let client = ElasticClient::new(config)?;
//!
//!     // Write one document into a dated index
//!     let index = Index::new(&client, "vitals-%Y.%m");
//!     let mut record = Map::new();
//!     record.insert("heart_rate.avg".to_string(), json!(61));
//!     record.insert("date".to_string(), json!("2023-04-01"));
//!     index.write(&record, None, &PrepareOptions::default()).await?;
//!
//!     // Read the latest document per user
//!     let bulk = Bulk::new(&client);
//!     let latest = bulk.read_latest("vitals-*", "user_id", "@timestamp", 10).await?;
//!     println!("{} rows", latest.len());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bulk;
mod client;
mod config;
mod document;
mod error;
mod index;
mod kibana;
mod pipeline;
mod search;
mod security;
mod table;
mod template;

pub use bulk::{Bulk, BulkAction, assemble, hits_to_table};
pub use client::{ContentKind, ElasticClient};
pub use config::ElasticConfig;
pub use document::{
    Document, FlatRecord, FlattenOptions, PrepareOptions, flatten, now_iso, prepare, unflatten,
};
pub use error::{ElasticError, Result};
pub use index::Index;
pub use kibana::{IndexPattern, SavedObjects};
pub use pipeline::{ConvertType, PipelineBuilder};
pub use search::{BoolFilter, DocQuery};
pub use security::{Customer, CustomerSpec, Role};
pub use table::Table;
pub use template::IndexTemplate;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        Bulk, BulkAction, DocQuery, ElasticClient, ElasticConfig, ElasticError, Index,
        PrepareOptions, Result, Table,
    };
}
