//! Ingest pipeline builder.

use crate::{
    client::{ContentKind, ElasticClient},
    error::Result,
};
use serde_json::{Value, json};

/// Target type for a `convert` processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertType {
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    Long,
    /// Single precision float.
    Float,
    /// Double precision float.
    Double,
    /// String.
    String,
    /// Boolean.
    Boolean,
    /// IP address.
    Ip,
    /// Let the processor pick.
    Auto,
}

impl ConvertType {
    /// The processor's type keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConvertType::Integer => "integer",
            ConvertType::Long => "long",
            ConvertType::Float => "float",
            ConvertType::Double => "double",
            ConvertType::String => "string",
            ConvertType::Boolean => "boolean",
            ConvertType::Ip => "ip",
            ConvertType::Auto => "auto",
        }
    }
}

/// Builder accumulating ingest pipeline processors in call order.
///
/// Every processor carries the builder's `ignore_failure` flag. Renaming
/// or removing a dotted field prepends a `dot_expander` for that field,
/// matching how dotted columns arrive from bulk writes.
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    processors: Vec<Value>,
    ignore_failure: bool,
}

impl PipelineBuilder {
    /// Create a builder whose processors ignore per-document failures.
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            ignore_failure: true,
        }
    }

    /// Fail documents on processor errors instead of ignoring them.
    pub fn strict() -> Self {
        Self {
            processors: Vec::new(),
            ignore_failure: false,
        }
    }

    /// Expand dotted field names into nested objects.
    pub fn dot_expand(mut self, field: &str) -> Self {
        let processor = json!({
            "dot_expander": {
                "ignore_failure": self.ignore_failure,
                "field": field
            }
        });
        self.processors.push(processor);
        self
    }

    /// Rename a field; dotted sources are dot-expanded first.
    pub fn rename(mut self, field: &str, target_field: &str) -> Self {
        if field.contains('.') {
            self = self.dot_expand(field);
        }
        let processor = json!({
            "rename": {
                "ignore_failure": self.ignore_failure,
                "field": field,
                "target_field": target_field
            }
        });
        self.processors.push(processor);
        self
    }

    /// Convert a field to another type.
    pub fn convert(mut self, field: &str, to: ConvertType) -> Self {
        let processor = json!({
            "convert": {
                "ignore_failure": self.ignore_failure,
                "field": field,
                "type": to.as_str()
            }
        });
        self.processors.push(processor);
        self
    }

    /// Run a painless script.
    pub fn script(mut self, source: &str) -> Self {
        let processor = json!({
            "script": {
                "ignore_failure": self.ignore_failure,
                "source": source
            }
        });
        self.processors.push(processor);
        self
    }

    /// Remove fields; dotted names are dot-expanded first.
    pub fn remove(mut self, fields: &[&str]) -> Self {
        for field in fields {
            if field.contains('.') {
                self = self.dot_expand(field);
            }
        }
        let processor = json!({
            "remove": {
                "ignore_failure": self.ignore_failure,
                "field": fields
            }
        });
        self.processors.push(processor);
        self
    }

    /// Build the pipeline definition.
    pub fn build(&self) -> Value {
        json!({ "processors": self.processors })
    }

    /// Run the pipeline against a sample document without installing it.
    pub async fn simulate(&self, client: &ElasticClient, doc: &Value) -> Result<Value> {
        let body = json!({
            "pipeline": self.build(),
            "docs": [ { "_source": doc } ]
        });
        client.post("_ingest/pipeline/_simulate", &body).await
    }

    /// Install the pipeline under a name.
    pub async fn create(&self, client: &ElasticClient, name: &str) -> Result<Value> {
        client
            .put_with(
                &format!("_ingest/pipeline/{name}"),
                Some(&self.build()),
                ContentKind::Json,
            )
            .await
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processors_in_call_order() {
        let pipeline = PipelineBuilder::new()
            .convert("hr", ConvertType::Float)
            .script("ctx.checked = true")
            .build();

        let processors = pipeline["processors"].as_array().unwrap();
        assert_eq!(processors.len(), 2);
        assert_eq!(processors[0]["convert"]["field"], json!("hr"));
        assert_eq!(processors[0]["convert"]["type"], json!("float"));
        assert_eq!(processors[1]["script"]["source"], json!("ctx.checked = true"));
    }

    #[test]
    fn test_dotted_rename_expands_first() {
        let pipeline = PipelineBuilder::new()
            .rename("labels.customer", "labels.customer_id")
            .build();

        let processors = pipeline["processors"].as_array().unwrap();
        assert_eq!(processors.len(), 2);
        assert_eq!(processors[0]["dot_expander"]["field"], json!("labels.customer"));
        assert_eq!(processors[1]["rename"]["target_field"], json!("labels.customer_id"));
    }

    #[test]
    fn test_remove_expands_each_dotted_field() {
        let pipeline = PipelineBuilder::new()
            .remove(&["labels.internal", "note"])
            .build();

        let processors = pipeline["processors"].as_array().unwrap();
        assert_eq!(processors.len(), 2);
        assert_eq!(processors[0]["dot_expander"]["field"], json!("labels.internal"));
        assert_eq!(processors[1]["remove"]["field"], json!(["labels.internal", "note"]));
    }

    #[test]
    fn test_strict_builder_disables_ignore_failure() {
        let pipeline = PipelineBuilder::strict().convert("hr", ConvertType::Auto).build();
        let processors = pipeline["processors"].as_array().unwrap();
        assert_eq!(processors[0]["convert"]["ignore_failure"], json!(false));
    }
}
