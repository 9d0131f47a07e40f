//! Query builders for table-shaped document reads.

use serde_json::{Map, Value, json};

/// Builder for a simple match/term document query against one target.
///
/// With neither a match nor a term clause the query falls back to
/// `match_all`. Requesting `fields` disables `_source` in the response,
/// so hit values come back as the target's field arrays.
#[derive(Debug, Clone)]
pub struct DocQuery {
    target: String,
    match_clause: Option<(String, Value)>,
    term_clause: Option<(String, Value)>,
    size: u64,
    fields: Option<Vec<String>>,
}

impl DocQuery {
    /// Create a query against an index or index pattern.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            match_clause: None,
            term_clause: None,
            size: 10,
            fields: None,
        }
    }

    /// Match a field against a full-text value.
    pub fn match_on(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.match_clause = Some((field.into(), value.into()));
        self
    }

    /// Require an exact term on a field.
    pub fn term_on(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.term_clause = Some((field.into(), value.into()));
        self
    }

    /// Set the result size limit.
    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Request specific fields instead of `_source`.
    pub fn fields(mut self, fields: Vec<String>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// The target index or pattern.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Build the search request body.
    pub fn build(&self) -> Value {
        let mut query = Map::new();
        if let Some((field, value)) = &self.match_clause {
            query.insert("match".to_string(), json!({ field: value }));
        }
        if let Some((field, value)) = &self.term_clause {
            query.insert("term".to_string(), json!({ field: value }));
        }
        if query.is_empty() {
            query.insert("match_all".to_string(), json!({}));
        }

        let mut body = Map::new();
        body.insert("size".to_string(), json!(self.size));
        body.insert("query".to_string(), Value::Object(query));
        if let Some(fields) = &self.fields {
            body.insert("fields".to_string(), json!(fields));
            body.insert("_source".to_string(), json!(false));
        }
        Value::Object(body)
    }
}

/// Builder for a bool filter query: exact terms plus greater-than and
/// less-than range bounds, all in filter context.
#[derive(Debug, Clone)]
pub struct BoolFilter {
    target: String,
    terms: Vec<(String, Value)>,
    greater: Vec<(String, Value)>,
    lower: Vec<(String, Value)>,
    size: u64,
}

impl BoolFilter {
    /// Create a filter query against an index or index pattern.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            terms: Vec::new(),
            greater: Vec::new(),
            lower: Vec::new(),
            size: 10,
        }
    }

    /// Require an exact term on a field.
    pub fn term(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms.push((field.into(), value.into()));
        self
    }

    /// Require a field to be greater than a value.
    pub fn greater_than(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.greater.push((field.into(), value.into()));
        self
    }

    /// Require a field to be less than a value.
    pub fn less_than(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.lower.push((field.into(), value.into()));
        self
    }

    /// Set the result size limit.
    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// The target index or pattern.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Build the search request body.
    pub fn build(&self) -> Value {
        let mut filter = Vec::new();
        for (field, value) in &self.terms {
            filter.push(json!({ "term": { field: value } }));
        }
        for (field, value) in &self.greater {
            filter.push(json!({ "range": { field: { "gt": value } } }));
        }
        for (field, value) in &self.lower {
            filter.push(json!({ "range": { field: { "lt": value } } }));
        }

        json!({
            "size": self.size,
            "query": {
                "bool": { "filter": filter }
            }
        })
    }
}
